use std::fmt;

use threshold_picker_imgproc::morphology::KernelShape;

/// Text shown when no operation has been applied yet.
pub const NO_EFFECTS: &str = "No effects applied!";

/// The morphological transform of an [`Effect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// Shrink the foreground.
    Erosion,
    /// Grow the foreground.
    Dilation,
    /// Erosion followed by dilation.
    Opening,
    /// Dilation followed by erosion.
    Closing,
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EffectKind::Erosion => "Erosion",
            EffectKind::Dilation => "Dilation",
            EffectKind::Opening => "Opening",
            EffectKind::Closing => "Closing",
        };
        f.write_str(name)
    }
}

/// Human readable name of a structuring element shape.
pub fn shape_name(shape: KernelShape) -> &'static str {
    match shape {
        KernelShape::Rect => "Rectangular",
        KernelShape::Cross => "Cross",
        KernelShape::Ellipse => "Elliptical",
    }
}

/// One applied operation: the transform and the kernel it used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    /// The transform applied.
    pub kind: EffectKind,
    /// Shape of the structuring element.
    pub shape: KernelShape,
    /// Radius of the structuring element; its side is `2 * radius + 1`.
    pub radius: usize,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Kernel({}, {})",
            self.kind,
            shape_name(self.shape),
            self.radius
        )
    }
}

/// Append-only log of the effects applied during a session.
///
/// Entries are only ever removed all at once with [`EffectLog::clear`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectLog {
    entries: Vec<Effect>,
}

impl EffectLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an applied effect.
    pub fn append(&mut self, kind: EffectKind, shape: KernelShape, radius: usize) {
        self.entries.push(Effect {
            kind,
            shape,
            radius,
        });
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of recorded effects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no effect has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the effects in application order.
    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.entries.iter()
    }

    /// Render the log as text, one line per effect, or [`NO_EFFECTS`] when empty.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return NO_EFFECTS.to_string();
        }

        self.entries
            .iter()
            .map(|effect| format!("{effect}\n"))
            .collect()
    }
}
