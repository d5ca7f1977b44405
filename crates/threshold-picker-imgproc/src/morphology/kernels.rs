use threshold_picker_image::ImageError;

/// Shapes of morphological [`Kernel`]s.
///
/// All kernels are square with an odd side length and centered at their
/// geometric center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelShape {
    /// A rectangular box structuring element. Every pixel of the box is active.
    Rect,
    /// A cross (plus) shaped structuring element.
    ///
    /// Only pixels along the horizontal and vertical center lines are active.
    Cross,
    /// An ellipse (circle) shaped structuring element inscribed in the box.
    Ellipse,
}

/// A morphological structuring element.
///
/// The kernel stores a binary mask where 1 marks the pixels included in the
/// operation. A kernel of radius `r` has side `2 * r + 1` and its anchor at `(r, r)`.
///
/// # Example
///
/// ```rust
/// use threshold_picker_imgproc::morphology::{Kernel, KernelShape};
///
/// let kernel = Kernel::new(KernelShape::Rect, 1).unwrap();
/// assert_eq!(kernel.width(), 3);
/// assert_eq!(kernel.height(), 3);
/// assert_eq!(kernel.pad(), (1, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    data: Vec<u8>,
    size: usize,
}

impl Kernel {
    /// Create a morphological kernel from a shape and a radius.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidKernelRadius`] if the kernel area does not fit in a `usize`.
    pub fn new(shape: KernelShape, radius: usize) -> Result<Self, ImageError> {
        let size = radius
            .checked_mul(2)
            .and_then(|d| d.checked_add(1))
            .filter(|size| size.checked_mul(*size).is_some())
            .ok_or(ImageError::InvalidKernelRadius(radius))?;

        Ok(match shape {
            KernelShape::Rect => box_kernel(radius, size),
            KernelShape::Cross => cross_kernel(radius, size),
            KernelShape::Ellipse => ellipse_kernel(radius, size),
        })
    }

    /// Get a reference to the kernel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the width of the kernel.
    pub fn width(&self) -> usize {
        self.size
    }

    /// Get the height of the kernel.
    pub fn height(&self) -> usize {
        self.size
    }

    /// Get the padding for the kernel as `(rows, cols)` offset from the anchor.
    pub fn pad(&self) -> (usize, usize) {
        (self.size / 2, self.size / 2)
    }

    /// Iterate over the active offsets `(dy, dx)` relative to the anchor.
    pub fn offsets(&self) -> impl Iterator<Item = (isize, isize)> + '_ {
        let (pad_h, pad_w) = self.pad();
        self.data
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == 1)
            .map(move |(idx, _)| {
                let row = idx / self.size;
                let col = idx % self.size;
                (row as isize - pad_h as isize, col as isize - pad_w as isize)
            })
    }
}

fn box_kernel(radius: usize, size: usize) -> Kernel {
    Kernel {
        data: vec![1u8; size * size],
        size,
    }
}

fn cross_kernel(radius: usize, size: usize) -> Kernel {
    let mut data = vec![0u8; size * size];

    // fill horizontal line
    for j in 0..size {
        data[radius * size + j] = 1;
    }

    // fill vertical line
    for i in 0..size {
        data[i * size + radius] = 1;
    }

    Kernel { data, size }
}

fn ellipse_kernel(radius: usize, size: usize) -> Kernel {
    let mut data = vec![0u8; size * size];
    let r = radius as f64;
    let inv_r2 = if radius > 0 { 1.0 / (r * r) } else { 0.0 };

    for i in 0..size {
        let dy = i as f64 - r;
        // half width of the ellipse on this row
        let dx = (r * ((r * r - dy * dy) * inv_r2).max(0.0).sqrt()).round() as usize;
        let start = radius.saturating_sub(dx);
        let end = (radius + dx + 1).min(size);
        for j in start..end {
            data[i * size + j] = 1;
        }
    }

    Kernel { data, size }
}
