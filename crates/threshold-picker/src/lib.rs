#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Ordered record of the morphological operations applied.
pub mod effects;

/// Application error type.
pub mod error;

/// Interactive menu loop.
pub mod menu;

/// Terminal prompts for menu choices, kernels and bounds.
pub mod prompt;

/// Picker session state and morphology operations.
pub mod session;

/// Dual threshold bounds and the threshold engine.
pub mod threshold;

/// Display backends for the binary view.
pub mod viewer;

pub use crate::effects::{Effect, EffectKind, EffectLog};
pub use crate::error::PickerError;
pub use crate::session::Session;
pub use crate::threshold::ThresholdBounds;

/// Title of the viewer window.
pub const WINDOW_TITLE: &str = "Threshold Picker";
