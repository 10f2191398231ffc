//! Crate-level error for the capture path.
//!
//! Each layer has its own error enum; this one gathers the ones that can end
//! a screenshot attempt so the controller can report them uniformly.

use crate::capture::{CaptureError, CropError, StoreError};
use crate::clipboard::ClipboardError;
use crate::surface::SurfaceError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Crop(#[from] CropError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

impl Error {
    /// True when the failure was that no display could be found at all.
    pub fn is_no_display(&self) -> bool {
        matches!(self, Error::Capture(CaptureError::NoDisplay))
    }
}
