//! The "full / cropped / cancel" choice dialog.

use serde::{Deserialize, Serialize};

use crate::surface::{Surface, SurfaceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Full,
    Cropped,
    Cancelled,
}

/// An open choice dialog.
///
/// `resolve` consumes the dialog, so each dialog yields exactly one outcome.
pub struct ChoiceDialog<S: Surface> {
    surface: S,
}

impl<S: Surface> ChoiceDialog<S> {
    pub fn open(mut surface: S) -> Result<Self, SurfaceError> {
        surface.show()?;
        log::debug!("Choice dialog opened");
        Ok(Self { surface })
    }

    /// Closes the dialog and reports `choice` as its outcome.
    pub fn resolve(mut self, choice: Choice) -> Choice {
        self.surface.close();
        log::info!("Screenshot choice: {:?}", choice);
        choice
    }
}
