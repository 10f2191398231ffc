//! Places screenshots on the system clipboard via `arboard`.
//!
//! On X11 and Wayland the copied image is served by this process, and it can
//! disappear once the last `arboard::Clipboard` is dropped. `ClipboardHost`
//! therefore keeps one handle open from the first copy until `release`.

use arboard::{Clipboard, ImageData};
use image::RgbaImage;
use std::borrow::Cow;
use std::sync::{Mutex, PoisonError};

/// Long-lived owner of the clipboard handle.
#[derive(Default)]
pub struct ClipboardHost {
    handle: Mutex<Option<Clipboard>>,
}

impl ClipboardHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the clipboard contents with `image`.
    pub fn copy_image(&self, image: &RgbaImage) -> Result<(), ClipboardError> {
        let mut handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        with_handle(&mut handle, Clipboard::new, |clipboard| {
            clipboard.set_image(image_data(image))
        })?;

        log::debug!(
            "Copied {}x{} image to clipboard",
            image.width(),
            image.height()
        );
        Ok(())
    }

    /// Drops the held handle. Must run before the event loop exits.
    pub fn release(&self) {
        let held = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if held.is_some() {
            log::debug!("Clipboard handle released");
        }
    }
}

/// Runs `action` on the handle in `slot`, opening it on first use.
///
/// A failed action drops the handle so the next copy starts from a fresh one.
fn with_handle<C, T>(
    slot: &mut Option<C>,
    open: impl FnOnce() -> Result<C, arboard::Error>,
    action: impl FnOnce(&mut C) -> Result<T, arboard::Error>,
) -> Result<T, ClipboardError> {
    let mut clipboard = match slot.take() {
        Some(clipboard) => clipboard,
        None => open().map_err(ClipboardError::Unavailable)?,
    };

    let value = action(&mut clipboard).map_err(ClipboardError::CopyFailed)?;
    *slot = Some(clipboard);
    Ok(value)
}

fn image_data(image: &RgbaImage) -> ImageData<'_> {
    ImageData {
        width: image.width() as usize,
        height: image.height() as usize,
        bytes: Cow::Borrowed(image.as_raw()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Failed to access clipboard: {0}")]
    Unavailable(#[source] arboard::Error),

    #[error("Failed to copy image to clipboard: {0}")]
    CopyFailed(#[source] arboard::Error),
}
