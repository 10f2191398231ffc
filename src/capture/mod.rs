//! Screen capture domain — public API.
//!
//! This module owns grabbing the display, cropping, and writing screenshot
//! files. External code should only use what is exported here.

mod region;
mod screenshot;
mod store;

pub use region::{crop_image, CropError, CropRect, Point};
pub use screenshot::{capture_primary_monitor, CaptureError, PrimaryMonitor, ScreenSource};
pub use store::{encode_png, file_name, CaptureKind, SavedScreenshot, ScreenshotStore, StoreError};

use image::RgbaImage;
use std::time::Instant;

use crate::error::Error;

/// Grabs the display and persists screenshots.
///
/// Every failure comes back as an `Err`; nothing here panics or shows UI.
pub struct CaptureService {
    source: Box<dyn ScreenSource>,
    store: ScreenshotStore,
}

impl CaptureService {
    pub fn new(source: impl ScreenSource + 'static, store: ScreenshotStore) -> Self {
        Self {
            source: Box::new(source),
            store,
        }
    }

    pub fn store(&self) -> &ScreenshotStore {
        &self.store
    }

    /// Grabs the primary display without saving it.
    pub fn grab_frame(&self) -> Result<RgbaImage, CaptureError> {
        let start = Instant::now();
        let frame = self.source.grab()?;
        log::info!(
            "Screen captured ({}x{}) in {}ms",
            frame.width(),
            frame.height(),
            start.elapsed().as_millis()
        );
        Ok(frame)
    }

    /// Grabs the primary display and writes it as a `full` screenshot.
    pub fn capture_full_screen(&self) -> Result<SavedScreenshot, Error> {
        let frame = self.grab_frame()?;
        Ok(self.store.save(CaptureKind::Full, frame)?)
    }

    /// Extracts `rect` from a frozen frame and writes it as a `cropped` screenshot.
    pub fn save_crop(&self, frame: &RgbaImage, rect: CropRect) -> Result<SavedScreenshot, Error> {
        let cropped = crop_image(frame, rect)?;
        Ok(self.store.save(CaptureKind::Cropped, cropped)?)
    }
}
