//! Crop rectangle geometry and sub-image extraction — functional core.
//!
//! This module has zero infrastructure dependencies.
//! It takes pixel data in, returns pixel data out.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// A position in screen pixels, relative to the captured frame's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Normalized selection bounds: `left <= right`, `top <= bottom`.
///
/// `right` and `bottom` are exclusive, so the rectangle covers
/// `right - left` by `bottom - top` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl CropRect {
    /// Rectangle spanned by a drag from `a` to `b`, in either direction.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    /// Zero for an inverted rectangle (`right < left`).
    pub fn width(&self) -> u32 {
        span(self.left, self.right)
    }

    /// Zero for an inverted rectangle (`bottom < top`).
    pub fn height(&self) -> u32 {
        span(self.top, self.bottom)
    }

    pub fn is_normalized(&self) -> bool {
        self.left <= self.right && self.top <= self.bottom
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Intersects the rectangle with a `width` x `height` frame.
    ///
    /// Returns `None` when nothing of the selection lies inside the frame.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<CropRect> {
        let max_x = i32::try_from(width).unwrap_or(i32::MAX);
        let max_y = i32::try_from(height).unwrap_or(i32::MAX);

        let clipped = CropRect {
            left: self.left.clamp(0, max_x),
            top: self.top.clamp(0, max_y),
            right: self.right.clamp(0, max_x),
            bottom: self.bottom.clamp(0, max_y),
        };

        (!clipped.is_empty()).then_some(clipped)
    }
}

fn span(start: i32, end: i32) -> u32 {
    u32::try_from(i64::from(end) - i64::from(start)).unwrap_or(0)
}

/// Copies the pixels under `rect` out of `image`.
///
/// `rect` must be normalized and already clipped to the image; anything else
/// is an error rather than a silently shrunk or shifted result.
pub fn crop_image(image: &RgbaImage, rect: CropRect) -> Result<RgbaImage, CropError> {
    let (img_width, img_height) = image.dimensions();

    if !rect.is_normalized() {
        return Err(CropError::OutOfBounds {
            requested: rect,
            image_size: (img_width, img_height),
        });
    }

    if rect.is_empty() {
        return Err(CropError::ZeroDimension);
    }

    if rect.left < 0
        || rect.top < 0
        || rect.right as u32 > img_width
        || rect.bottom as u32 > img_height
    {
        return Err(CropError::OutOfBounds {
            requested: rect,
            image_size: (img_width, img_height),
        });
    }

    let cropped = image::imageops::crop_imm(
        image,
        rect.left as u32,
        rect.top as u32,
        rect.width(),
        rect.height(),
    )
    .to_image();

    Ok(cropped)
}

#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("Crop rectangle has zero width or height")]
    ZeroDimension,

    #[error(
        "Crop rectangle ({},{})-({},{}) exceeds image bounds ({}x{})",
        requested.left, requested.top, requested.right, requested.bottom,
        image_size.0, image_size.1
    )]
    OutOfBounds {
        requested: CropRect,
        image_size: (u32, u32),
    },
}
