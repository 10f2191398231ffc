//! Screenshot persistence — naming and PNG writing.
//!
//! Files are named `{full|cropped}_screenshot_{YYYYMMDD_HHMMSS}.png`. The
//! directory is created on the first save. A file, once written, is never
//! touched again: a second capture inside the same second gets a zero-padded
//! suffix (`_001`, `_002`, ...) instead of overwriting the first, so names
//! from one second still sort in capture order up to 999 collisions.

use chrono::{DateTime, Local};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureKind {
    Full,
    Cropped,
}

impl CaptureKind {
    pub fn prefix(self) -> &'static str {
        match self {
            CaptureKind::Full => "full",
            CaptureKind::Cropped => "cropped",
        }
    }
}

/// A screenshot that has been written to disk.
///
/// `image` holds exactly the pixels encoded into `path`.
#[derive(Debug, Clone)]
pub struct SavedScreenshot {
    pub kind: CaptureKind,
    pub path: PathBuf,
    pub image: RgbaImage,
}

#[derive(Debug, Clone)]
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the screenshots directory (and its parents) if missing.
    pub fn ensure_dir(&self) -> Result<&Path, StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::CreateDir {
            dir: self.dir.clone(),
            source,
        })?;
        Ok(&self.dir)
    }

    pub fn save(&self, kind: CaptureKind, image: RgbaImage) -> Result<SavedScreenshot, StoreError> {
        self.save_at(kind, image, Local::now())
    }

    /// Saves `image` under the name derived from `taken_at`.
    pub fn save_at(
        &self,
        kind: CaptureKind,
        image: RgbaImage,
        taken_at: DateTime<Local>,
    ) -> Result<SavedScreenshot, StoreError> {
        self.ensure_dir()?;

        let path = self.free_path(kind, taken_at);
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| StoreError::Write {
                path: path.clone(),
                source,
            })?;

        log::info!(
            "Saved {} screenshot {}x{} to {}",
            kind.prefix(),
            image.width(),
            image.height(),
            path.display()
        );

        Ok(SavedScreenshot { kind, path, image })
    }

    fn free_path(&self, kind: CaptureKind, taken_at: DateTime<Local>) -> PathBuf {
        let stem = file_stem(kind, taken_at);
        let first = self.dir.join(format!("{stem}.png"));
        if !first.exists() {
            return first;
        }

        (1u32..)
            .map(|n| self.dir.join(format!("{stem}_{n:03}.png")))
            .find(|candidate| !candidate.exists())
            .unwrap_or(first)
    }
}

/// `full_screenshot_20240131_235959`
pub fn file_stem(kind: CaptureKind, taken_at: DateTime<Local>) -> String {
    format!(
        "{}_screenshot_{}",
        kind.prefix(),
        taken_at.format(TIMESTAMP_FORMAT)
    )
}

pub fn file_name(kind: CaptureKind, taken_at: DateTime<Local>) -> String {
    format!("{}.png", file_stem(kind, taken_at))
}

/// Encodes an image as PNG in memory.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, StoreError> {
    let mut png_bytes: Vec<u8> = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(StoreError::Encode)?;
    Ok(png_bytes)
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to create screenshots directory {}: {source}", dir.display())]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("PNG encoding failed: {0}")]
    Encode(#[source] image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, h, m, s).unwrap()
    }

    #[test]
    fn names_follow_kind_and_timestamp() {
        assert_eq!(
            file_name(CaptureKind::Full, at(7, 5, 3)),
            "full_screenshot_20240309_070503.png"
        );
        assert_eq!(
            file_name(CaptureKind::Cropped, at(23, 59, 59)),
            "cropped_screenshot_20240309_235959.png"
        );
    }

    #[test]
    fn later_captures_sort_after_earlier_ones() {
        let earlier = file_name(CaptureKind::Full, at(9, 59, 59));
        let later = file_name(CaptureKind::Full, at(10, 0, 0));
        assert_ne!(earlier, later);
        assert!(earlier < later);
    }

    #[test]
    fn directory_is_created_lazily() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("ScreenshotService");
        let store = ScreenshotStore::new(&dir);
        assert!(!dir.exists());

        let saved = store
            .save_at(CaptureKind::Full, RgbaImage::new(8, 6), at(12, 0, 0))
            .unwrap();

        assert!(dir.is_dir());
        assert_eq!(saved.path, dir.join("full_screenshot_20240309_120000.png"));
        assert_eq!(image::open(&saved.path).unwrap().to_rgba8().dimensions(), (8, 6));
    }

    #[test]
    fn same_second_does_not_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ScreenshotStore::new(tmp.path());
        let t = at(12, 0, 0);

        let first = store.save_at(CaptureKind::Cropped, RgbaImage::new(4, 4), t).unwrap();
        let second = store.save_at(CaptureKind::Cropped, RgbaImage::new(2, 2), t).unwrap();
        let third = store.save_at(CaptureKind::Cropped, RgbaImage::new(1, 1), t).unwrap();

        assert_eq!((first.kind, third.kind), (CaptureKind::Cropped, CaptureKind::Cropped));
        assert_eq!(first.path.file_name().unwrap(), "cropped_screenshot_20240309_120000.png");
        assert_eq!(second.path.file_name().unwrap(), "cropped_screenshot_20240309_120000_001.png");
        assert_eq!(third.path.file_name().unwrap(), "cropped_screenshot_20240309_120000_002.png");
        assert_eq!(image::open(&first.path).unwrap().to_rgba8().dimensions(), (4, 4));
    }

    #[test]
    fn same_second_names_sort_in_capture_order() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ScreenshotStore::new(tmp.path());
        let t = at(8, 30, 0);

        let names: Vec<String> = (0..12)
            .map(|_| {
                let saved = store.save_at(CaptureKind::Full, RgbaImage::new(1, 1), t).unwrap();
                saved.path.file_name().unwrap().to_string_lossy().into_owned()
            })
            .collect();

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(sorted, names);
        assert_eq!(names[11], "full_screenshot_20240309_083000_011.png");
    }

    #[test]
    fn saved_pixels_match_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ScreenshotStore::new(tmp.path());
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(1, 1, image::Rgba([10, 20, 30, 255]));

        let saved = store.save_at(CaptureKind::Full, img, at(1, 2, 3)).unwrap();
        let on_disk = image::open(&saved.path).unwrap().to_rgba8();
        assert_eq!(on_disk, saved.image);
    }

    #[test]
    fn encode_png_has_magic_bytes() {
        let bytes = encode_png(&RgbaImage::new(5, 5)).unwrap();
        assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn unwritable_dir_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let store = ScreenshotStore::new(blocker.join("ScreenshotService"));
        let result = store.save(CaptureKind::Full, RgbaImage::new(1, 1));
        assert!(matches!(result, Err(StoreError::CreateDir { .. })));
    }
}
