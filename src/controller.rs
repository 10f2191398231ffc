//! Application controller — the trigger → dialog → capture → clipboard flow.
//!
//! The controller is a state machine over a `Desktop` capability. It decides
//! what happens next and performs the desktop side effects (window moves,
//! clipboard, notifications); the Tauri glue in `app.rs` opens windows and
//! schedules the delayed capture based on what it returns.

use image::RgbaImage;

use crate::capture::{CaptureKind, SavedScreenshot};
use crate::clipboard::ClipboardError;
use crate::dialog::Choice;
use crate::error::Error;
use crate::overlay::CropOutcome;

/// Where the controller window is parked while the screen is grabbed.
pub const OFFSCREEN_POSITION: WindowPosition = WindowPosition {
    x: -10_000,
    y: -10_000,
};

const ERROR_TITLE: &str = "Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

/// Desktop side effects the controller needs.
pub trait Desktop {
    /// Brings the controller window forward so the dialog can take focus.
    /// A hidden window stays hidden.
    fn raise(&self);
    fn window_position(&self) -> Option<WindowPosition>;
    fn move_window(&self, position: WindowPosition);
    /// Makes the controller window visible; the fallback when no display is found.
    fn reveal_window(&self);
    fn set_clipboard_image(&self, image: &RgbaImage) -> Result<(), ClipboardError>;
    fn notify(&self, title: &str, body: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    DialogOpen,
    Capturing(CaptureKind),
    Cropping,
}

pub struct Controller<D: Desktop> {
    desktop: D,
    phase: Phase,
    saved_position: Option<WindowPosition>,
    reveal_after_restore: bool,
}

impl<D: Desktop> Controller<D> {
    pub fn new(desktop: D) -> Self {
        Self {
            desktop,
            phase: Phase::Idle,
            saved_position: None,
            reveal_after_restore: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn desktop(&self) -> &D {
        &self.desktop
    }

    /// Hotkey or tray request. Returns `true` if the choice dialog should open.
    ///
    /// Triggers arriving while a dialog, capture or crop is in progress are
    /// dropped.
    pub fn trigger(&mut self) -> bool {
        if self.phase != Phase::Idle {
            log::debug!("Trigger ignored while {:?}", self.phase);
            return false;
        }
        self.desktop.raise();
        self.phase = Phase::DialogOpen;
        true
    }

    /// Dialog outcome. Returns the capture to run once the delay has passed.
    ///
    /// The window is only moved off-screen after a definite choice, so a
    /// cancel leaves it untouched.
    pub fn choose(&mut self, choice: Choice) -> Option<CaptureKind> {
        if self.phase != Phase::DialogOpen {
            log::warn!("Choice {:?} arrived while {:?}", choice, self.phase);
            return None;
        }

        let kind = match choice {
            Choice::Full => CaptureKind::Full,
            Choice::Cropped => CaptureKind::Cropped,
            Choice::Cancelled => {
                self.phase = Phase::Idle;
                return None;
            }
        };

        self.saved_position = self.desktop.window_position();
        log::debug!(
            "Moving controller window off-screen from {:?}",
            self.saved_position
        );
        self.desktop.move_window(OFFSCREEN_POSITION);
        self.phase = Phase::Capturing(kind);
        Some(kind)
    }

    /// The choice dialog could not be shown; back to idle without a capture.
    pub fn dialog_failed(&mut self, err: &Error) {
        if self.phase != Phase::DialogOpen {
            log::warn!("Dialog failure reported while {:?}", self.phase);
            return;
        }
        self.report("Failed to open screenshot options", err);
        self.restore();
    }

    pub fn finish_full(&mut self, result: Result<SavedScreenshot, Error>) {
        match result {
            Ok(shot) => self.publish(&shot),
            Err(e) => self.report("Failed to capture screenshot", &e),
        }
        self.restore();
    }

    /// Hands the frozen frame on to the overlay, or reports why there is none.
    pub fn begin_crop(&mut self, grab: Result<RgbaImage, Error>) -> Option<RgbaImage> {
        match grab {
            Ok(frame) => {
                self.phase = Phase::Cropping;
                Some(frame)
            }
            Err(e) => {
                self.report("Failed to capture cropped screenshot", &e);
                self.restore();
                None
            }
        }
    }

    pub fn finish_crop(&mut self, outcome: CropOutcome) {
        match outcome {
            CropOutcome::Saved(shot) => self.publish(&shot),
            CropOutcome::Failed(e) => self.report("Failed to capture cropped screenshot", &e),
            CropOutcome::Cancelled => log::debug!("Crop cancelled, nothing to publish"),
        }
        self.restore();
    }

    fn publish(&self, shot: &SavedScreenshot) {
        match self.desktop.set_clipboard_image(&shot.image) {
            Ok(()) => log::info!(
                "{} screenshot saved and copied to clipboard: {}",
                shot.kind.prefix(),
                shot.path.display()
            ),
            Err(e) => {
                let err = Error::from(e);
                log::warn!(
                    "Saved {} screenshot {} but clipboard update failed: {}",
                    shot.kind.prefix(),
                    shot.path.display(),
                    err
                );
                self.desktop.notify(ERROR_TITLE, &err.to_string());
            }
        }
    }

    fn report(&mut self, summary: &str, err: &Error) {
        log::error!("{}: {}", summary, err);
        self.desktop.notify(ERROR_TITLE, &format!("{summary}: {err}"));
        if err.is_no_display() {
            self.reveal_after_restore = true;
        }
    }

    fn restore(&mut self) {
        if let Some(position) = self.saved_position.take() {
            log::debug!("Restoring controller window to {:?}", position);
            self.desktop.move_window(position);
        }
        if std::mem::take(&mut self.reveal_after_restore) {
            self.desktop.reveal_window();
        }
        self.phase = Phase::Idle;
    }
}

/// Desktop double that records every side effect.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    pub struct FakeDesktop {
        pub position: Cell<Option<WindowPosition>>,
        pub moves: RefCell<Vec<WindowPosition>>,
        pub clipboard: RefCell<Option<RgbaImage>>,
        pub notifications: RefCell<Vec<String>>,
        pub raised: Cell<usize>,
        pub revealed: Cell<usize>,
        pub clipboard_broken: bool,
        /// Only `reveal_window` makes the window visible.
        pub visible: Cell<bool>,
    }

    impl FakeDesktop {
        pub fn at(x: i32, y: i32) -> Self {
            let desktop = FakeDesktop::default();
            desktop.position.set(Some(WindowPosition { x, y }));
            desktop
        }
    }

    impl Desktop for FakeDesktop {
        fn raise(&self) {
            self.raised.set(self.raised.get() + 1);
        }

        fn window_position(&self) -> Option<WindowPosition> {
            self.position.get()
        }

        fn move_window(&self, position: WindowPosition) {
            self.position.set(Some(position));
            self.moves.borrow_mut().push(position);
        }

        fn reveal_window(&self) {
            self.revealed.set(self.revealed.get() + 1);
            self.visible.set(true);
        }

        fn set_clipboard_image(&self, image: &RgbaImage) -> Result<(), ClipboardError> {
            if self.clipboard_broken {
                return Err(ClipboardError::Unavailable(arboard::Error::ClipboardNotSupported));
            }
            *self.clipboard.borrow_mut() = Some(image.clone());
            Ok(())
        }

        fn notify(&self, title: &str, body: &str) {
            self.notifications.borrow_mut().push(format!("{title}: {body}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeDesktop;
    use super::*;
    use crate::capture::CaptureError;
    use std::path::PathBuf;

    fn shot(kind: CaptureKind, w: u32, h: u32) -> SavedScreenshot {
        SavedScreenshot {
            kind,
            path: PathBuf::from(format!("/tmp/{}_screenshot_x.png", kind.prefix())),
            image: RgbaImage::from_pixel(w, h, image::Rgba([9, 8, 7, 255])),
        }
    }

    fn open_dialog(desktop: FakeDesktop) -> Controller<FakeDesktop> {
        let mut controller = Controller::new(desktop);
        assert!(controller.trigger());
        controller
    }

    #[test]
    fn trigger_raises_and_opens_dialog() {
        let controller = open_dialog(FakeDesktop::at(5, 5));
        assert_eq!(controller.phase(), Phase::DialogOpen);
        assert_eq!(controller.desktop().raised.get(), 1);
    }

    #[test]
    fn trigger_keeps_hidden_window_hidden() {
        let mut controller = open_dialog(FakeDesktop::at(5, 5));
        controller.choose(Choice::Cancelled);
        assert!(controller.trigger());

        let desktop = controller.desktop();
        assert!(!desktop.visible.get());
        assert_eq!(desktop.revealed.get(), 0);
        assert!(desktop.moves.borrow().is_empty());
    }

    #[test]
    fn dialog_failure_reports_and_returns_to_idle() {
        let mut controller = open_dialog(FakeDesktop::at(5, 5));
        controller.dialog_failed(&CaptureError::CaptureFailed("no webview".into()).into());

        let desktop = controller.desktop();
        assert_eq!(desktop.notifications.borrow().len(), 1);
        assert!(desktop.moves.borrow().is_empty());
        assert!(!desktop.visible.get());
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(controller.trigger());
    }

    #[test]
    fn triggers_while_busy_are_dropped() {
        let mut controller = open_dialog(FakeDesktop::at(5, 5));
        assert!(!controller.trigger());

        controller.choose(Choice::Full);
        assert!(!controller.trigger());
        assert_eq!(controller.desktop().raised.get(), 1);
    }

    #[test]
    fn cancel_leaves_window_and_clipboard_alone() {
        let mut controller = open_dialog(FakeDesktop::at(40, 60));
        assert_eq!(controller.choose(Choice::Cancelled), None);

        let desktop = controller.desktop();
        assert!(desktop.moves.borrow().is_empty());
        assert_eq!(desktop.position.get(), Some(WindowPosition { x: 40, y: 60 }));
        assert!(desktop.clipboard.borrow().is_none());
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn full_capture_parks_window_then_restores_it() {
        let mut controller = open_dialog(FakeDesktop::at(40, 60));
        assert_eq!(controller.choose(Choice::Full), Some(CaptureKind::Full));
        assert_eq!(controller.desktop().position.get(), Some(OFFSCREEN_POSITION));
        assert_eq!(controller.phase(), Phase::Capturing(CaptureKind::Full));

        let saved = shot(CaptureKind::Full, 16, 9);
        let pixels = saved.image.clone();
        controller.finish_full(Ok(saved));

        let desktop = controller.desktop();
        assert_eq!(desktop.position.get(), Some(WindowPosition { x: 40, y: 60 }));
        assert_eq!(desktop.clipboard.borrow().as_ref(), Some(&pixels));
        assert!(desktop.notifications.borrow().is_empty());
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn failed_capture_notifies_and_restores() {
        let mut controller = open_dialog(FakeDesktop::at(1, 2));
        controller.choose(Choice::Full);
        controller.finish_full(Err(CaptureError::CaptureFailed("denied".into()).into()));

        let desktop = controller.desktop();
        assert_eq!(desktop.position.get(), Some(WindowPosition { x: 1, y: 2 }));
        assert!(desktop.clipboard.borrow().is_none());
        assert_eq!(
            desktop.notifications.borrow().as_slice(),
            ["Error: Failed to capture screenshot: Screen capture failed: denied"]
        );
        assert_eq!(desktop.revealed.get(), 0);
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn missing_display_reveals_window() {
        let mut controller = open_dialog(FakeDesktop::at(1, 2));
        controller.choose(Choice::Cropped);
        let frame = controller.begin_crop(Err(CaptureError::NoDisplay.into()));

        assert!(frame.is_none());
        let desktop = controller.desktop();
        assert_eq!(desktop.revealed.get(), 1);
        assert_eq!(desktop.position.get(), Some(WindowPosition { x: 1, y: 2 }));
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn crop_flow_publishes_and_restores() {
        let mut controller = open_dialog(FakeDesktop::at(300, 200));
        assert_eq!(controller.choose(Choice::Cropped), Some(CaptureKind::Cropped));

        let frame = controller.begin_crop(Ok(RgbaImage::new(64, 48))).unwrap();
        assert_eq!(frame.dimensions(), (64, 48));
        assert_eq!(controller.phase(), Phase::Cropping);
        assert!(!controller.trigger());

        let saved = shot(CaptureKind::Cropped, 10, 5);
        let pixels = saved.image.clone();
        controller.finish_crop(CropOutcome::Saved(saved));

        let desktop = controller.desktop();
        assert_eq!(desktop.clipboard.borrow().as_ref(), Some(&pixels));
        assert_eq!(desktop.position.get(), Some(WindowPosition { x: 300, y: 200 }));
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn cancelled_crop_changes_no_clipboard() {
        let mut controller = open_dialog(FakeDesktop::at(3, 4));
        controller.choose(Choice::Cropped);
        controller.begin_crop(Ok(RgbaImage::new(8, 8)));
        controller.finish_crop(CropOutcome::Cancelled);

        let desktop = controller.desktop();
        assert!(desktop.clipboard.borrow().is_none());
        assert!(desktop.notifications.borrow().is_empty());
        assert_eq!(desktop.position.get(), Some(WindowPosition { x: 3, y: 4 }));
        assert!(controller.trigger());
    }

    #[test]
    fn clipboard_failure_is_reported_but_not_fatal() {
        let mut desktop = FakeDesktop::at(0, 0);
        desktop.clipboard_broken = true;
        let mut controller = open_dialog(desktop);
        controller.choose(Choice::Full);
        controller.finish_full(Ok(shot(CaptureKind::Full, 2, 2)));

        assert_eq!(controller.desktop().notifications.borrow().len(), 1);
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn unknown_position_skips_restore_move() {
        let mut controller = open_dialog(FakeDesktop::default());
        controller.choose(Choice::Full);
        controller.finish_full(Ok(shot(CaptureKind::Full, 2, 2)));

        assert_eq!(
            controller.desktop().moves.borrow().as_slice(),
            [OFFSCREEN_POSITION]
        );
    }

    #[test]
    fn stray_choice_is_ignored() {
        let mut controller = Controller::new(FakeDesktop::at(0, 0));
        assert_eq!(controller.choose(Choice::Full), None);
        assert!(controller.desktop().moves.borrow().is_empty());
        assert_eq!(controller.phase(), Phase::Idle);
    }
}
