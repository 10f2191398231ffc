//! Global hotkey listener.
//!
//! The OS shortcut callback (from `tauri-plugin-global-shortcut`) only pushes
//! a `Signal::Pressed` into a small bounded queue. A dedicated
//! `hotkey-listener` thread drains that queue for the lifetime of the app and
//! hands each press to a callback, which in the app posts a task onto the UI
//! thread. Nothing else crosses the thread boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tauri::AppHandle;
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};

/// Presses beyond this many undelivered ones are dropped.
const QUEUE_DEPTH: usize = 4;

pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Pressed,
    Shutdown,
}

/// Cloneable handle used by the OS callback to report a press.
#[derive(Clone)]
pub struct HotkeySender {
    queue: SyncSender<Signal>,
}

impl HotkeySender {
    pub fn press(&self) {
        match self.queue.try_send(Signal::Pressed) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => log::debug!("Hotkey press dropped, queue full"),
            Err(TrySendError::Disconnected(_)) => {
                log::warn!("Hotkey press after listener shut down")
            }
        }
    }
}

pub struct HotkeyListener {
    queue: SyncSender<Signal>,
    stopping: Arc<AtomicBool>,
    done: Receiver<()>,
    handle: JoinHandle<()>,
}

impl HotkeyListener {
    /// Starts the listener thread. `on_press` runs on that thread once per press.
    pub fn spawn<F>(on_press: F) -> Result<Self, HotkeyError>
    where
        F: Fn() + Send + 'static,
    {
        let (queue, signals) = mpsc::sync_channel(QUEUE_DEPTH);
        let (done_tx, done) = mpsc::channel();
        let stopping = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stopping);

        let handle = thread::Builder::new()
            .name("hotkey-listener".into())
            .spawn(move || {
                log::debug!("Hotkey listener started");
                while let Ok(Signal::Pressed) = signals.recv() {
                    if stop_flag.load(Ordering::Acquire) {
                        break;
                    }
                    on_press();
                }
                log::debug!("Hotkey listener stopped");
                let _ = done_tx.send(());
            })
            .map_err(HotkeyError::Spawn)?;

        Ok(Self {
            queue,
            stopping,
            done,
            handle,
        })
    }

    pub fn sender(&self) -> HotkeySender {
        HotkeySender {
            queue: self.queue.clone(),
        }
    }

    /// Asks the listener to stop and waits up to `timeout` for it.
    ///
    /// Returns `false` if the thread did not finish in time; it is then left
    /// detached.
    pub fn shutdown(self, timeout: Duration) -> bool {
        self.stopping.store(true, Ordering::Release);
        // A full queue still stops the loop: the flag is checked per press.
        let _ = self.queue.try_send(Signal::Shutdown);

        match self.done.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                let _ = self.handle.join();
                true
            }
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("Hotkey listener did not stop within {:?}", timeout);
                false
            }
        }
    }
}

pub fn parse_shortcut(accelerator: &str) -> Result<Shortcut, HotkeyError> {
    accelerator
        .parse::<Shortcut>()
        .map_err(|e| HotkeyError::InvalidShortcut {
            accelerator: accelerator.to_string(),
            reason: e.to_string(),
        })
}

/// Registers `accelerator` globally; each press is forwarded to `sender`.
pub fn register(
    app: &AppHandle,
    accelerator: &str,
    sender: HotkeySender,
) -> Result<Shortcut, HotkeyError> {
    let shortcut = parse_shortcut(accelerator)?;

    app.global_shortcut()
        .on_shortcut(shortcut, move |_app, _shortcut, event| {
            if event.state == ShortcutState::Pressed {
                sender.press();
            }
        })
        .map_err(|e| HotkeyError::Register {
            accelerator: accelerator.to_string(),
            reason: e.to_string(),
        })?;

    log::info!("Global hotkey {} registered", accelerator);
    Ok(shortcut)
}

pub fn unregister_all(app: &AppHandle) {
    if let Err(e) = app.global_shortcut().unregister_all() {
        log::warn!("Failed to release global hotkeys: {}", e);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[error("Invalid hotkey {accelerator:?}: {reason}")]
    InvalidShortcut { accelerator: String, reason: String },

    #[error("Failed to register hotkey {accelerator:?}: {reason}")]
    Register { accelerator: String, reason: String },

    #[error("Failed to start hotkey listener thread: {0}")]
    Spawn(#[source] std::io::Error),
}
