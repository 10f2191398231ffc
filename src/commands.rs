//! Tauri commands invoked by the dialog and overlay pages.

use base64::{engine::general_purpose::STANDARD, Engine};
use tauri::{AppHandle, State};

use crate::app::{self, AppSession};
use crate::capture::{encode_png, Point};
use crate::dialog::Choice;

/// Dialog button or Escape.
#[tauri::command]
pub fn submit_choice(app: AppHandle, choice: Choice) {
    log::debug!("Dialog choice: {:?}", choice);
    app::submit_choice(&app, choice);
}

/// Frozen frame for the overlay to paint, as base64 PNG.
///
/// Encoding a full-resolution frame takes a while, so this runs off the UI
/// thread.
#[tauri::command]
pub async fn overlay_frame(session: State<'_, AppSession>) -> Result<serde_json::Value, String> {
    let frame = session.overlay_frame().ok_or("No capture in progress")?;

    let start = std::time::Instant::now();
    let png = encode_png(&frame).map_err(|e| e.to_string())?;
    log::info!(
        "Overlay frame encoded in {}ms ({} bytes)",
        start.elapsed().as_millis(),
        png.len()
    );

    Ok(serde_json::json!({
        "width": frame.width(),
        "height": frame.height(),
        "png": STANDARD.encode(&png),
    }))
}

#[tauri::command]
pub fn overlay_press(session: State<'_, AppSession>, x: i32, y: i32) {
    session.press(Point::new(x, y));
}

#[tauri::command]
pub fn overlay_move(session: State<'_, AppSession>, x: i32, y: i32) {
    session.drag(Point::new(x, y));
}

#[tauri::command]
pub fn overlay_release(app: AppHandle, x: i32, y: i32) {
    app::overlay_released(&app, Point::new(x, y));
}

#[tauri::command]
pub fn overlay_cancel(app: AppHandle) {
    app::overlay_cancelled(&app);
}
