//! Build script for the Screenshot Service Tauri app.
//!
//! Generates the Tauri context (config, embedded `ui/` assets, icons).

fn main() {
    tauri_build::build();
}
