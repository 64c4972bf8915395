use bevy::prelude::*;
use bevy::window::PresentMode;

/// CSS selector of the canvas the session renders into.
pub const CANVAS_SELECTOR: &str = "#ar-canvas";

pub fn create_window_config() -> Window {
    Window {
        title: "AR Model Placement".to_string(),
        canvas: Some(CANVAS_SELECTOR.to_string()),
        fit_canvas_to_parent: true,
        prevent_default_event_handling: false,
        transparent: true,
        present_mode: PresentMode::AutoNoVsync,
        ..default()
    }
}
