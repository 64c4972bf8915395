//! Core application setup and session state.
//!
//! Builds the Bevy app for both the browser session and the headless
//! simulation, and tracks how the session ends.

/// Application setup and plugin configuration.
///
/// Creates the app with scene setup, asset loading, the per-frame tracking
/// systems and the placement tools, ordered through [`app_setup::ArSet`].
pub mod app_setup;

/// Session lifecycle and exit requests.
pub mod app_state;

/// Runtime configuration: interaction mode and manifest location.
pub mod config;

/// Canvas window configuration for WASM builds.
pub mod window_config;
