//! Compile-time settings shared across the AR placement workspace.

/// Asset paths and manifest locations.
pub mod assets;

/// DOM element ids and labels for the entry button and in-session overlay.
pub mod overlay;

/// Scene dimensions and light placement.
pub mod scene;

/// WebXR session mode and feature identifiers.
pub mod session;
