//! Asset loading for the placement manifest and the three session models.
//!
//! The manifest resolves first (served copy or bundled fallback), then one
//! independent glTF scene load per model is issued. Each model becomes
//! usable the moment its own load resolves.

/// Placement manifest loading with bundled fallback.
pub mod manifest_loader;

/// Independent scene loads for the reticle, flower and skeleton.
///
/// Polls load states and reports each model as loaded or failed.
pub mod model_loader;

/// Per-model load status for logging and diagnostics.
pub mod progress;
