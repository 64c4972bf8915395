//! Model identifiers, loaded templates, and the placement manifest.
//!
//! Handles the JSON manifest describing where each model lives and the
//! resource holding scene handles once their loads resolve.

/// Model identifiers and the template registry filled as loads resolve.
pub mod model_templates;

/// Placement manifest asset listing model sources and shadow settings.
pub mod placement_manifest;
