//! Scene construction and shadow configuration.
//!
//! Builds the minimal AR scene (directional light and shadow-catching
//! ground) and applies per-model shadow casting once scene meshes spawn.

/// Light, ground plane and externally driven camera spawned at startup.
pub mod setup;

/// Per-model shadow casting for meshes spawned from glTF scenes.
pub mod shadows;
