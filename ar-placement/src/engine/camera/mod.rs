//! Camera driven by the immersive session.
//!
//! The session supplies view and projection matrices every tracked frame;
//! no controller or automatic update ever writes this camera.

/// Externally driven camera component and projection conversion.
pub mod xr_camera;
