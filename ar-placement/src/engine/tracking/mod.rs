//! Per-frame application of session data to the scene.
//!
//! Each frame the host delivers an [`frame_update::XrFrameSnapshot`]. The
//! tracking systems copy the viewer pose into the camera, follow the first
//! hit-test result with the reticle, and track whether the pose is valid.

/// Frame snapshot resource, tracking state machine, and the frame systems.
pub mod frame_update;
