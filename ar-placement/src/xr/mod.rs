//! Immersive session host seam, session bootstrap, and the frame loop.
//!
//! [`host::ImmersiveHost`] abstracts the browser WebXR API so that
//! [`session::bootstrap_session`] runs unchanged against the real host on
//! WASM and against [`simulated::SimulatedHost`] natively and in tests.
//! [`frame_loop::XrFrameLoop`] owns the Bevy app for the lifetime of one
//! session and is fed one snapshot per host animation frame.

/// Bootstrap and binding errors.
pub mod error;

/// Frame loop driver and idempotent session teardown.
pub mod frame_loop;

/// Host trait, session request and reference space kinds.
pub mod host;

/// Session canvas, renderer surface binding and base layer blit (WASM only).
#[cfg(target_arch = "wasm32")]
pub mod layer;

/// Sequential session bootstrap.
pub mod session;

/// Scripted host for the native demo and tests.
pub mod simulated;

/// Browser activation, frame callbacks and teardown (WASM only).
#[cfg(target_arch = "wasm32")]
pub mod web_driver;

/// WebXR bindings and the browser host (WASM only).
#[cfg(target_arch = "wasm32")]
pub mod webxr;
