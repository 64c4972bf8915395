//! Browser augmented-reality model placement.
//!
//! An immersive AR session feeds viewer poses and surface hit-test results
//! into a Bevy scene each frame. A reticle follows the first hit, and the
//! user places skeleton or flower models at the reticle through a DOM
//! overlay or the session's select gesture.
//!
//! ## Architecture
//!
//! ```text
//! Entry button ──click──> Session bootstrap (xr::session)
//!                              │
//!                              ├─ Scene setup + asset loading (engine)
//!                              │
//!                              └─ XrFrameLoop ──App::update──> ECS systems
//!                                     ▲                           │
//! DOM overlay / select ──SessionInputQueue──────────────────────┘
//! ```
//!
//! Host callbacks never touch the `World` directly. They push
//! [`overlay::input::SessionInput`] values into a shared queue that is
//! drained at the start of every update.

/// Scene graph, asset loading, camera and per-frame tracking systems.
pub mod engine;

/// Bridge between DOM/host callbacks and the ECS, plus overlay presentation.
pub mod overlay;

/// Placement tools operating on the reticle and loaded model templates.
pub mod tools;

/// Immersive session host seam, bootstrap, and the frame loop driver.
pub mod xr;

pub use engine::core::app_setup::{ArPlacementPlugin, create_headless_app};
pub use engine::core::config::{ArConfig, InteractionMode};
