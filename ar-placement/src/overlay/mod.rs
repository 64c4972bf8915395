//! Bridge between browser callbacks and the ECS, and overlay presentation.
//!
//! DOM buttons, the `popstate` back gesture and the session's `select`
//! event all push [`input::SessionInput`] values into a shared queue. The
//! queue is drained at the start of every update and turned into events
//! according to the configured interaction mode.
//!
//! ```text
//! button click / popstate / select
//!        │ push
//!        ▼
//! SessionInputQueue (Arc<Mutex<Vec<_>>>)
//!        │ drain_session_inputs
//!        ▼
//! ModelSelected | PlacementRequested | ExitRequested
//! ```

/// DOM overlay construction and spawn button mirroring (WASM only).
#[cfg(target_arch = "wasm32")]
pub mod dom_overlay;

/// Entry button label and enabled state from the AR support query.
pub mod entry_button;

/// Session input queue shared with host callbacks.
pub mod input;

/// Overlay presentation state derived from the scene.
pub mod spawn_button;

use bevy::prelude::*;

use crate::engine::core::app_setup::ArSet;
use input::{SessionInputQueue, drain_session_inputs};
use spawn_button::{OverlayState, refresh_spawn_button};

// Registers the input queue and overlay presentation systems.
pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SessionInputQueue>()
            .init_resource::<OverlayState>()
            .add_systems(Update, drain_session_inputs.in_set(ArSet::Input))
            .add_systems(Update, refresh_spawn_button.in_set(ArSet::Presentation));

        #[cfg(target_arch = "wasm32")]
        app.add_systems(
            Update,
            dom_overlay::sync_dom_overlay
                .after(refresh_spawn_button)
                .in_set(ArSet::Presentation),
        );
    }
}
