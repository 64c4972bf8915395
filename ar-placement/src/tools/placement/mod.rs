//! Model placement at the reticle.
//!
//! ## Flow
//!
//! ```text
//! SessionInput (queue)
//!   └─> ModelSelected ──> SelectedModel (Resource)
//!   └─> PlacementRequested
//!         └─> place_at_reticle
//!               ├─ Reticle missing or hidden -> rejected, logged
//!               ├─ Template not loaded       -> rejected, logged
//!               └─ SceneRoot clone of template at reticle translation
//! ```
//!
//! Placed models are independent entities. Each gets its own `SceneRoot`
//! pointing at the shared template scene, which Bevy instantiates as a copy,
//! so the template is never modified.

/// Spawn rule and model selection systems.
pub mod spawn;

/// Reticle spawning once its template resolves.
pub mod reticle;

/// Resources, components and events for placement.
pub mod state;

use bevy::prelude::*;

use crate::engine::core::app_setup::ArSet;
use spawn::{apply_model_selection, place_at_reticle};
use state::{ModelSelected, PlacementRequested, SelectedModel};

// Registers model selection and placement at the reticle.
pub struct PlacementPlugin;

impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectedModel>()
            .add_event::<ModelSelected>()
            .add_event::<PlacementRequested>()
            .add_systems(
                Update,
                (apply_model_selection, place_at_reticle)
                    .chain()
                    .in_set(ArSet::Placement),
            );
    }
}
