use bevy::prelude::*;

use crate::engine::assets::model_templates::PlaceableModel;

// Resources

/// Model the spawn button places. Set only by the selection buttons.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectedModel(pub PlaceableModel);

// Components

/// Placement cursor following the first hit-test result.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Reticle;

/// A model placed by the user.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedModel {
    pub model: PlaceableModel,
}

// Events

/// A selection button was clicked.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSelected(pub PlaceableModel);

/// Request to place a model at the reticle. `None` places the selected model.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacementRequested {
    pub model: Option<PlaceableModel>,
}
