use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Every model the session loads, including the placement cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Reticle,
    Flower,
    Skeleton,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Reticle, ModelKind::Flower, ModelKind::Skeleton];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reticle => "reticle",
            Self::Flower => "flower",
            Self::Skeleton => "skeleton",
        }
    }
}

/// Models a user can place in the scene. Defaults to the skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceableModel {
    #[default]
    Skeleton,
    Flower,
}

impl PlaceableModel {
    /// Convert a button or query identifier to a placeable model.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "skeleton" => Some(Self::Skeleton),
            "flower" => Some(Self::Flower),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Self::Skeleton => ModelKind::Skeleton,
            Self::Flower => ModelKind::Flower,
        }
    }
}

/// A resolved model: the loaded scene plus its shadow setting.
///
/// The scene handle is only ever cloned into new `SceneRoot`s, so the
/// template itself is never mutated after load.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelTemplate {
    pub scene: Handle<Scene>,
    pub cast_shadows: bool,
}

/// Templates resolved so far. A `None` slot means the load is pending or failed.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ModelTemplates {
    reticle: Option<ModelTemplate>,
    flower: Option<ModelTemplate>,
    skeleton: Option<ModelTemplate>,
}

impl ModelTemplates {
    pub fn get(&self, kind: ModelKind) -> Option<&ModelTemplate> {
        self.slot(kind).as_ref()
    }

    pub fn placeable(&self, model: PlaceableModel) -> Option<&ModelTemplate> {
        self.get(model.kind())
    }

    /// Record a resolved template, returning the previous one if the kind
    /// had already resolved.
    pub fn insert(&mut self, kind: ModelKind, template: ModelTemplate) -> Option<ModelTemplate> {
        self.slot_mut(kind).replace(template)
    }

    pub fn is_loaded(&self, kind: ModelKind) -> bool {
        self.get(kind).is_some()
    }

    fn slot(&self, kind: ModelKind) -> &Option<ModelTemplate> {
        match kind {
            ModelKind::Reticle => &self.reticle,
            ModelKind::Flower => &self.flower,
            ModelKind::Skeleton => &self.skeleton,
        }
    }

    fn slot_mut(&mut self, kind: ModelKind) -> &mut Option<ModelTemplate> {
        match kind {
            ModelKind::Reticle => &mut self.reticle,
            ModelKind::Flower => &mut self.flower,
            ModelKind::Skeleton => &mut self.skeleton,
        }
    }
}
