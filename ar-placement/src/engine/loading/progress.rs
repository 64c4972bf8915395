use crate::engine::assets::model_templates::ModelKind;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelLoadStatus {
    #[default]
    NotRequested,
    Pending,
    Loaded,
    Failed,
}

#[derive(Resource, Debug, Default)]
pub struct LoadingProgress {
    pub manifest_resolved: bool,
    pub reticle: ModelLoadStatus,
    pub flower: ModelLoadStatus,
    pub skeleton: ModelLoadStatus,
}

impl LoadingProgress {
    pub fn status(&self, kind: ModelKind) -> ModelLoadStatus {
        match kind {
            ModelKind::Reticle => self.reticle,
            ModelKind::Flower => self.flower,
            ModelKind::Skeleton => self.skeleton,
        }
    }

    pub fn set(&mut self, kind: ModelKind, status: ModelLoadStatus) {
        match kind {
            ModelKind::Reticle => self.reticle = status,
            ModelKind::Flower => self.flower = status,
            ModelKind::Skeleton => self.skeleton = status,
        }
    }

    /// True once no load is still in flight.
    pub fn settled(&self) -> bool {
        ModelKind::ALL.iter().all(|kind| {
            matches!(
                self.status(*kind),
                ModelLoadStatus::Loaded | ModelLoadStatus::Failed
            )
        })
    }
}
