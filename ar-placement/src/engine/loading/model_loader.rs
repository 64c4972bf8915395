use bevy::asset::LoadState;
use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;

use crate::engine::assets::model_templates::{ModelKind, ModelTemplate, ModelTemplates};
use crate::engine::assets::placement_manifest::ActiveManifest;
use crate::engine::loading::progress::{LoadingProgress, ModelLoadStatus};
use crate::tools::placement::reticle::spawn_reticle;
use crate::tools::placement::state::Reticle;

/// Fired when a model's scene finished loading.
#[derive(Event, Debug, Clone)]
pub struct ModelLoaded {
    pub kind: ModelKind,
    pub scene: Handle<Scene>,
    pub cast_shadows: bool,
}

/// Fired when a model's scene failed to load. The model stays unplaceable.
#[derive(Event, Debug, Clone)]
pub struct ModelLoadFailed {
    pub kind: ModelKind,
    pub reason: String,
}

struct PendingModel {
    kind: ModelKind,
    handle: Handle<Scene>,
    cast_shadows: bool,
}

#[derive(Resource, Default)]
pub struct ModelLoader {
    requested: bool,
    pending: Vec<PendingModel>,
}

/// Outcome of polling a single pending load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    InFlight,
    Loaded,
    Failed(String),
}

pub fn classify_load_state(state: Option<LoadState>) -> LoadOutcome {
    match state {
        Some(LoadState::Loaded) => LoadOutcome::Loaded,
        Some(LoadState::Failed(err)) => LoadOutcome::Failed(err.to_string()),
        _ => LoadOutcome::InFlight,
    }
}

/// Issue one scene load per manifest entry once the manifest is known.
pub fn start_model_loads(
    manifest: Option<Res<ActiveManifest>>,
    mut loader: ResMut<ModelLoader>,
    mut progress: ResMut<LoadingProgress>,
    asset_server: Res<AssetServer>,
) {
    if loader.requested {
        return;
    }
    let Some(manifest) = manifest else {
        return;
    };

    for entry in &manifest.0.models {
        info!("Loading {} model: {}", entry.kind.as_str(), entry.path);
        let handle = asset_server.load(GltfAssetLabel::Scene(0).from_asset(entry.path.clone()));
        loader.pending.push(PendingModel {
            kind: entry.kind,
            handle,
            cast_shadows: entry.cast_shadows,
        });
        progress.set(entry.kind, ModelLoadStatus::Pending);
    }
    loader.requested = true;
}

/// Poll pending loads, reporting each one exactly once.
pub fn track_model_loads(
    mut loader: ResMut<ModelLoader>,
    asset_server: Res<AssetServer>,
    mut loaded: EventWriter<ModelLoaded>,
    mut failed: EventWriter<ModelLoadFailed>,
) {
    loader.pending.retain(|pending| {
        match classify_load_state(asset_server.get_load_state(pending.handle.id())) {
            LoadOutcome::InFlight => true,
            LoadOutcome::Loaded => {
                loaded.write(ModelLoaded {
                    kind: pending.kind,
                    scene: pending.handle.clone(),
                    cast_shadows: pending.cast_shadows,
                });
                false
            }
            LoadOutcome::Failed(reason) => {
                failed.write(ModelLoadFailed {
                    kind: pending.kind,
                    reason,
                });
                false
            }
        }
    });
}

/// Record resolved templates. The reticle entity is created when its
/// template arrives and starts hidden.
pub fn apply_model_loads(
    mut loaded: EventReader<ModelLoaded>,
    mut failed: EventReader<ModelLoadFailed>,
    mut templates: ResMut<ModelTemplates>,
    mut progress: ResMut<LoadingProgress>,
    reticles: Query<(), With<Reticle>>,
    mut commands: Commands,
) {
    for event in loaded.read() {
        let template = ModelTemplate {
            scene: event.scene.clone(),
            cast_shadows: event.cast_shadows,
        };
        if templates.insert(event.kind, template.clone()).is_some() {
            warn!("{} model resolved twice, keeping latest", event.kind.as_str());
        }
        progress.set(event.kind, ModelLoadStatus::Loaded);
        info!("✓ {} model ready", event.kind.as_str());

        if event.kind == ModelKind::Reticle && reticles.is_empty() {
            spawn_reticle(&mut commands, &template);
        }
    }

    for event in failed.read() {
        error!(
            "Failed to load {} model: {}",
            event.kind.as_str(),
            event.reason
        );
        progress.set(event.kind, ModelLoadStatus::Failed);
    }

    if progress.is_changed() && progress.settled() {
        info!(
            "✓ Model loading settled (reticle: {:?}, flower: {:?}, skeleton: {:?})",
            progress.reticle, progress.flower, progress.skeleton
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<ModelTemplates>()
            .init_resource::<LoadingProgress>()
            .add_event::<ModelLoaded>()
            .add_event::<ModelLoadFailed>()
            .add_systems(Update, apply_model_loads);
        app
    }

    #[test]
    fn failed_load_leaves_model_unplaceable() {
        let mut app = app();
        app.world_mut().send_event(ModelLoadFailed {
            kind: ModelKind::Flower,
            reason: "404".to_string(),
        });
        app.world_mut().send_event(ModelLoaded {
            kind: ModelKind::Skeleton,
            scene: Handle::default(),
            cast_shadows: true,
        });
        app.update();

        let world = app.world();
        let templates = world.resource::<ModelTemplates>();
        assert!(!templates.is_loaded(ModelKind::Flower));
        assert!(templates.get(ModelKind::Skeleton).unwrap().cast_shadows);

        let progress = world.resource::<LoadingProgress>();
        assert_eq!(progress.status(ModelKind::Flower), ModelLoadStatus::Failed);
        assert_eq!(progress.status(ModelKind::Skeleton), ModelLoadStatus::Loaded);
        assert!(!progress.settled());
    }

    #[test]
    fn reticle_template_spawns_one_hidden_reticle() {
        let mut app = app();
        for _ in 0..2 {
            app.world_mut().send_event(ModelLoaded {
                kind: ModelKind::Reticle,
                scene: Handle::default(),
                cast_shadows: false,
            });
            app.update();
        }

        let world = app.world_mut();
        let mut reticles = world.query_filtered::<&Visibility, With<Reticle>>();
        let reticles: Vec<_> = reticles.iter(world).collect();
        assert_eq!(reticles, vec![&Visibility::Hidden]);
    }

    #[test]
    fn classifies_load_states() {
        assert_eq!(classify_load_state(None), LoadOutcome::InFlight);
        assert_eq!(
            classify_load_state(Some(LoadState::Loading)),
            LoadOutcome::InFlight
        );
        assert_eq!(
            classify_load_state(Some(LoadState::Loaded)),
            LoadOutcome::Loaded
        );
    }
}
