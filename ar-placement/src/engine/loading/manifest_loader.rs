use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::assets::placement_manifest::{ActiveManifest, PlacementManifest};
use crate::engine::core::config::ArConfig;
use crate::engine::loading::progress::LoadingProgress;

#[derive(Resource, Default)]
pub struct ManifestLoader {
    handle: Option<Handle<PlacementManifest>>,
}

// Start the manifest load
pub fn start_loading(
    mut manifest_loader: ResMut<ManifestLoader>,
    asset_server: Res<AssetServer>,
    config: Res<ArConfig>,
) {
    info!("Loading placement manifest from: {}", config.manifest_path);
    manifest_loader.handle = Some(asset_server.load(config.manifest_path.clone()));
}

/// Choose the session manifest once the served copy loads or fails.
pub fn resolve_manifest(
    mut loading_progress: ResMut<LoadingProgress>,
    manifest_loader: Res<ManifestLoader>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<PlacementManifest>>,
) {
    if loading_progress.manifest_resolved {
        return;
    }
    let Some(ref handle) = manifest_loader.handle else {
        return;
    };

    let manifest = if let Some(manifest) = manifests.get(handle) {
        match manifest.validate() {
            Ok(()) => {
                info!("✓ Placement manifest loaded");
                manifest.clone()
            }
            Err(err) => {
                warn!("Served placement manifest rejected ({err}), using bundled copy");
                PlacementManifest::bundled()
            }
        }
    } else if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle.id()) {
        warn!("Placement manifest failed to load ({err}), using bundled copy");
        PlacementManifest::bundled()
    } else {
        return;
    };

    commands.insert_resource(ActiveManifest(manifest));
    loading_progress.manifest_resolved = true;
}
