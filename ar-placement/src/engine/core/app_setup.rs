use bevy::app::PluginsState;
use bevy::asset::AssetMetaCheck;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

// Crate engine modules
use crate::engine::assets::model_templates::ModelTemplates;
use crate::engine::assets::placement_manifest::PlacementManifest;
use crate::engine::core::app_state::{ExitRequested, SessionLifecycle, handle_exit_requests};
use crate::engine::core::config::ArConfig;
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::manifest_loader::{ManifestLoader, resolve_manifest, start_loading};
use crate::engine::loading::model_loader::{
    ModelLoadFailed, ModelLoaded, ModelLoader, apply_model_loads, start_model_loads,
    track_model_loads,
};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::setup::setup_scene;
use crate::engine::scene::shadows::apply_shadow_policy;
use crate::engine::tracking::frame_update::{
    RenderViewport, TrackingState, apply_xr_frame, resize_to_viewport,
};
// Crate overlay and tools modules
use crate::overlay::OverlayPlugin;
use crate::overlay::input::SessionInputQueue;
use crate::tools::placement::PlacementPlugin;

/// Per-update ordering. Host input is drained first so a click and the
/// frame that follows it act on the same state.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArSet {
    Input,
    Loading,
    Frame,
    Placement,
    Presentation,
}

/// Everything the session needs except platform plugins and the asset
/// loaders. Templates arrive as [`ModelLoaded`] events from either
/// [`AssetLoadingPlugin`] or the simulated host.
pub struct ArPlacementPlugin;

impl Plugin for ArPlacementPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                ArSet::Input,
                ArSet::Loading,
                ArSet::Frame,
                ArSet::Placement,
                ArSet::Presentation,
            )
                .chain(),
        );

        // Initialise resources early
        app.init_resource::<ArConfig>()
            .init_resource::<ModelTemplates>()
            .init_resource::<LoadingProgress>()
            .init_resource::<TrackingState>()
            .init_resource::<RenderViewport>()
            .init_resource::<SessionLifecycle>()
            .add_event::<ModelLoaded>()
            .add_event::<ModelLoadFailed>()
            .add_event::<ExitRequested>();

        app.add_plugins(OverlayPlugin)
            .add_plugins(PlacementPlugin);

        app.add_systems(Startup, setup_scene)
            .add_systems(Update, apply_model_loads.in_set(ArSet::Loading))
            .add_systems(
                Update,
                (apply_xr_frame, resize_to_viewport)
                    .chain()
                    .in_set(ArSet::Frame),
            )
            .add_systems(
                Update,
                (handle_exit_requests, apply_shadow_policy).in_set(ArSet::Presentation),
            );
    }
}

/// Manifest and model loading. Each model becomes placeable as soon as its
/// own load resolves.
pub struct AssetLoadingPlugin;

impl Plugin for AssetLoadingPlugin {
    fn build(&self, app: &mut App) {
        // Registers PlacementManifest as a loadable asset type from JSON files.
        app.add_plugins(JsonAssetPlugin::<PlacementManifest>::new(&["json"]))
            .init_resource::<ManifestLoader>()
            .init_resource::<ModelLoader>()
            .add_systems(Startup, start_loading)
            .add_systems(
                Update,
                (resolve_manifest, start_model_loads, track_model_loads)
                    .chain()
                    .before(apply_model_loads)
                    .in_set(ArSet::Loading),
            );
    }
}

/// Browser app. The session's frame callback drives `App::update`, so the
/// winit runner is left out.
pub fn create_app(config: ArConfig, queue: SessionInputQueue) -> App {
    let mut app = App::new();

    #[cfg(target_arch = "wasm32")]
    register_remote_asset_source(&mut app);

    app.add_plugins(create_default_plugins())
        .add_plugins(ArPlacementPlugin)
        .add_plugins(AssetLoadingPlugin)
        .insert_resource(config)
        .insert_resource(queue);

    app
}

/// App without a window, renderer or asset loaders, driven by the simulated
/// host and tests.
pub fn create_headless_app(config: ArConfig, queue: SessionInputQueue, with_logging: bool) -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins).add_plugins(AssetPlugin::default());
    if with_logging {
        app.add_plugins(LogPlugin::default());
    }

    // Asset types the scene and placement systems touch.
    app.init_asset::<Scene>()
        .init_asset::<Mesh>()
        .init_asset::<StandardMaterial>();

    app.add_plugins(ArPlacementPlugin)
        .insert_resource(config)
        .insert_resource(queue);

    finish_plugins(&mut app);
    app
}

/// Finish plugin setup once every plugin reports ready. Returns false while
/// some plugin is still initialising asynchronously.
pub fn finish_plugins(app: &mut App) -> bool {
    match app.plugins_state() {
        PluginsState::Ready => {
            app.finish();
            app.cleanup();
            true
        }
        PluginsState::Finished | PluginsState::Cleaned => true,
        PluginsState::Adding => false,
    }
}

/// Lets manifest entries name `https://` URLs. Sources must exist before
/// `AssetPlugin` is added.
#[cfg(target_arch = "wasm32")]
fn register_remote_asset_source(app: &mut App) {
    use bevy::asset::io::AssetSource;
    use bevy::asset::io::wasm::HttpWasmAssetReader;

    app.register_asset_source(
        constants::assets::REMOTE_ASSET_SOURCE,
        AssetSource::build().with_reader(|| Box::new(HttpWasmAssetReader::new("https://"))),
    );
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .disable::<bevy::winit::WinitPlugin>()
}
