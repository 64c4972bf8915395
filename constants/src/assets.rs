/// Placement manifest, relative to the asset root.
pub const PLACEMENT_MANIFEST_PATH: &str = "placement_manifest.json";

/// Asset source serving `https://` paths on the web build.
pub const REMOTE_ASSET_SOURCE: &str = "https";

/// Placement cursor shown on detected surfaces.
pub const RETICLE_MODEL_PATH: &str = "models/reticle.gltf";

/// Served by the immersive-web samples; resolved through [`REMOTE_ASSET_SOURCE`].
pub const FLOWER_MODEL_PATH: &str =
    "https://immersive-web.github.io/webxr-samples/media/gltf/sunflower/sunflower.gltf";

pub const SKELETON_MODEL_PATH: &str = "models/human_skeleton_1.6metres.glb";

/// Image shown inside the overlay back button, relative to the page.
pub const BACK_BUTTON_IMAGE_PATH: &str = "assets/images/back_button_white.svg";
