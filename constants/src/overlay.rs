pub const ENTRY_BUTTON_ID: &str = "enter-ar-btn";
pub const ENTRY_LABEL_SUPPORTED: &str = "Enter AR";
pub const ENTRY_LABEL_UNSUPPORTED: &str = "AR not found";

/// Root element bound to the session's DOM overlay feature.
pub const OVERLAY_ROOT_ID: &str = "overlay";

pub const BACK_BUTTON_ID: &str = "back-button";
pub const SKELETON_BUTTON_ID: &str = "model-skeleton";
pub const SKELETON_BUTTON_LABEL: &str = "Skeleton";
pub const FLOWER_BUTTON_ID: &str = "model-flower";
pub const FLOWER_BUTTON_LABEL: &str = "Flower";
pub const SPAWN_BUTTON_ID: &str = "spawn-button";
pub const SPAWN_BUTTON_LABEL: &str = "Place 3D Model";
