pub const IMMERSIVE_AR_MODE: &str = "immersive-ar";

pub const FEATURE_HIT_TEST: &str = "hit-test";
pub const FEATURE_DOM_OVERLAY: &str = "dom-overlay";

pub const REFERENCE_SPACE_LOCAL: &str = "local";
pub const REFERENCE_SPACE_VIEWER: &str = "viewer";
