use std::fmt;

use constants::overlay::OVERLAY_ROOT_ID;
use constants::session::{
    FEATURE_DOM_OVERLAY, FEATURE_HIT_TEST, IMMERSIVE_AR_MODE, REFERENCE_SPACE_LOCAL,
    REFERENCE_SPACE_VIEWER,
};

use crate::engine::core::config::InteractionMode;
use crate::xr::error::XrError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceSpaceKind {
    /// World-anchored space that hit results and placements live in.
    Local,
    /// Space attached to the viewer, used as the hit-test ray origin.
    Viewer,
}

impl ReferenceSpaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => REFERENCE_SPACE_LOCAL,
            Self::Viewer => REFERENCE_SPACE_VIEWER,
        }
    }
}

impl fmt::Display for ReferenceSpaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments of the immersive session request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub mode: &'static str,
    pub required_features: Vec<&'static str>,
    pub optional_features: Vec<&'static str>,
    /// Element id bound as the DOM overlay root, when `dom-overlay` is required.
    pub dom_overlay_root: Option<&'static str>,
}

impl SessionRequest {
    pub fn for_mode(mode: InteractionMode) -> Self {
        match mode {
            InteractionMode::Overlay => Self {
                mode: IMMERSIVE_AR_MODE,
                required_features: vec![FEATURE_HIT_TEST, FEATURE_DOM_OVERLAY],
                optional_features: Vec::new(),
                dom_overlay_root: Some(OVERLAY_ROOT_ID),
            },
            InteractionMode::SelectGesture => Self {
                mode: IMMERSIVE_AR_MODE,
                required_features: vec![FEATURE_HIT_TEST],
                optional_features: Vec::new(),
                dom_overlay_root: None,
            },
        }
    }

    pub fn requires(&self, feature: &str) -> bool {
        self.required_features.contains(&feature)
    }
}

/// The immersive session runtime the bootstrap talks to.
///
/// Every request is awaited to completion before the next one starts, so
/// implementations never see overlapping calls.
#[allow(async_fn_in_trait)]
pub trait ImmersiveHost {
    type Session: Clone;
    type Space: Clone;
    type HitTestSource;

    async fn is_session_supported(&self, mode: &str) -> Result<bool, XrError>;

    async fn request_session(&self, request: &SessionRequest) -> Result<Self::Session, XrError>;

    async fn request_reference_space(
        &self,
        session: &Self::Session,
        kind: ReferenceSpaceKind,
    ) -> Result<Self::Space, XrError>;

    async fn request_hit_test_source(
        &self,
        session: &Self::Session,
        space: &Self::Space,
    ) -> Result<Self::HitTestSource, XrError>;

    /// Ask the host to end a session. Completion is reported through the
    /// host's own end notification.
    fn end_session(&self, session: &Self::Session);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_overlay_is_required_only_in_overlay_mode() {
        let overlay = SessionRequest::for_mode(InteractionMode::Overlay);
        assert_eq!(overlay.mode, "immersive-ar");
        assert!(overlay.requires("hit-test"));
        assert!(overlay.requires("dom-overlay"));
        assert_eq!(overlay.dom_overlay_root, Some("overlay"));

        let select = SessionRequest::for_mode(InteractionMode::SelectGesture);
        assert!(select.requires("hit-test"));
        assert!(!select.requires("dom-overlay"));
        assert_eq!(select.dom_overlay_root, None);
        assert!(select.optional_features.is_empty());
    }
}
