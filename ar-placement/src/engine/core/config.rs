use bevy::prelude::*;
use constants::assets::PLACEMENT_MANIFEST_PATH;

/// How placement is triggered during a session.
///
/// `Overlay` places the selected model through the DOM spawn button.
/// `SelectGesture` ignores the overlay buttons and places a skeleton on
/// every session `select` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Overlay,
    SelectGesture,
}

impl InteractionMode {
    /// Convert a URL or command-line value to an interaction mode.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "overlay" => Some(Self::Overlay),
            "select" | "gesture" => Some(Self::SelectGesture),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overlay => "overlay",
            Self::SelectGesture => "select",
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct ArConfig {
    pub interaction_mode: InteractionMode,
    /// Asset path of the placement manifest.
    pub manifest_path: String,
}

impl Default for ArConfig {
    fn default() -> Self {
        Self {
            interaction_mode: InteractionMode::default(),
            manifest_path: PLACEMENT_MANIFEST_PATH.to_string(),
        }
    }
}

impl ArConfig {
    pub fn with_mode(interaction_mode: InteractionMode) -> Self {
        Self {
            interaction_mode,
            ..default()
        }
    }

    /// Read `?mode=` from a query string. Unknown values keep the default.
    pub fn from_query(query: &str) -> Self {
        let mode = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "mode")
            .and_then(|(_, value)| {
                let mode = InteractionMode::from_string(value);
                if mode.is_none() {
                    warn!("Unknown interaction mode '{value}', using overlay");
                }
                mode
            })
            .unwrap_or_default();
        Self::with_mode(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_selects_interaction_mode() {
        assert_eq!(
            ArConfig::from_query("?mode=select").interaction_mode,
            InteractionMode::SelectGesture
        );
        assert_eq!(
            ArConfig::from_query("?debug=1&mode=Overlay").interaction_mode,
            InteractionMode::Overlay
        );
        assert_eq!(
            ArConfig::from_query("?mode=teleport").interaction_mode,
            InteractionMode::Overlay
        );
        assert_eq!(ArConfig::from_query("").manifest_path, "placement_manifest.json");
    }
}
