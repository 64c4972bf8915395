use crate::engine::assets::model_templates::ModelKind;
use bevy::prelude::*;
use constants::assets::{FLOWER_MODEL_PATH, RETICLE_MODEL_PATH, SKELETON_MODEL_PATH};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Manifest shipped with the binary, used when the served copy cannot be loaded.
const BUNDLED_MANIFEST: &str = include_str!("../../../assets/placement_manifest.json");

/// Source and shadow setting for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub kind: ModelKind,
    /// Asset path. `https://` paths are fetched from the remote source.
    pub path: String,
    #[serde(default)]
    pub cast_shadows: bool,
}

/// Placement manifest as a Bevy asset. Mirrors the JSON structure exactly.
#[derive(Asset, TypePath, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementManifest {
    pub models: Vec<ModelEntry>,
}

/// Manifest validated and chosen for this session.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ActiveManifest(pub PlacementManifest);

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("manifest lists the {0} model more than once")]
    DuplicateKind(&'static str),
    #[error("manifest does not list the {0} model")]
    MissingKind(&'static str),
}

impl PlacementManifest {
    pub fn from_json_str(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// The manifest embedded at compile time, or the constant defaults if
    /// the embedded copy is somehow invalid.
    pub fn bundled() -> Self {
        Self::from_json_str(BUNDLED_MANIFEST).unwrap_or_else(|err| {
            warn!("Bundled placement manifest rejected ({err}), using built-in paths");
            Self::defaults()
        })
    }

    /// Manifest built from the compile-time asset constants.
    pub fn defaults() -> Self {
        Self {
            models: vec![
                ModelEntry {
                    kind: ModelKind::Reticle,
                    path: RETICLE_MODEL_PATH.to_string(),
                    cast_shadows: false,
                },
                ModelEntry {
                    kind: ModelKind::Flower,
                    path: FLOWER_MODEL_PATH.to_string(),
                    cast_shadows: false,
                },
                ModelEntry {
                    kind: ModelKind::Skeleton,
                    path: SKELETON_MODEL_PATH.to_string(),
                    cast_shadows: true,
                },
            ],
        }
    }

    /// Exactly one entry per model kind.
    pub fn validate(&self) -> Result<(), ManifestError> {
        for kind in ModelKind::ALL {
            match self.models.iter().filter(|entry| entry.kind == kind).count() {
                0 => return Err(ManifestError::MissingKind(kind.as_str())),
                1 => {}
                _ => return Err(ManifestError::DuplicateKind(kind.as_str())),
            }
        }
        Ok(())
    }

    pub fn entry(&self, kind: ModelKind) -> Option<&ModelEntry> {
        self.models.iter().find(|entry| entry.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_manifest_matches_defaults() {
        let bundled = PlacementManifest::from_json_str(BUNDLED_MANIFEST).unwrap();
        assert_eq!(bundled, PlacementManifest::defaults());
        assert!(bundled.entry(ModelKind::Skeleton).unwrap().cast_shadows);
        assert!(!bundled.entry(ModelKind::Reticle).unwrap().cast_shadows);
    }

    #[test]
    fn flower_is_served_by_the_remote_source() {
        use bevy::asset::AssetPath;
        use bevy::asset::io::AssetSourceId;
        use constants::assets::REMOTE_ASSET_SOURCE;

        let manifest = PlacementManifest::bundled();
        let flower = AssetPath::parse(&manifest.entry(ModelKind::Flower).unwrap().path);
        assert_eq!(flower.source(), &AssetSourceId::from(REMOTE_ASSET_SOURCE));
        assert!(
            flower
                .path()
                .starts_with("immersive-web.github.io/webxr-samples/media/gltf/sunflower")
        );

        let reticle = AssetPath::parse(&manifest.entry(ModelKind::Reticle).unwrap().path);
        assert_eq!(reticle.source(), &AssetSourceId::Default);
    }

    #[test]
    fn cast_shadows_defaults_to_false() {
        let json = r#"{"models": [
            {"kind": "reticle", "path": "r.gltf"},
            {"kind": "flower", "path": "f.gltf"},
            {"kind": "skeleton", "path": "s.glb", "cast_shadows": true}
        ]}"#;
        let manifest = PlacementManifest::from_json_str(json).unwrap();
        assert!(!manifest.entry(ModelKind::Flower).unwrap().cast_shadows);
    }

    #[test]
    fn rejects_duplicate_and_missing_kinds() {
        let duplicate = r#"{"models": [
            {"kind": "reticle", "path": "r.gltf"},
            {"kind": "flower", "path": "f.gltf"},
            {"kind": "flower", "path": "f2.gltf"},
            {"kind": "skeleton", "path": "s.glb"}
        ]}"#;
        assert!(matches!(
            PlacementManifest::from_json_str(duplicate),
            Err(ManifestError::DuplicateKind("flower"))
        ));

        let missing = r#"{"models": [{"kind": "reticle", "path": "r.gltf"}]}"#;
        assert!(matches!(
            PlacementManifest::from_json_str(missing),
            Err(ManifestError::MissingKind("flower"))
        ));
    }

    #[test]
    fn rejects_unknown_kind() {
        let json = r#"{"models": [{"kind": "teapot", "path": "t.gltf"}]}"#;
        assert!(matches!(
            PlacementManifest::from_json_str(json),
            Err(ManifestError::Parse(_))
        ));
    }
}
