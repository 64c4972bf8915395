use bevy::prelude::*;

use super::state::Reticle;
use crate::engine::assets::model_templates::ModelTemplate;
use crate::engine::scene::shadows::ShadowCasting;

/// Spawn the reticle hidden; it becomes visible on the first hit-test result.
pub fn spawn_reticle(commands: &mut Commands, template: &ModelTemplate) -> Entity {
    commands
        .spawn((
            SceneRoot(template.scene.clone()),
            Transform::IDENTITY,
            Visibility::Hidden,
            ShadowCasting(template.cast_shadows),
            Reticle,
            Name::new("Reticle"),
        ))
        .id()
}

/// Translation of the reticle, if it exists and is currently shown.
pub fn visible_reticle_translation(
    reticles: &Query<(&Transform, &Visibility), With<Reticle>>,
) -> Option<Vec3> {
    reticles
        .iter()
        .find(|(_, visibility)| **visibility == Visibility::Visible)
        .map(|(transform, _)| transform.translation)
}
