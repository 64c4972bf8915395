use bevy::prelude::*;

use crate::tools::placement::state::Reticle;

/// Overlay state mirrored into the DOM on WASM builds.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OverlayState {
    pub spawn_button_visible: bool,
}

/// The spawn button is shown only while the reticle exists and is visible.
pub fn refresh_spawn_button(
    reticles: Query<&Visibility, With<Reticle>>,
    mut overlay: ResMut<OverlayState>,
) {
    let visible = reticles
        .iter()
        .any(|visibility| *visibility == Visibility::Visible);
    if overlay.spawn_button_visible != visible {
        overlay.spawn_button_visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<OverlayState>()
            .add_systems(Update, refresh_spawn_button);
        app
    }

    fn spawn_button_visible(app: &App) -> bool {
        app.world().resource::<OverlayState>().spawn_button_visible
    }

    #[test]
    fn spawn_button_starts_hidden_and_follows_the_reticle() {
        let mut app = app();
        app.update();
        assert!(!spawn_button_visible(&app));

        let reticle = app.world_mut().spawn((Reticle, Visibility::Hidden)).id();
        app.update();
        assert!(!spawn_button_visible(&app));

        app.world_mut().entity_mut(reticle).insert(Visibility::Visible);
        app.update();
        assert!(spawn_button_visible(&app));
    }
}
