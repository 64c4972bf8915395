use bevy::prelude::*;

use super::reticle::visible_reticle_translation;
use super::state::*;
use crate::engine::assets::model_templates::ModelTemplates;
use crate::engine::scene::shadows::ShadowCasting;

/// Record the model chosen by the selection buttons.
pub fn apply_model_selection(
    mut events: EventReader<ModelSelected>,
    mut selected: ResMut<SelectedModel>,
) {
    for ModelSelected(model) in events.read() {
        info!("{} model selected", model.as_str());
        selected.0 = *model;
    }
}

/// Clone the requested model at the reticle.
///
/// Places nothing unless the reticle exists and is visible, and the model's
/// template has loaded.
pub fn place_at_reticle(
    mut requests: EventReader<PlacementRequested>,
    selected: Res<SelectedModel>,
    templates: Res<ModelTemplates>,
    reticles: Query<(&Transform, &Visibility), With<Reticle>>,
    mut commands: Commands,
) {
    for request in requests.read() {
        let model = request.model.unwrap_or(selected.0);

        let Some(translation) = visible_reticle_translation(&reticles) else {
            info!("Reticle is not visible. Cannot place model.");
            continue;
        };

        let Some(template) = templates.placeable(model) else {
            info!("{} model has not loaded yet. Cannot place model.", model.as_str());
            continue;
        };

        commands.spawn((
            SceneRoot(template.scene.clone()),
            Transform::from_translation(translation),
            ShadowCasting(template.cast_shadows),
            PlacedModel { model },
            Name::new(format!("{}_placed", model.as_str())),
        ));
        info!("{} model spawned at reticle location {}", model.as_str(), translation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::model_templates::{ModelKind, PlaceableModel};
    use crate::engine::core::config::ArConfig;
    use crate::engine::core::app_setup::create_headless_app;
    use crate::engine::tracking::frame_update::{ViewerPose, XrFrameSnapshot};
    use crate::overlay::input::{SessionInput, SessionInputQueue};
    use crate::xr::simulated::load_placeholder_model;

    struct Harness {
        app: App,
        queue: SessionInputQueue,
    }

    impl Harness {
        fn new() -> Self {
            let queue = SessionInputQueue::default();
            let app = create_headless_app(ArConfig::default(), queue.clone(), false);
            Self { app, queue }
        }

        fn load(&mut self, kind: ModelKind) -> Handle<Scene> {
            let handle = load_placeholder_model(self.app.world_mut(), kind);
            self.app.update();
            handle
        }

        fn hit(&mut self, position: Vec3) {
            self.app.insert_resource(XrFrameSnapshot::tracked(
                ViewerPose {
                    world_from_view: Mat4::IDENTITY,
                    clip_from_view: Mat4::perspective_rh_gl(1.0, 1.0, 0.1, 100.0),
                    viewport: UVec2::new(800, 600),
                },
                vec![position],
            ));
            self.app.update();
        }

        fn input(&mut self, input: SessionInput) {
            self.queue.push(input);
            self.app.update();
        }

        fn placed(&mut self) -> Vec<(PlaceableModel, Vec3, Handle<Scene>)> {
            let world = self.app.world_mut();
            let mut query = world.query::<(&PlacedModel, &Transform, &SceneRoot)>();
            query
                .iter(world)
                .map(|(placed, transform, root)| (placed.model, transform.translation, root.0.clone()))
                .collect()
        }
    }

    #[test]
    fn spawn_without_reticle_is_rejected() {
        let mut harness = Harness::new();
        harness.load(ModelKind::Skeleton);
        harness.hit(Vec3::ONE);

        harness.input(SessionInput::Spawn);

        assert!(harness.placed().is_empty());
    }

    #[test]
    fn spawn_with_hidden_reticle_is_rejected() {
        let mut harness = Harness::new();
        harness.load(ModelKind::Skeleton);
        harness.load(ModelKind::Reticle);

        harness.input(SessionInput::Spawn);
        harness.input(SessionInput::Spawn);

        assert!(harness.placed().is_empty());
    }

    #[test]
    fn spawn_without_loaded_template_places_nothing() {
        let mut harness = Harness::new();
        harness.load(ModelKind::Reticle);
        harness.hit(Vec3::new(0.0, 0.0, -1.0));

        harness.input(SessionInput::Spawn);

        assert!(harness.placed().is_empty());
    }

    #[test]
    fn selection_decides_the_cloned_model() {
        let mut harness = Harness::new();
        let skeleton = harness.load(ModelKind::Skeleton);
        let flower = harness.load(ModelKind::Flower);
        harness.load(ModelKind::Reticle);
        harness.hit(Vec3::new(0.0, 0.0, -1.0));

        harness.input(SessionInput::SelectModel(PlaceableModel::Flower));
        assert_eq!(
            *harness.app.world().resource::<SelectedModel>(),
            SelectedModel(PlaceableModel::Flower)
        );
        harness.input(SessionInput::Spawn);

        harness.input(SessionInput::SelectModel(PlaceableModel::Skeleton));
        assert_eq!(
            *harness.app.world().resource::<SelectedModel>(),
            SelectedModel(PlaceableModel::Skeleton)
        );
        harness.input(SessionInput::Spawn);

        let mut placed = harness.placed();
        placed.sort_by_key(|(model, _, _)| *model == PlaceableModel::Skeleton);
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].0, PlaceableModel::Flower);
        assert_eq!(placed[0].2, flower);
        assert_eq!(placed[1].0, PlaceableModel::Skeleton);
        assert_eq!(placed[1].2, skeleton);
    }

    #[test]
    fn load_order_does_not_change_templates() {
        let mut flower_first = Harness::new();
        let mut skeleton_first = Harness::new();

        let flower_a = flower_first.load(ModelKind::Flower);
        let skeleton_a = flower_first.load(ModelKind::Skeleton);
        let skeleton_b = skeleton_first.load(ModelKind::Skeleton);
        let flower_b = skeleton_first.load(ModelKind::Flower);

        let templates_a = flower_first.app.world().resource::<ModelTemplates>().clone();
        let templates_b = skeleton_first.app.world().resource::<ModelTemplates>().clone();

        for templates in [&templates_a, &templates_b] {
            assert!(templates.is_loaded(ModelKind::Flower));
            assert!(templates.is_loaded(ModelKind::Skeleton));
            assert!(!templates.is_loaded(ModelKind::Reticle));
        }
        assert_eq!(templates_a.get(ModelKind::Flower).unwrap().scene, flower_a);
        assert_eq!(templates_a.get(ModelKind::Skeleton).unwrap().scene, skeleton_a);
        assert_eq!(templates_b.get(ModelKind::Flower).unwrap().scene, flower_b);
        assert_eq!(templates_b.get(ModelKind::Skeleton).unwrap().scene, skeleton_b);
        assert_eq!(
            templates_a.get(ModelKind::Skeleton).unwrap().cast_shadows,
            templates_b.get(ModelKind::Skeleton).unwrap().cast_shadows
        );
    }
}
