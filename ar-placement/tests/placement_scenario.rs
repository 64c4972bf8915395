use ar_placement::engine::assets::model_templates::{ModelKind, ModelTemplates, PlaceableModel};
use ar_placement::engine::core::app_state::ExitReason;
use ar_placement::engine::tracking::frame_update::{ViewerPose, XrFrameSnapshot};
use ar_placement::overlay::input::{SessionInput, SessionInputQueue};
use ar_placement::overlay::spawn_button::OverlayState;
use ar_placement::tools::placement::state::{PlacedModel, Reticle};
use ar_placement::xr::frame_loop::{FrameOutcome, XrFrameLoop};
use ar_placement::xr::simulated::{SimulatedTeardown, load_placeholder_model, run_simulated_session};
use ar_placement::{ArConfig, InteractionMode, create_headless_app};
use bevy::prelude::*;

fn tracked(hits: Vec<Vec3>) -> XrFrameSnapshot {
    XrFrameSnapshot::tracked(
        ViewerPose {
            world_from_view: Mat4::from_translation(Vec3::new(0.0, 1.6, 0.0)),
            clip_from_view: Mat4::perspective_rh_gl(1.0, 0.5, 0.1, 100.0),
            viewport: UVec2::new(1080, 2160),
        },
        hits,
    )
}

fn session(
    mode: InteractionMode,
) -> (XrFrameLoop<SimulatedTeardown>, SessionInputQueue, SimulatedTeardown) {
    let queue = SessionInputQueue::default();
    let teardown = SimulatedTeardown::default();
    let app = create_headless_app(ArConfig::with_mode(mode), queue.clone(), false);
    (XrFrameLoop::new(app, teardown.clone()), queue, teardown)
}

fn placed(frame_loop: &mut XrFrameLoop<SimulatedTeardown>) -> Vec<(PlaceableModel, Vec3, Handle<Scene>)> {
    let world = frame_loop.app_mut().world_mut();
    let mut query = world.query::<(&PlacedModel, &Transform, &SceneRoot)>();
    query
        .iter(world)
        .map(|(placed, transform, root)| (placed.model, transform.translation, root.0.clone()))
        .collect()
}

#[test]
fn skeleton_spawns_at_reticle_hit() {
    let (mut frame_loop, queue, _teardown) = session(InteractionMode::Overlay);
    let world = frame_loop.app_mut().world_mut();
    let skeleton = load_placeholder_model(world, ModelKind::Skeleton);
    load_placeholder_model(world, ModelKind::Reticle);
    frame_loop.on_frame(XrFrameSnapshot::lost());
    let template_before = frame_loop
        .app()
        .world()
        .resource::<ModelTemplates>()
        .clone();

    frame_loop.on_frame(tracked(vec![Vec3::new(1.0, 0.0, -2.0)]));
    assert!(frame_loop.app().world().resource::<OverlayState>().spawn_button_visible);

    queue.push(SessionInput::Spawn);
    assert_eq!(frame_loop.on_frame(tracked(vec![])), FrameOutcome::Continue);

    let placed = placed(&mut frame_loop);
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].0, PlaceableModel::Skeleton);
    assert_eq!(placed[0].1, Vec3::new(1.0, 0.0, -2.0));
    assert_eq!(placed[0].2, skeleton);

    assert_eq!(
        *frame_loop.app().world().resource::<ModelTemplates>(),
        template_before
    );
}

#[test]
fn spawn_is_a_no_op_until_reticle_is_visible() {
    let (mut frame_loop, queue, _teardown) = session(InteractionMode::Overlay);
    let world = frame_loop.app_mut().world_mut();
    load_placeholder_model(world, ModelKind::Skeleton);
    load_placeholder_model(world, ModelKind::Flower);

    for snapshot in [XrFrameSnapshot::lost(), tracked(vec![Vec3::ONE]), tracked(vec![])] {
        queue.push(SessionInput::Spawn);
        queue.push(SessionInput::SelectModel(PlaceableModel::Flower));
        queue.push(SessionInput::Spawn);
        frame_loop.on_frame(snapshot);
    }
    assert!(placed(&mut frame_loop).is_empty());

    // The reticle arrives late and is hidden until the next hit.
    load_placeholder_model(frame_loop.app_mut().world_mut(), ModelKind::Reticle);
    queue.push(SessionInput::Spawn);
    frame_loop.on_frame(tracked(vec![]));
    assert!(placed(&mut frame_loop).is_empty());
    assert!(!frame_loop.app().world().resource::<OverlayState>().spawn_button_visible);

    queue.push(SessionInput::Spawn);
    frame_loop.on_frame(tracked(vec![Vec3::new(0.0, 0.0, -1.0)]));
    let placed = placed(&mut frame_loop);
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].0, PlaceableModel::Flower);
}

#[test]
fn select_gesture_places_only_skeletons() {
    let (mut frame_loop, queue, _teardown) = session(InteractionMode::SelectGesture);
    let world = frame_loop.app_mut().world_mut();
    for kind in ModelKind::ALL {
        load_placeholder_model(world, kind);
    }
    frame_loop.on_frame(tracked(vec![Vec3::new(0.5, 0.0, -1.0)]));

    queue.push(SessionInput::SelectModel(PlaceableModel::Flower));
    queue.push(SessionInput::Spawn);
    frame_loop.on_frame(tracked(vec![]));
    assert!(placed(&mut frame_loop).is_empty());

    queue.push(SessionInput::SelectAction);
    frame_loop.on_frame(tracked(vec![]));
    let placed = placed(&mut frame_loop);
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].0, PlaceableModel::Skeleton);
    assert_eq!(placed[0].1, Vec3::new(0.5, 0.0, -1.0));
}

#[test]
fn reticle_spawns_hidden_when_its_template_loads() {
    let (mut frame_loop, _queue, _teardown) = session(InteractionMode::Overlay);
    load_placeholder_model(frame_loop.app_mut().world_mut(), ModelKind::Reticle);
    frame_loop.on_frame(XrFrameSnapshot::lost());

    let world = frame_loop.app_mut().world_mut();
    let mut reticles = world.query_filtered::<&Visibility, With<Reticle>>();
    let visibilities: Vec<Visibility> = reticles.iter(world).copied().collect();
    assert_eq!(visibilities, vec![Visibility::Hidden]);
}

#[test]
fn every_exit_path_tears_down_exactly_once() {
    for (input, reason) in [
        (Some(SessionInput::Back), ExitReason::BackButton),
        (Some(SessionInput::BackGesture), ExitReason::BackGesture),
        (None, ExitReason::HostEnded),
    ] {
        let (mut frame_loop, queue, teardown) = session(InteractionMode::Overlay);
        frame_loop.on_frame(XrFrameSnapshot::lost());

        match input {
            Some(input) => {
                queue.push(input);
                assert_eq!(frame_loop.on_frame(XrFrameSnapshot::lost()), FrameOutcome::Stop);
            }
            None => {
                frame_loop.end_session(ExitReason::HostEnded);
            }
        }
        // The host's end notification always follows.
        frame_loop.end_session(ExitReason::HostEnded);
        queue.push(SessionInput::Back);
        assert_eq!(frame_loop.on_frame(XrFrameSnapshot::lost()), FrameOutcome::Stop);

        assert_eq!(teardown.reasons(), vec![reason]);
    }
}

#[test]
fn simulated_overlay_session_places_both_models() {
    let report = run_simulated_session(ArConfig::with_mode(InteractionMode::Overlay), false).unwrap();

    assert_eq!(report.frames, 7);
    assert_eq!(report.exit_reason, Some(ExitReason::BackButton));
    assert_eq!(report.teardowns, 1);

    let mut placed = report.placed.clone();
    placed.sort_by_key(|(model, _)| *model == PlaceableModel::Flower);
    assert_eq!(
        placed,
        vec![
            (PlaceableModel::Skeleton, Vec3::new(1.0, 0.0, -2.0)),
            (PlaceableModel::Flower, Vec3::new(-0.5, 0.0, -1.5)),
        ]
    );
}

#[test]
fn simulated_select_session_places_skeletons() {
    let report =
        run_simulated_session(ArConfig::with_mode(InteractionMode::SelectGesture), false).unwrap();

    assert_eq!(report.teardowns, 1);
    assert_eq!(report.placed.len(), 2);
    assert!(
        report
            .placed
            .iter()
            .all(|(model, _)| *model == PlaceableModel::Skeleton)
    );
}
