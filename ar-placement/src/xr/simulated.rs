//! A scripted immersive host.
//!
//! Drives the same bootstrap, frame loop and placement code as the browser
//! build, with model templates supplied as empty placeholder scenes.

use std::cell::RefCell;
use std::rc::Rc;

use bevy::prelude::*;
use bevy::tasks::block_on;

use crate::engine::assets::model_templates::{ModelKind, PlaceableModel};
use crate::engine::assets::placement_manifest::PlacementManifest;
use crate::engine::core::app_setup::create_headless_app;
use crate::engine::core::app_state::ExitReason;
use crate::engine::core::config::{ArConfig, InteractionMode};
use crate::engine::loading::model_loader::ModelLoaded;
use crate::engine::tracking::frame_update::{ViewerPose, XrFrameSnapshot};
use crate::overlay::input::{SessionInput, SessionInputQueue};
use crate::tools::placement::state::PlacedModel;
use crate::xr::error::XrError;
use crate::xr::frame_loop::{FrameOutcome, SessionTeardown, XrFrameLoop};
use crate::xr::host::{ImmersiveHost, ReferenceSpaceKind, SessionRequest};
use crate::xr::session::bootstrap_session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStep {
    SupportQuery,
    SessionRequest,
    LocalSpace,
    ViewerSpace,
    HitTestSource,
    EndSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedSession {
    pub id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedHitTestSource {
    pub space: ReferenceSpaceKind,
}

/// Host that grants everything unless told to fail at one step. Every call
/// is recorded, including the failing one.
pub struct SimulatedHost {
    supported: bool,
    fail_at: Option<BootstrapStep>,
    steps: RefCell<Vec<BootstrapStep>>,
    last_request: RefCell<Option<SessionRequest>>,
}

impl Default for SimulatedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self {
            supported: true,
            fail_at: None,
            steps: RefCell::new(Vec::new()),
            last_request: RefCell::new(None),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    pub fn failing_at(step: BootstrapStep) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::new()
        }
    }

    pub fn steps(&self) -> Vec<BootstrapStep> {
        self.steps.borrow().clone()
    }

    pub fn last_request(&self) -> Option<SessionRequest> {
        self.last_request.borrow().clone()
    }

    fn record(&self, step: BootstrapStep) -> bool {
        self.steps.borrow_mut().push(step);
        self.fail_at != Some(step)
    }
}

impl ImmersiveHost for SimulatedHost {
    type Session = SimulatedSession;
    type Space = ReferenceSpaceKind;
    type HitTestSource = SimulatedHitTestSource;

    async fn is_session_supported(&self, _mode: &str) -> Result<bool, XrError> {
        if !self.record(BootstrapStep::SupportQuery) {
            return Err(XrError::MissingGlobal("navigator.xr"));
        }
        Ok(self.supported)
    }

    async fn request_session(&self, request: &SessionRequest) -> Result<SimulatedSession, XrError> {
        *self.last_request.borrow_mut() = Some(request.clone());
        if !self.record(BootstrapStep::SessionRequest) {
            return Err(XrError::SessionRequest("denied by user".to_string()));
        }
        Ok(SimulatedSession { id: 1 })
    }

    async fn request_reference_space(
        &self,
        _session: &SimulatedSession,
        kind: ReferenceSpaceKind,
    ) -> Result<ReferenceSpaceKind, XrError> {
        let step = match kind {
            ReferenceSpaceKind::Local => BootstrapStep::LocalSpace,
            ReferenceSpaceKind::Viewer => BootstrapStep::ViewerSpace,
        };
        if !self.record(step) {
            return Err(XrError::ReferenceSpace {
                kind,
                reason: "not supported".to_string(),
            });
        }
        Ok(kind)
    }

    async fn request_hit_test_source(
        &self,
        _session: &SimulatedSession,
        space: &ReferenceSpaceKind,
    ) -> Result<SimulatedHitTestSource, XrError> {
        if !self.record(BootstrapStep::HitTestSource) {
            return Err(XrError::HitTestSource("hit-test feature unavailable".to_string()));
        }
        Ok(SimulatedHitTestSource { space: *space })
    }

    fn end_session(&self, _session: &SimulatedSession) {
        self.record(BootstrapStep::EndSession);
    }
}

/// Records teardown calls. Clones share one log.
#[derive(Debug, Clone, Default)]
pub struct SimulatedTeardown {
    reasons: Rc<RefCell<Vec<ExitReason>>>,
}

impl SimulatedTeardown {
    pub fn reasons(&self) -> Vec<ExitReason> {
        self.reasons.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.reasons.borrow().len()
    }
}

impl SessionTeardown for SimulatedTeardown {
    fn teardown(&mut self, reason: ExitReason) {
        info!("Removing simulated canvas and overlay");
        self.reasons.borrow_mut().push(reason);
    }
}

/// Resolve a model with an empty scene, as if its load just finished.
/// Shadow settings come from the bundled manifest.
pub fn load_placeholder_model(world: &mut World, kind: ModelKind) -> Handle<Scene> {
    let scene = world
        .resource_mut::<Assets<Scene>>()
        .add(Scene::new(World::new()));
    let cast_shadows = PlacementManifest::bundled()
        .entry(kind)
        .is_some_and(|entry| entry.cast_shadows);

    world.send_event(ModelLoaded {
        kind,
        scene: scene.clone(),
        cast_shadows,
    });
    scene
}

/// One host frame: inputs that arrive before it, then its snapshot.
#[derive(Debug, Clone)]
pub struct ScriptedFrame {
    pub inputs: Vec<SessionInput>,
    pub snapshot: XrFrameSnapshot,
}

impl ScriptedFrame {
    fn new(snapshot: XrFrameSnapshot) -> Self {
        Self {
            inputs: Vec::new(),
            snapshot,
        }
    }

    fn with_input(mut self, input: SessionInput) -> Self {
        self.inputs.push(input);
        self
    }
}

fn standing_pose() -> ViewerPose {
    ViewerPose {
        world_from_view: Mat4::from_translation(Vec3::new(0.0, 1.6, 0.0)),
        clip_from_view: Mat4::perspective_rh_gl(1.2, 0.5, 0.1, 1000.0),
        viewport: UVec2::new(1080, 2160),
    }
}

/// A short session: tracking starts lost, a surface is found, models are
/// placed, and the user leaves.
pub fn demo_script(mode: InteractionMode) -> Vec<ScriptedFrame> {
    let place = match mode {
        InteractionMode::Overlay => SessionInput::Spawn,
        InteractionMode::SelectGesture => SessionInput::SelectAction,
    };
    let surface = Vec3::new(1.0, 0.0, -2.0);
    let second_surface = Vec3::new(-0.5, 0.0, -1.5);

    vec![
        // Placing before any surface was found is rejected.
        ScriptedFrame::new(XrFrameSnapshot::lost()).with_input(place),
        ScriptedFrame::new(XrFrameSnapshot::tracked(standing_pose(), vec![])),
        ScriptedFrame::new(XrFrameSnapshot::tracked(standing_pose(), vec![surface])),
        ScriptedFrame::new(XrFrameSnapshot::tracked(standing_pose(), vec![surface])).with_input(place),
        ScriptedFrame::new(XrFrameSnapshot::tracked(standing_pose(), vec![second_surface]))
            .with_input(SessionInput::SelectModel(PlaceableModel::Flower)),
        ScriptedFrame::new(XrFrameSnapshot::lost()).with_input(place),
        ScriptedFrame::new(XrFrameSnapshot::lost()).with_input(SessionInput::Back),
        // Never reached: the session ended on the previous frame.
        ScriptedFrame::new(XrFrameSnapshot::lost()),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub frames: u64,
    pub placed: Vec<(PlaceableModel, Vec3)>,
    pub exit_reason: Option<ExitReason>,
    pub teardowns: usize,
}

/// Bootstrap against [`SimulatedHost`] and play [`demo_script`].
pub fn run_simulated_session(config: ArConfig, with_logging: bool) -> Result<SimulationReport, XrError> {
    let host = SimulatedHost::new();
    let request = SessionRequest::for_mode(config.interaction_mode);
    let context = block_on(bootstrap_session(&host, &request))?;

    let queue = SessionInputQueue::default();
    let teardown = SimulatedTeardown::default();
    let mode = config.interaction_mode;
    let app = create_headless_app(config, queue.clone(), with_logging);
    let mut frame_loop = XrFrameLoop::new(app, teardown.clone());

    for kind in ModelKind::ALL {
        load_placeholder_model(frame_loop.app_mut().world_mut(), kind);
    }

    info!("Simulated session {} started in {} mode", context.session.id, mode.as_str());
    for frame in demo_script(mode) {
        for input in frame.inputs {
            queue.push(input);
        }
        if frame_loop.on_frame(frame.snapshot) == FrameOutcome::Stop {
            break;
        }
    }
    if frame_loop.is_active() {
        frame_loop.end_session(ExitReason::HostEnded);
    }

    let world = frame_loop.app_mut().world_mut();
    let mut placed_query = world.query::<(&PlacedModel, &Transform)>();
    let placed = placed_query
        .iter(world)
        .map(|(placed, transform)| (placed.model, transform.translation))
        .collect();

    Ok(SimulationReport {
        frames: frame_loop.frames(),
        placed,
        exit_reason: teardown.reasons().first().copied(),
        teardowns: teardown.count(),
    })
}
