use std::cell::RefCell;

use bevy::prelude::*;

use crate::engine::core::app_state::{ExitReason, SessionLifecycle};
use crate::engine::tracking::frame_update::XrFrameSnapshot;
use crate::overlay::input::{SessionInput, SessionInputQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Schedule the next frame.
    Continue,
    /// The session is over; do not reschedule.
    Stop,
}

/// Releases whatever the platform created for a session.
pub trait SessionTeardown {
    /// Called at most once per session.
    fn teardown(&mut self, reason: ExitReason);
}

/// Owns the app for one immersive session and advances it once per host
/// frame.
///
/// The host reschedules its frame callback only while [`Self::is_active`]
/// holds, which makes teardown the single cancellation point.
pub struct XrFrameLoop<T: SessionTeardown> {
    app: App,
    teardown: T,
    torn_down: bool,
    frames: u64,
}

impl<T: SessionTeardown> XrFrameLoop<T> {
    pub fn new(app: App, teardown: T) -> Self {
        Self {
            app,
            teardown,
            torn_down: false,
            frames: 0,
        }
    }

    /// Run one update against this frame's host data.
    ///
    /// Pose loss and empty hit-test results are normal frames, never errors.
    /// The scene updates whether or not a pose was found.
    pub fn on_frame(&mut self, snapshot: XrFrameSnapshot) -> FrameOutcome {
        if self.torn_down {
            return FrameOutcome::Stop;
        }

        self.app.insert_resource(snapshot);
        self.app.update();
        self.frames += 1;

        if self.app.should_exit().is_some() {
            let reason = self
                .app
                .world()
                .resource::<SessionLifecycle>()
                .exit_reason()
                .unwrap_or(ExitReason::HostEnded);
            self.end_session(reason);
            return FrameOutcome::Stop;
        }

        FrameOutcome::Continue
    }

    /// Tear the session down. Returns false if it was already torn down.
    pub fn end_session(&mut self, reason: ExitReason) -> bool {
        if self.torn_down {
            debug!("Session already ended, ignoring {}", reason.as_str());
            return false;
        }
        self.torn_down = true;

        if let Some(mut lifecycle) = self.app.world_mut().get_resource_mut::<SessionLifecycle>() {
            *lifecycle = SessionLifecycle::Ended(reason);
        }
        info!("Session ended ({}) after {} frames", reason.as_str(), self.frames);

        self.teardown.teardown(reason);
        true
    }

    pub fn is_active(&self) -> bool {
        !self.torn_down
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

/// End the session from a page event such as a back click or `popstate`,
/// without waiting for the next host frame.
///
/// A frame that is running holds the loop borrowed. The request is then
/// queued for the loop's next update. Returns true if the session
/// ended here.
pub fn end_from_event<T: SessionTeardown>(
    frame_loop: &RefCell<XrFrameLoop<T>>,
    reason: ExitReason,
    queue: &SessionInputQueue,
) -> bool {
    match frame_loop.try_borrow_mut() {
        Ok(mut frame_loop) => frame_loop.end_session(reason),
        Err(_) => {
            if let Some(input) = SessionInput::for_exit(reason) {
                queue.push(input);
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::core::app_setup::create_headless_app;
    use crate::engine::core::config::ArConfig;
    use crate::xr::simulated::SimulatedTeardown;

    fn frame_loop() -> (XrFrameLoop<SimulatedTeardown>, SessionInputQueue, SimulatedTeardown) {
        let queue = SessionInputQueue::default();
        let teardown = SimulatedTeardown::default();
        let app = create_headless_app(ArConfig::default(), queue.clone(), false);
        (XrFrameLoop::new(app, teardown.clone()), queue, teardown)
    }

    #[test]
    fn back_button_tears_down_once() {
        let (mut frame_loop, queue, teardown) = frame_loop();
        assert_eq!(frame_loop.on_frame(XrFrameSnapshot::lost()), FrameOutcome::Continue);

        queue.push(SessionInput::Back);
        queue.push(SessionInput::BackGesture);
        assert_eq!(frame_loop.on_frame(XrFrameSnapshot::lost()), FrameOutcome::Stop);

        assert!(!frame_loop.is_active());
        assert_eq!(teardown.reasons(), vec![ExitReason::BackButton]);
        assert_eq!(
            *frame_loop.app().world().resource::<SessionLifecycle>(),
            SessionLifecycle::Ended(ExitReason::BackButton)
        );
    }

    #[test]
    fn back_gesture_tears_down_once() {
        let (mut frame_loop, queue, teardown) = frame_loop();

        queue.push(SessionInput::BackGesture);
        assert_eq!(frame_loop.on_frame(XrFrameSnapshot::lost()), FrameOutcome::Stop);
        assert!(!frame_loop.end_session(ExitReason::HostEnded));

        assert_eq!(teardown.reasons(), vec![ExitReason::BackGesture]);
    }

    #[test]
    fn host_end_is_idempotent_and_stops_frames() {
        let (mut frame_loop, _queue, teardown) = frame_loop();
        frame_loop.on_frame(XrFrameSnapshot::lost());

        assert!(frame_loop.end_session(ExitReason::HostEnded));
        assert!(!frame_loop.end_session(ExitReason::HostEnded));
        assert!(!frame_loop.end_session(ExitReason::BackButton));

        assert_eq!(frame_loop.on_frame(XrFrameSnapshot::lost()), FrameOutcome::Stop);
        assert_eq!(frame_loop.frames(), 1);
        assert_eq!(teardown.reasons(), vec![ExitReason::HostEnded]);
    }

    #[test]
    fn back_click_ends_the_session_without_another_frame() {
        let (frame_loop, queue, teardown) = frame_loop();
        let frame_loop = RefCell::new(frame_loop);

        assert!(end_from_event(&frame_loop, ExitReason::BackButton, &queue));
        assert!(!end_from_event(&frame_loop, ExitReason::BackGesture, &queue));

        assert_eq!(teardown.reasons(), vec![ExitReason::BackButton]);
        assert!(queue.is_empty());
        let frame_loop = frame_loop.borrow();
        assert!(!frame_loop.is_active());
        assert_eq!(frame_loop.frames(), 0);
    }

    #[test]
    fn exit_during_a_running_frame_is_queued_for_the_loop() {
        let (frame_loop, queue, teardown) = frame_loop();
        let frame_loop = RefCell::new(frame_loop);

        {
            let _running = frame_loop.borrow_mut();
            assert!(!end_from_event(&frame_loop, ExitReason::BackGesture, &queue));
        }
        assert_eq!(queue.len(), 1);
        assert!(teardown.reasons().is_empty());

        assert_eq!(
            frame_loop.borrow_mut().on_frame(XrFrameSnapshot::lost()),
            FrameOutcome::Stop
        );
        assert_eq!(teardown.reasons(), vec![ExitReason::BackGesture]);
    }
}
