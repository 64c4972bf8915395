use bevy::prelude::*;

/// Why an immersive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Overlay back button.
    BackButton,
    /// Browser back navigation (`popstate`).
    BackGesture,
    /// The host ended the session on its own.
    HostEnded,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BackButton => "back button",
            Self::BackGesture => "back gesture",
            Self::HostEnded => "host ended session",
        }
    }
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionLifecycle {
    #[default]
    Active,
    /// An exit was requested; the frame loop tears down before the next frame.
    Ending(ExitReason),
    Ended(ExitReason),
}

impl SessionLifecycle {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        match self {
            Self::Active => None,
            Self::Ending(reason) | Self::Ended(reason) => Some(*reason),
        }
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitRequested {
    pub reason: ExitReason,
}

/// Only the first exit request counts. Later ones are logged and dropped.
pub fn handle_exit_requests(
    mut requests: EventReader<ExitRequested>,
    mut lifecycle: ResMut<SessionLifecycle>,
    mut app_exit: EventWriter<AppExit>,
) {
    for request in requests.read() {
        if !lifecycle.is_active() {
            debug!("Ignoring exit ({}), session already ending", request.reason.as_str());
            continue;
        }
        info!("→ Ending session: {}", request.reason.as_str());
        *lifecycle = SessionLifecycle::Ending(request.reason);
        app_exit.write(AppExit::Success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_exit_request_wins() {
        let mut app = App::new();
        app.init_resource::<SessionLifecycle>()
            .add_event::<ExitRequested>()
            .add_event::<AppExit>()
            .add_systems(Update, handle_exit_requests);

        app.world_mut().send_event(ExitRequested {
            reason: ExitReason::BackGesture,
        });
        app.world_mut().send_event(ExitRequested {
            reason: ExitReason::BackButton,
        });
        app.update();

        assert_eq!(
            *app.world().resource::<SessionLifecycle>(),
            SessionLifecycle::Ending(ExitReason::BackGesture)
        );
        assert!(app.should_exit().is_some());
    }
}
