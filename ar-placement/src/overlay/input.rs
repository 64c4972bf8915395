use std::sync::{Arc, Mutex};

use bevy::prelude::*;

use crate::engine::assets::model_templates::PlaceableModel;
use crate::engine::core::app_state::{ExitReason, ExitRequested};
use crate::engine::core::config::{ArConfig, InteractionMode};
use crate::tools::placement::state::{ModelSelected, PlacementRequested};

/// Something the user did outside the ECS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInput {
    /// A model selection button was clicked.
    SelectModel(PlaceableModel),
    /// The spawn button was clicked.
    Spawn,
    /// The overlay back button was clicked.
    Back,
    /// Browser back navigation.
    BackGesture,
    /// The session's `select` input event (tap or trigger).
    SelectAction,
}

impl SessionInput {
    /// The queued form of an exit request. Host-initiated ends have none.
    pub fn for_exit(reason: ExitReason) -> Option<Self> {
        match reason {
            ExitReason::BackButton => Some(Self::Back),
            ExitReason::BackGesture => Some(Self::BackGesture),
            ExitReason::HostEnded => None,
        }
    }
}

/// Thread-safe input queue shared between host callbacks and the app.
#[derive(Resource, Clone, Default)]
pub struct SessionInputQueue(Arc<Mutex<Vec<SessionInput>>>);

impl SessionInputQueue {
    pub fn push(&self, input: SessionInput) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(input);
        }
    }

    pub fn drain(&self) -> Vec<SessionInput> {
        if let Ok(mut queue) = self.0.lock() {
            std::mem::take(&mut *queue)
        } else {
            Vec::new()
        }
    }

    pub fn len(&self) -> usize {
        self.0.lock().map(|queue| queue.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Route queued inputs into events for the active interaction mode.
pub fn drain_session_inputs(
    queue: Res<SessionInputQueue>,
    config: Res<ArConfig>,
    mut selections: EventWriter<ModelSelected>,
    mut placements: EventWriter<PlacementRequested>,
    mut exits: EventWriter<ExitRequested>,
) {
    for input in queue.drain() {
        match (input, config.interaction_mode) {
            (SessionInput::Back, _) => {
                exits.write(ExitRequested {
                    reason: ExitReason::BackButton,
                });
            }
            (SessionInput::BackGesture, _) => {
                exits.write(ExitRequested {
                    reason: ExitReason::BackGesture,
                });
            }
            (SessionInput::SelectModel(model), InteractionMode::Overlay) => {
                selections.write(ModelSelected(model));
            }
            (SessionInput::Spawn, InteractionMode::Overlay) => {
                placements.write(PlacementRequested { model: None });
            }
            (SessionInput::SelectAction, InteractionMode::SelectGesture) => {
                placements.write(PlacementRequested {
                    model: Some(PlaceableModel::Skeleton),
                });
            }
            (input, mode) => {
                debug!("Ignoring {:?} in {} mode", input, mode.as_str());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(mode: InteractionMode) -> (App, SessionInputQueue) {
        let queue = SessionInputQueue::default();
        let mut app = App::new();
        app.insert_resource(queue.clone())
            .insert_resource(ArConfig::with_mode(mode))
            .add_event::<ModelSelected>()
            .add_event::<PlacementRequested>()
            .add_event::<ExitRequested>()
            .add_systems(Update, drain_session_inputs);
        (app, queue)
    }

    fn drained<E: Event + Clone>(app: &mut App) -> Vec<E> {
        app.world_mut()
            .resource_mut::<Events<E>>()
            .drain()
            .collect()
    }

    #[test]
    fn overlay_mode_routes_buttons_and_ignores_select() {
        let (mut app, queue) = app(InteractionMode::Overlay);
        queue.push(SessionInput::SelectModel(PlaceableModel::Flower));
        queue.push(SessionInput::Spawn);
        queue.push(SessionInput::SelectAction);
        queue.push(SessionInput::Back);
        app.update();

        assert!(queue.is_empty());
        assert_eq!(
            drained::<ModelSelected>(&mut app),
            vec![ModelSelected(PlaceableModel::Flower)]
        );
        assert_eq!(
            drained::<PlacementRequested>(&mut app),
            vec![PlacementRequested { model: None }]
        );
        assert_eq!(
            drained::<ExitRequested>(&mut app),
            vec![ExitRequested {
                reason: ExitReason::BackButton
            }]
        );
    }

    #[test]
    fn select_mode_places_skeleton_and_ignores_buttons() {
        let (mut app, queue) = app(InteractionMode::SelectGesture);
        queue.push(SessionInput::SelectModel(PlaceableModel::Flower));
        queue.push(SessionInput::Spawn);
        queue.push(SessionInput::SelectAction);
        queue.push(SessionInput::BackGesture);
        app.update();

        assert!(drained::<ModelSelected>(&mut app).is_empty());
        assert_eq!(
            drained::<PlacementRequested>(&mut app),
            vec![PlacementRequested {
                model: Some(PlaceableModel::Skeleton)
            }]
        );
        assert_eq!(
            drained::<ExitRequested>(&mut app),
            vec![ExitRequested {
                reason: ExitReason::BackGesture
            }]
        );
    }
}
