use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::engine::camera::xr_camera::{XrCamera, apply_view_matrices};
use crate::tools::placement::state::Reticle;

/// Pose data for the first view of a tracked frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerPose {
    pub world_from_view: Mat4,
    pub clip_from_view: Mat4,
    /// Viewport the session reports for this view, in pixels.
    pub viewport: UVec2,
}

/// Everything the host reported for one animation frame.
///
/// `hits` holds hit-test result positions in the local reference space and
/// is only populated when `viewer` is present.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct XrFrameSnapshot {
    pub viewer: Option<ViewerPose>,
    pub hits: Vec<Vec3>,
}

impl XrFrameSnapshot {
    pub fn lost() -> Self {
        Self::default()
    }

    pub fn tracked(viewer: ViewerPose, hits: Vec<Vec3>) -> Self {
        Self {
            viewer: Some(viewer),
            hits,
        }
    }
}

/// Hits for a snapshot from the host's ordered results, each `None` when
/// that result has no pose. Only the first result is used, so a first result
/// without a pose means no hit this frame.
pub fn first_hit<I: IntoIterator<Item = Option<Vec3>>>(results: I) -> Vec<Vec3> {
    results.into_iter().next().flatten().into_iter().collect()
}

/// Whether the most recent frame carried a valid viewer pose.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    Tracking,
    #[default]
    Lost,
}

/// Output size requested by the most recent tracked frame.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderViewport {
    pub size: Option<UVec2>,
}

/// Apply the newest frame snapshot to camera, viewport and reticle.
///
/// Without a pose the camera keeps last frame's matrices. Without hits the
/// reticle keeps its previous visibility and position; it is never hidden here.
pub fn apply_xr_frame(
    snapshot: Option<Res<XrFrameSnapshot>>,
    mut tracking: ResMut<TrackingState>,
    mut viewport: ResMut<RenderViewport>,
    mut cameras: Query<(&mut XrCamera, &mut Transform, &mut Projection), Without<Reticle>>,
    mut reticles: Query<(&mut Transform, &mut Visibility), (With<Reticle>, Without<XrCamera>)>,
) {
    let Some(snapshot) = snapshot else {
        return;
    };
    if !snapshot.is_changed() {
        return;
    }

    let Some(pose) = snapshot.viewer else {
        if *tracking == TrackingState::Tracking {
            info!("Viewer pose lost");
            *tracking = TrackingState::Lost;
        }
        return;
    };

    if *tracking == TrackingState::Lost {
        info!("Viewer pose tracking");
        *tracking = TrackingState::Tracking;
    }

    for (mut camera, mut transform, mut projection) in &mut cameras {
        apply_view_matrices(
            &mut camera,
            &mut transform,
            &mut projection,
            pose.world_from_view,
            pose.clip_from_view,
        );
    }

    if viewport.size != Some(pose.viewport) {
        viewport.size = Some(pose.viewport);
    }

    let Some(hit) = snapshot.hits.first() else {
        return;
    };
    // The reticle may not have loaded yet.
    for (mut transform, mut visibility) in &mut reticles {
        *visibility = Visibility::Visible;
        transform.translation = *hit;
    }
}

/// Resize the primary window to the session viewport when it changes.
pub fn resize_to_viewport(
    viewport: Res<RenderViewport>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !viewport.is_changed() {
        return;
    }
    let Some(size) = viewport.size else {
        return;
    };
    if size.x == 0 || size.y == 0 {
        return;
    }
    for mut window in &mut windows {
        window.resolution.set(size.x as f32, size.y as f32);
    }
}
