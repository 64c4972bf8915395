use bevy::math::Vec3A;
use bevy::prelude::*;
use bevy::render::camera::{CameraProjection, SubCameraView};

/// Matrices last supplied by the session for the first view.
///
/// `Transform` and `Projection` on the same entity are derived from these
/// and only the frame loop writes them.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct XrCamera {
    pub world_from_view: Mat4,
    pub clip_from_view: Mat4,
}

impl Default for XrCamera {
    fn default() -> Self {
        Self {
            world_from_view: Mat4::IDENTITY,
            clip_from_view: Mat4::IDENTITY,
        }
    }
}

const DEFAULT_NEAR: f32 = 0.1;
const DEFAULT_FAR: f32 = 1000.0;

/// Camera projection taken verbatim from the session.
///
/// WebXR reports OpenGL-style matrices (clip z in [-1, 1]). The x and y rows,
/// including the off-axis terms, are kept as supplied; only the depth row is
/// rewritten into the renderer's reverse-z convention. Render target resizes
/// never change it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XrProjection {
    gl_clip_from_view: Mat4,
    near: f32,
    far: f32,
}

impl Default for XrProjection {
    fn default() -> Self {
        Self::from_gl(Mat4::perspective_rh_gl(
            std::f32::consts::FRAC_PI_4,
            1.0,
            DEFAULT_NEAR,
            DEFAULT_FAR,
        ))
    }
}

impl XrProjection {
    /// Wrap a session projection matrix. Matrices that are not perspective
    /// projections fall back to the default frustum.
    pub fn from_gl(clip_from_view: Mat4) -> Self {
        let x_scale = clip_from_view.x_axis.x;
        let y_scale = clip_from_view.y_axis.y;
        let is_perspective = clip_from_view.z_axis.w == -1.0 && clip_from_view.w_axis.w == 0.0;
        if !is_perspective || x_scale.abs() <= f32::EPSILON || y_scale.abs() <= f32::EPSILON {
            return Self::default();
        }

        // z_axis.z = (far + near) / (near - far), w_axis.z = 2 * far * near / (near - far)
        let a = clip_from_view.z_axis.z;
        let b = clip_from_view.w_axis.z;
        let near = b / (a - 1.0);
        let far = b / (a + 1.0);
        if !near.is_finite() || near <= 0.0 {
            return Self::default();
        }

        Self {
            gl_clip_from_view: clip_from_view,
            near,
            far: if far.is_finite() && far > near {
                far
            } else {
                DEFAULT_FAR
            },
        }
    }

    /// The matrix exactly as the session reported it.
    pub fn gl_clip_from_view(&self) -> Mat4 {
        self.gl_clip_from_view
    }

    pub fn near(&self) -> f32 {
        self.near
    }
}

impl CameraProjection for XrProjection {
    fn get_clip_from_view(&self) -> Mat4 {
        // Infinite reverse-z: view z = -near maps to depth 1, infinity to 0.
        let mut clip_from_view = self.gl_clip_from_view;
        clip_from_view.z_axis.z = 0.0;
        clip_from_view.w_axis.z = self.near;
        clip_from_view
    }

    fn get_clip_from_view_for_sub(&self, _sub_view: &SubCameraView) -> Mat4 {
        self.get_clip_from_view()
    }

    fn update(&mut self, _width: f32, _height: f32) {}

    fn far(&self) -> f32 {
        self.far
    }

    fn get_frustum_corners(&self, z_near: f32, z_far: f32) -> [Vec3A; 8] {
        let m = &self.gl_clip_from_view;
        let (x_scale, x_offset) = (m.x_axis.x, m.z_axis.x);
        let (y_scale, y_offset) = (m.y_axis.y, m.z_axis.y);

        // Inverse of ndc = (scale * v + offset * z) / -z at view depth |z|.
        let corner = |ndc_x: f32, ndc_y: f32, z: f32| {
            let depth = z.abs();
            Vec3A::new(
                depth * (ndc_x + x_offset) / x_scale,
                depth * (ndc_y + y_offset) / y_scale,
                z,
            )
        };

        [
            corner(1.0, -1.0, z_near),
            corner(1.0, 1.0, z_near),
            corner(-1.0, 1.0, z_near),
            corner(-1.0, -1.0, z_near),
            corner(1.0, -1.0, z_far),
            corner(1.0, 1.0, z_far),
            corner(-1.0, 1.0, z_far),
            corner(-1.0, -1.0, z_far),
        ]
    }
}

pub fn spawn_xr_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            // Transparent so the passthrough feed stays visible.
            clear_color: ClearColorConfig::Custom(Color::NONE),
            ..default()
        },
        Projection::custom(XrProjection::default()),
        Transform::IDENTITY,
        XrCamera::default(),
        Name::new("XrCamera"),
    ));
}

/// Copy session-supplied matrices into the camera.
pub fn apply_view_matrices(
    camera: &mut XrCamera,
    transform: &mut Transform,
    projection: &mut Projection,
    world_from_view: Mat4,
    clip_from_view: Mat4,
) {
    camera.world_from_view = world_from_view;
    camera.clip_from_view = clip_from_view;
    *transform = Transform::from_matrix(world_from_view);

    let supplied = XrProjection::from_gl(clip_from_view);
    if let Projection::Custom(custom) = projection {
        if let Some(current) = custom.get_mut::<XrProjection>() {
            *current = supplied;
            return;
        }
    }
    *projection = Projection::custom(supplied);
}
