/// Ground plane edge length in metres (square).
pub const GROUND_PLANE_SIZE: f32 = 10.0;

/// Opacity of the translucent shadow-catching ground.
pub const GROUND_OPACITY: f32 = 0.5;

/// Directional light position; the light points at the origin.
pub const LIGHT_POSITION: [f32; 3] = [10.0, 15.0, 10.0];

pub const LIGHT_ILLUMINANCE: f32 = 10_000.0;
