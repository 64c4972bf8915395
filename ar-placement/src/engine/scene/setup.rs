use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use constants::scene::{GROUND_OPACITY, GROUND_PLANE_SIZE, LIGHT_ILLUMINANCE, LIGHT_POSITION};

use crate::engine::camera::xr_camera::spawn_xr_camera;

#[derive(Component)]
pub struct GroundPlane;

// Startup system building the static scene
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    spawn_lighting(&mut commands);
    spawn_ground(&mut commands, &mut meshes, &mut materials);
    spawn_xr_camera(&mut commands);
}

fn spawn_lighting(commands: &mut Commands) {
    let [x, y, z] = LIGHT_POSITION;
    commands.spawn((
        DirectionalLight {
            illuminance: LIGHT_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(x, y, z).looking_at(Vec3::ZERO, Vec3::Y),
        Name::new("SunLight"),
    ));
}

/// Square ground on the XZ plane. It receives shadows but never casts them,
/// and stays translucent so the camera passthrough shows through.
fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.0, 0.0, 0.0, GROUND_OPACITY),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 1.0,
        ..default()
    });

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_PLANE_SIZE, GROUND_PLANE_SIZE))),
        MeshMaterial3d(material),
        Transform::IDENTITY,
        NotShadowCaster,
        GroundPlane,
        Name::new("GroundPlane"),
    ));
}
