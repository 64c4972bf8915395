use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;

/// Shadow setting for every mesh spawned beneath this entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowCasting(pub bool);

/// Meshes spawned from glTF scenes inherit the shadow setting of the
/// nearest ancestor carrying [`ShadowCasting`]. Meshes without one are left alone.
pub fn apply_shadow_policy(
    mut commands: Commands,
    new_meshes: Query<Entity, Added<Mesh3d>>,
    parents: Query<&ChildOf>,
    policies: Query<&ShadowCasting>,
) {
    for mesh in &new_meshes {
        match find_policy(mesh, &parents, &policies) {
            Some(ShadowCasting(true)) => {
                commands.entity(mesh).remove::<NotShadowCaster>();
            }
            Some(ShadowCasting(false)) => {
                commands.entity(mesh).insert(NotShadowCaster);
            }
            None => {}
        }
    }
}

fn find_policy(
    entity: Entity,
    parents: &Query<&ChildOf>,
    policies: &Query<&ShadowCasting>,
) -> Option<ShadowCasting> {
    let mut current = entity;
    loop {
        if let Ok(policy) = policies.get(current) {
            return Some(*policy);
        }
        current = parents.get(current).ok()?.parent();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut app = App::new();
        app.add_systems(Update, apply_shadow_policy);
        app
    }

    #[test]
    fn meshes_inherit_nearest_shadow_setting() {
        let mut app = app();
        let world = app.world_mut();

        let reticle = world.spawn(ShadowCasting(false)).id();
        let reticle_node = world.spawn(ChildOf(reticle)).id();
        let reticle_mesh = world
            .spawn((Mesh3d(Handle::default()), ChildOf(reticle_node)))
            .id();

        let skeleton = world.spawn(ShadowCasting(true)).id();
        let skeleton_mesh = world
            .spawn((Mesh3d(Handle::default()), NotShadowCaster, ChildOf(skeleton)))
            .id();

        let loose_mesh = world.spawn(Mesh3d(Handle::default())).id();

        app.update();

        let world = app.world();
        assert!(world.get::<NotShadowCaster>(reticle_mesh).is_some());
        assert!(world.get::<NotShadowCaster>(skeleton_mesh).is_none());
        assert!(world.get::<NotShadowCaster>(loose_mesh).is_none());
    }
}
