// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use rigwright_core::asset::AssetUUID;
use rigwright_data::{
    assets::AssetSink,
    components::{ComponentId, ComponentKind, SkinnedMeshRenderer},
    NodeId, SceneGraph,
};

use super::delta::DeltaTracker;

/// Tag mixed into the identifier of rebased mesh copies.
const REBAKE_TAG: &str = "rebake";

/// Rebases the bind poses of every skinned mesh under `root` onto the
/// edited bone frames.
///
/// Meshes are never modified in place: each affected renderer gets a fresh
/// copy registered through `sink`, identified by the source mesh and the
/// renderer, so renderers sharing a mesh keep separate bind poses. Returns
/// the number of renderers updated.
pub fn propagate_bind_poses(
    scene: &mut SceneGraph,
    root: NodeId,
    deltas: &DeltaTracker,
    sink: &mut dyn AssetSink,
) -> usize {
    if deltas.is_empty() {
        return 0;
    }

    let renderers: Vec<_> = scene
        .subtree(root)
        .into_iter()
        .flat_map(|node| scene.components_of(node).iter().copied())
        .filter_map(|id| match scene.component(id).map(|c| &c.kind) {
            Some(ComponentKind::SkinnedMesh(renderer)) => Some((id, renderer.clone())),
            _ => None,
        })
        .collect();

    let mut updated = 0;
    for (id, renderer) in renderers {
        let Some(rebased) = rebase_renderer(id, &renderer, deltas, sink) else {
            continue;
        };
        if let Some(ComponentKind::SkinnedMesh(target)) = scene.component_mut(id).map(|c| &mut c.kind) {
            target.mesh = Some(rebased);
            updated += 1;
        }
    }
    updated
}

fn rebase_renderer(
    id: ComponentId,
    renderer: &SkinnedMeshRenderer,
    deltas: &DeltaTracker,
    sink: &mut dyn AssetSink,
) -> Option<AssetUUID> {
    let touched = renderer
        .bones
        .iter()
        .flatten()
        .any(|&bone| deltas.get(bone).is_some());
    if !touched {
        return None;
    }

    let Some(uuid) = renderer.mesh else {
        log::warn!("RebakeLane: skinned renderer has no mesh, bind poses not rebased");
        return None;
    };
    let Some(handle) = sink.mesh(&uuid) else {
        log::warn!("RebakeLane: mesh {uuid} is not loaded, bind poses not rebased");
        return None;
    };

    let mut mesh = handle.to_owned_asset();
    for (slot, bone) in renderer.bones.iter().enumerate() {
        let Some(delta) = bone.and_then(|bone| deltas.get(bone)) else {
            continue;
        };
        match mesh.bind_poses.get_mut(slot) {
            Some(bind_pose) => *bind_pose = *delta * *bind_pose,
            None => log::warn!("RebakeLane: mesh '{}' has no bind pose for bone slot {slot}", mesh.name),
        }
    }

    let rebased = uuid.derived(&format!("{REBAKE_TAG}/{}", id.0));
    sink.register_mesh(rebased, mesh);
    Some(rebased)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rigwright_core::math::{AffineTransform, Mat4, Quaternion, Vec3};
    use rigwright_data::{assets::AssetLibrary, Mesh, Transform};

    #[test]
    fn test_only_touched_slots_are_rebased_on_a_copy() {
        let mut scene = SceneGraph::new();
        let root = scene.add_root("root", Transform::identity());
        let hips = scene.add_child(root, "hips", Transform::from_translation(Vec3::Y));
        let spine = scene.add_child(hips, "spine", Transform::from_translation(Vec3::new(0.0, 0.2, 0.0)));
        let body = scene.add_child(root, "body", Transform::identity());

        let mut library = AssetLibrary::new();
        let mesh_id = AssetUUID::from_name("body");
        let binds = vec![
            scene.world_matrix(hips).inverse().unwrap().to_matrix(),
            scene.world_matrix(spine).inverse().unwrap().to_matrix(),
        ];
        library.register_mesh(
            mesh_id,
            Mesh {
                name: "body".into(),
                positions: vec![Vec3::new(0.0, 1.1, 0.0)],
                bind_poses: binds.clone(),
            },
        );
        let renderer = scene.add_component(
            body,
            SkinnedMeshRenderer {
                mesh: Some(mesh_id),
                bones: vec![Some(hips), Some(spine)],
            },
        );

        let before = scene.world_matrix(hips);
        scene.set_world_rotation(hips, Quaternion::from_axis_angle(Vec3::Z, 0.5));
        let after = scene.world_matrix(hips);
        let mut deltas = DeltaTracker::new();
        deltas.record(hips, &before, &after);

        assert_eq!(propagate_bind_poses(&mut scene, root, &deltas, &mut library), 1);

        let rebased_id = match scene.component(renderer).map(|c| &c.kind) {
            Some(ComponentKind::SkinnedMesh(r)) => r.mesh.unwrap(),
            other => panic!("unexpected component {other:?}"),
        };
        assert_ne!(rebased_id, mesh_id);
        let original = library.mesh(&mesh_id).unwrap();
        let rebased = library.mesh(&rebased_id).unwrap();
        assert_eq!(original.bind_poses, binds);
        assert_eq!(rebased.bind_poses[1], binds[1]);

        // The vertex skinned to the hips lands where it did before the edit.
        let vertex = original.positions[0];
        let skinned = |world: &AffineTransform, bind: Mat4| (world.to_matrix() * bind).transform_point(vertex);
        assert_abs_diff_eq!(
            skinned(&after, rebased.bind_poses[0]),
            skinned(&before, binds[0]),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_missing_mesh_is_skipped() {
        let mut scene = SceneGraph::new();
        let root = scene.add_root("root", Transform::identity());
        let hips = scene.add_child(root, "hips", Transform::identity());
        scene.add_component(
            root,
            SkinnedMeshRenderer {
                mesh: Some(AssetUUID::from_name("gone")),
                bones: vec![Some(hips)],
            },
        );
        let mut deltas = DeltaTracker::new();
        deltas.record(
            hips,
            &AffineTransform::IDENTITY,
            &AffineTransform::from_trs(Vec3::X, Quaternion::IDENTITY, Vec3::ONE),
        );

        let mut library = AssetLibrary::new();
        assert_eq!(propagate_bind_poses(&mut scene, root, &deltas, &mut library), 0);
        assert!(library.meshes.is_empty());
    }

    #[test]
    fn test_renderers_sharing_a_mesh_get_their_own_copies() {
        let mut scene = SceneGraph::new();
        let root = scene.add_root("root", Transform::identity());
        let a = scene.add_child(root, "a", Transform::from_translation(Vec3::X));
        let b = scene.add_child(root, "b", Transform::from_translation(-Vec3::X));

        let mut library = AssetLibrary::new();
        let mesh_id = AssetUUID::from_name("shared");
        library.register_mesh(
            mesh_id,
            Mesh {
                name: "shared".into(),
                positions: Vec::new(),
                bind_poses: vec![Mat4::IDENTITY],
            },
        );
        let first = scene.add_component(
            root,
            SkinnedMeshRenderer {
                mesh: Some(mesh_id),
                bones: vec![Some(a)],
            },
        );
        let second = scene.add_component(
            root,
            SkinnedMeshRenderer {
                mesh: Some(mesh_id),
                bones: vec![Some(b)],
            },
        );

        let mut deltas = DeltaTracker::new();
        for (bone, angle) in [(a, 0.4), (b, -0.9)] {
            let before = scene.world_matrix(bone);
            scene.set_world_rotation(bone, Quaternion::from_axis_angle(Vec3::Z, angle));
            deltas.record(bone, &before, &scene.world_matrix(bone));
        }

        assert_eq!(propagate_bind_poses(&mut scene, root, &deltas, &mut library), 2);

        let mesh_of = |id: ComponentId| match scene.component(id).map(|c| &c.kind) {
            Some(ComponentKind::SkinnedMesh(r)) => r.mesh.unwrap(),
            other => panic!("unexpected component {other:?}"),
        };
        let (first_id, second_id) = (mesh_of(first), mesh_of(second));
        assert_ne!(first_id, second_id);

        let first_bind = library.mesh(&first_id).unwrap().bind_poses[0];
        let second_bind = library.mesh(&second_id).unwrap().bind_poses[0];
        assert_abs_diff_eq!(first_bind, *deltas.get(a).unwrap(), epsilon = 1e-6);
        assert_abs_diff_eq!(second_bind, *deltas.get(b).unwrap(), epsilon = 1e-6);
    }
}
