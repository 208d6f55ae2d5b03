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

//! Rotates every mapped bone into a canonical orientation without moving
//! anything else in world space.

use rigwright_core::{
    math::{Quaternion, Vec3},
    HumanRole,
};
use rigwright_data::{NodeId, SceneGraph, SkeletonMap, Transform};

use super::{context::RigContext, pose_cache::PoseCache, settings::RebakeSettings};

/// Normalizes each mapped bone in canonical role order.
pub fn normalize_bones(ctx: &mut RigContext<'_>, settings: &RebakeSettings) {
    for role in HumanRole::ALL {
        match ctx.skeleton.get(role) {
            Some(bone) if ctx.scene.contains(bone) => normalize_bone(ctx, settings, role, bone),
            _ => log::trace!("RebakeLane: {role} is not mapped, skipping normalization"),
        }
    }
}

fn normalize_bone(ctx: &mut RigContext<'_>, settings: &RebakeSettings, role: HumanRole, bone: NodeId) {
    // Stage 1: Find the twist helper, if this role carries one.
    let twist = if role.carries_twist() {
        find_twist_child(ctx.scene, ctx.skeleton, settings, bone)
    } else {
        None
    };

    // Stage 2: Remember where the children and anchored geometry sit. The
    // twist helper is left out; stage 4 places it.
    let mut cache = PoseCache::new();
    cache.cache_children_except(ctx.scene, bone, twist);
    cache.cache_anchored(ctx.scene, ctx.index, bone);

    let twist_pose = twist.map(|twist| {
        cache.cache_children(ctx.scene, twist);
        cache.cache_anchored(ctx.scene, ctx.index, twist);
        (twist, ctx.scene.world_position(twist), ctx.scene.world_matrix(twist))
    });

    // Stage 3: Rotate the bone and record how its frame moved.
    let before = ctx.scene.world_matrix(bone);
    let rotation = canonical_rotation(ctx.scene, ctx.skeleton, ctx.root, role, bone);
    ctx.scene.set_world_rotation(bone, rotation);
    ctx.deltas.record(bone, &before, &ctx.scene.world_matrix(bone));
    log::debug!("RebakeLane: normalized {role} ('{}')", ctx.scene.name(bone));

    // Stage 4: Put the twist helper back in place, aligned with its bone.
    if let Some((twist, position, twist_before)) = twist_pose {
        ctx.scene.set_world_position(twist, position);
        let local = ctx.scene.local(twist);
        ctx.scene.set_local(
            twist,
            Transform {
                rotation: Quaternion::IDENTITY,
                ..local
            },
        );
        ctx.deltas.record(twist, &twist_before, &ctx.scene.world_matrix(twist));
    }

    // Stage 5: Everything else goes back to where it was.
    cache.restore_all(ctx.scene);
}

/// The first unmapped child of `bone` named like a twist helper.
fn find_twist_child(
    scene: &SceneGraph,
    skeleton: &SkeletonMap,
    settings: &RebakeSettings,
    bone: NodeId,
) -> Option<NodeId> {
    scene
        .children(bone)
        .iter()
        .copied()
        .find(|&child| !skeleton.is_mapped(child) && settings.is_twist_name(scene.name(child)))
}

/// The world rotation `role` should have: local Y along the limb, local Z
/// as close to the root's up axis as the limb allows.
pub(crate) fn canonical_rotation(
    scene: &SceneGraph,
    skeleton: &SkeletonMap,
    root: NodeId,
    role: HumanRole,
    bone: NodeId,
) -> Quaternion {
    let root_rotation = scene.world_rotation(root);
    if role.aligns_to_root() {
        return root_rotation;
    }

    let position = scene.world_position(bone);
    let toward_child = role
        .child_of_interest()
        .and_then(|child| skeleton.get(child))
        .filter(|&child| scene.contains(child))
        .and_then(|child| (scene.world_position(child) - position).try_normalize());
    let up = toward_child.or_else(|| {
        skeleton
            .nearest_mapped_ancestor(role)
            .filter(|&(_, ancestor)| scene.contains(ancestor))
            .and_then(|(_, ancestor)| (position - scene.world_position(ancestor)).try_normalize())
    });
    let Some(up) = up else {
        return root_rotation;
    };

    let root_up = root_rotation * Vec3::Y;
    let forward = -(up.cross(up.cross(root_up)));
    Quaternion::look_rotation(forward, up)
        .or_else(|| {
            // Limb runs along the root's up axis, fall back to the root's forward.
            let root_forward = root_rotation * Vec3::Z;
            Quaternion::look_rotation(root_forward - up * root_forward.dot(up), up)
        })
        .unwrap_or(root_rotation)
}
