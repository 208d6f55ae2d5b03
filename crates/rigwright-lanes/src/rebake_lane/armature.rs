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

//! Structural fixes around the hips: collapsing wrapper nodes onto the root
//! and putting mapped bones first among their siblings.

use std::iter;

use approx::AbsDiffEq;
use rigwright_core::{math::Vec3, HumanRole};
use rigwright_data::{NodeId, SceneGraph, SkeletonMap};

use super::{context::RigContext, pose_cache::PoseCache};

/// Receives local translation changes of nodes that animation clips may
/// address by path, so curves can be rebased.
pub trait AnimationIndex {
    /// Called once per node whose local translation changed.
    fn on_local_translation_changed(&mut self, scene: &SceneGraph, node: NodeId, before: Vec3, after: Vec3);
}

/// Snaps every node between the root and the hips onto the root's world
/// position and rotation, keeping everything below them in place.
///
/// Does nothing when the hips are not under the root.
pub fn fix_armature_root(
    ctx: &mut RigContext<'_>,
    mut animation: Option<&mut (dyn AnimationIndex + '_)>,
) {
    let Some(hips) = ctx.skeleton.get(HumanRole::Hips) else {
        return;
    };
    if !ctx.scene.is_ancestor_of(ctx.root, hips) {
        log::trace!("RebakeLane: hips are not under the root, armature left alone");
        return;
    }

    // Stage 1: Collect the wrappers, closest to the hips first.
    let wrappers: Vec<NodeId> =
        iter::successors(ctx.scene.parent(hips), |&node| ctx.scene.parent(node))
            .take_while(|&node| node != ctx.root)
            .collect();

    let root_position = ctx.scene.world_position(ctx.root);
    let root_rotation = ctx.scene.world_rotation(ctx.root);

    for wrapper in wrappers {
        // Stage 2: Note the local translations animation curves may address.
        let watched: Vec<NodeId> = iter::once(wrapper)
            .chain(ctx.scene.children(wrapper).iter().copied())
            .collect();
        let translations: Vec<Vec3> = watched
            .iter()
            .map(|&node| ctx.scene.local(node).translation)
            .collect();

        // Stage 3: Snap the wrapper onto the root, keeping its subtree in place.
        let mut cache = PoseCache::new();
        cache.cache_children(ctx.scene, wrapper);
        cache.cache_anchored(ctx.scene, ctx.index, wrapper);

        let before = ctx.scene.world_matrix(wrapper);
        ctx.scene.set_world_rotation(wrapper, root_rotation);
        ctx.scene.set_world_position(wrapper, root_position);
        ctx.deltas.record(wrapper, &before, &ctx.scene.world_matrix(wrapper));
        cache.restore_all(ctx.scene);
        log::debug!("RebakeLane: snapped armature node '{}' onto the root", ctx.scene.name(wrapper));

        // Stage 4: Report the translations that moved.
        let Some(animation) = animation.as_deref_mut() else {
            continue;
        };
        for (&node, before) in watched.iter().zip(translations) {
            let after = ctx.scene.local(node).translation;
            if !before.abs_diff_eq(&after, 1e-6) {
                animation.on_local_translation_changed(ctx.scene, node, before, after);
            }
        }
    }
}

/// Moves every mapped bone to the front of its siblings, visiting roles
/// from last to first and the spine once more at the end so it ends up
/// ahead of the legs.
pub fn fix_sibling_order(scene: &mut SceneGraph, skeleton: &SkeletonMap) {
    for &role in HumanRole::ALL.iter().rev().chain(iter::once(&HumanRole::Spine)) {
        if let Some(node) = skeleton.get(role).filter(|&node| scene.contains(node)) {
            scene.set_sibling_index(node, 0);
        }
    }
}
