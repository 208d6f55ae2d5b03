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

//! Captures a fresh rig descriptor from the normalized skeleton.

mod builder;
mod hierarchy_order;
mod rename_guard;

pub use self::builder::{
    DescriptorBuildError, DescriptorBuilder, DescriptorDraft, StandardDescriptorBuilder,
};
pub use self::hierarchy_order::{sort_in_hierarchy_order, HierarchyKey};
pub use self::rename_guard::RenameGuard;

use std::collections::HashSet;

use rigwright_core::{asset::AssetUUID, HumanRole};
use rigwright_data::{
    assets::AssetSink,
    descriptor::{HumanBone, SkeletonBone},
    NodeId, RigDescriptor, SceneGraph, SkeletonMap,
};

use super::settings::LimitSettings;

/// Collects the bones a descriptor lists: every mapped node and the chain
/// above it up to, but excluding, the root. The root joins when the
/// shallowest mapped bone hangs directly off it.
pub fn collect_skeleton_nodes(scene: &SceneGraph, root: NodeId, skeleton: &SkeletonMap) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    let mut nodes = Vec::new();
    for (_, mapped) in skeleton.iter() {
        let mut current = Some(mapped);
        while let Some(node) = current.filter(|&n| n != root && scene.contains(n)) {
            if !seen.insert(node) {
                break;
            }
            nodes.push(node);
            current = scene.parent(node);
        }
    }

    let shallowest = skeleton
        .iter()
        .map(|(_, node)| node)
        .filter(|&node| scene.contains(node))
        .min_by_key(|&node| scene.depth(node));
    if shallowest.and_then(|node| scene.parent(node)) == Some(root) && seen.insert(root) {
        nodes.push(root);
    }
    nodes
}

/// Gives every non-skeleton node under `root` whose name is already taken
/// a fresh `"{name} ({n})"` name, depth-first.
fn disambiguate_names(guard: &mut RenameGuard<'_>, root: NodeId, skeleton_nodes: &HashSet<NodeId>) {
    let taken: HashSet<String> = guard
        .subtree(root)
        .into_iter()
        .map(|node| guard.name(node).to_owned())
        .collect();
    let mut in_use: HashSet<String> = skeleton_nodes
        .iter()
        .map(|&node| guard.name(node).to_owned())
        .collect();

    let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
    if !skeleton_nodes.contains(&root) {
        in_use.insert(guard.name(root).to_owned());
    }
    while let Some((node, next)) = stack.last_mut() {
        let Some(&child) = guard.children(*node).get(*next) else {
            stack.pop();
            continue;
        };
        *next += 1;
        stack.push((child, 0));
        if skeleton_nodes.contains(&child) {
            continue;
        }

        let name = guard.name(child).to_owned();
        if in_use.insert(name.clone()) {
            continue;
        }
        let Some(fresh) = (1..)
            .map(|n| format!("{name} ({n})"))
            .find(|candidate| !in_use.contains(candidate) && !taken.contains(candidate))
        else {
            continue;
        };
        in_use.insert(fresh.clone());
        guard.rename(child, fresh);
    }
}

/// Builds the draft and runs `builder` on it with ambiguous names resolved.
fn capture(
    scene: &mut SceneGraph,
    root: NodeId,
    skeleton: &SkeletonMap,
    limits: &LimitSettings,
    builder: &dyn DescriptorBuilder,
    existing: Option<&RigDescriptor>,
) -> Result<RigDescriptor, DescriptorBuildError> {
    let mut nodes = collect_skeleton_nodes(scene, root, skeleton);
    let node_set: HashSet<NodeId> = nodes.iter().copied().collect();

    let mut guard = RenameGuard::new(scene);
    disambiguate_names(&mut guard, root, &node_set);
    sort_in_hierarchy_order(&guard, root, &mut nodes);

    let draft = DescriptorDraft {
        skeleton: nodes
            .iter()
            .map(|&node| {
                let local = guard.local(node);
                SkeletonBone {
                    name: guard.name(node).to_owned(),
                    position: local.translation,
                    rotation: local.rotation,
                    scale: local.scale,
                }
            })
            .collect(),
        human: HumanRole::ALL
            .iter()
            .filter_map(|&role| {
                let node = skeleton.get(role).filter(|&node| guard.contains(node))?;
                Some(HumanBone {
                    role,
                    bone_name: guard.name(node).to_owned(),
                    limit: limits.resolve(role, existing),
                })
            })
            .collect(),
    };
    builder.build(&guard, root, &draft)
}

/// Captures a new descriptor for the rig under `root`, registers it under
/// `"{root name} Rig"` and binds it to the root node.
///
/// Returns `false`, leaving the previous descriptor bound, when the
/// builder rejects the rig.
pub fn rebuild_descriptor(
    scene: &mut SceneGraph,
    root: NodeId,
    skeleton: &SkeletonMap,
    limits: &LimitSettings,
    builder: &dyn DescriptorBuilder,
    sink: &mut dyn AssetSink,
) -> bool {
    let existing = scene
        .node(root)
        .and_then(|node| node.rig_descriptor)
        .and_then(|uuid| sink.descriptor(&uuid));

    match capture(scene, root, skeleton, limits, builder, existing.as_deref()) {
        Ok(mut descriptor) => {
            let name = format!("{} Rig", scene.name(root));
            let uuid = AssetUUID::from_name(&name);
            descriptor.name = name;
            log::info!(
                "RebakeLane: captured '{}' with {} bones",
                descriptor.name,
                descriptor.skeleton.len()
            );
            sink.register_descriptor(uuid, descriptor);
            if let Some(node) = scene.node_mut(root) {
                node.rig_descriptor = Some(uuid);
            }
            true
        }
        Err(e) => {
            log::warn!("RebakeLane: rig descriptor for '{}' not rebuilt: {e}", scene.name(root));
            false
        }
    }
}
