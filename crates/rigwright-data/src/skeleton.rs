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

//! The role-to-node assignment of one rig.

use std::collections::BTreeMap;

use rigwright_core::HumanRole;
use serde::{Deserialize, Serialize};

use crate::scene::NodeId;

/// Maps each humanoid role to the node that plays it, if any.
///
/// Iteration follows canonical role order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkeletonMap(BTreeMap<HumanRole, NodeId>);

impl SkeletonMap {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// The node mapped to `role`.
    pub fn get(&self, role: HumanRole) -> Option<NodeId> {
        self.0.get(&role).copied()
    }

    /// Maps `role` to `node`, replacing any previous assignment.
    pub fn set(&mut self, role: HumanRole, node: NodeId) {
        self.0.insert(role, node);
    }

    /// Removes the assignment of `role`.
    pub fn clear(&mut self, role: HumanRole) {
        self.0.remove(&role);
    }

    /// Whether a node plays `role`.
    pub fn contains(&self, role: HumanRole) -> bool {
        self.0.contains_key(&role)
    }

    /// The role played by `node`, if any.
    pub fn role_of(&self, node: NodeId) -> Option<HumanRole> {
        self.iter().find(|&(_, n)| n == node).map(|(role, _)| role)
    }

    /// Whether `node` plays any role.
    pub fn is_mapped(&self, node: NodeId) -> bool {
        self.role_of(node).is_some()
    }

    /// Iterates `(role, node)` pairs in canonical role order.
    pub fn iter(&self) -> impl Iterator<Item = (HumanRole, NodeId)> + '_ {
        self.0.iter().map(|(&role, &node)| (role, node))
    }

    /// Number of mapped roles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no role is mapped.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The node of the nearest ancestor role of `role` that is mapped.
    pub fn nearest_mapped_ancestor(&self, role: HumanRole) -> Option<(HumanRole, NodeId)> {
        role.ancestors()
            .find_map(|ancestor| self.get(ancestor).map(|node| (ancestor, node)))
    }
}

impl FromIterator<(HumanRole, NodeId)> for SkeletonMap {
    fn from_iter<T: IntoIterator<Item = (HumanRole, NodeId)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_follows_canonical_order() {
        let map: SkeletonMap = [
            (HumanRole::UpperChest, NodeId(4)),
            (HumanRole::Spine, NodeId(2)),
            (HumanRole::Hips, NodeId(1)),
        ]
        .into_iter()
        .collect();

        let roles: Vec<_> = map.iter().map(|(role, _)| role).collect();
        assert_eq!(
            roles,
            vec![HumanRole::Hips, HumanRole::Spine, HumanRole::UpperChest]
        );
        assert_eq!(map.role_of(NodeId(2)), Some(HumanRole::Spine));
        assert!(!map.is_mapped(NodeId(3)));
    }

    #[test]
    fn test_nearest_mapped_ancestor_skips_gaps() {
        let mut map = SkeletonMap::new();
        map.set(HumanRole::Spine, NodeId(2));
        // Chest and upper chest are unmapped, so the neck falls back to the spine.
        assert_eq!(
            map.nearest_mapped_ancestor(HumanRole::Neck),
            Some((HumanRole::Spine, NodeId(2)))
        );
        assert_eq!(map.nearest_mapped_ancestor(HumanRole::Hips), None);
    }

    #[test]
    fn test_serializes_as_role_keyed_map() {
        let mut map = SkeletonMap::new();
        map.set(HumanRole::LeftHand, NodeId(7));
        let text = ron::to_string(&map).unwrap();
        assert!(text.contains("left_hand"));
        let back: SkeletonMap = ron::from_str(&text).unwrap();
        assert_eq!(back, map);
    }
}
