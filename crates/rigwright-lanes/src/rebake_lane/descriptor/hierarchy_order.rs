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

use std::cmp::Ordering;

use rigwright_data::{NodeId, SceneGraph};

/// Sort key placing nodes in depth-first pre-order under a root.
///
/// Every node owns a sub-interval of its parent's interval, split evenly
/// among siblings; `score` is the interval's start. Scores never decrease
/// along pre-order, but they tie for a parent and its first child and,
/// once the intervals fall below `f64` precision, for unrelated deep nodes.
/// Ties are settled by the sibling-index path, whose lexicographic order is
/// pre-order.
#[derive(Debug, Clone)]
pub struct HierarchyKey {
    score: f64,
    path: Vec<usize>,
}

impl HierarchyKey {
    /// Computes the key of `node` relative to `root`.
    pub fn of(scene: &SceneGraph, root: NodeId, node: NodeId) -> Self {
        let mut path = Vec::new();
        let mut current = node;
        while current != root {
            let Some(parent) = scene.parent(current) else {
                break;
            };
            path.push(scene.sibling_index(current));
            current = parent;
        }
        path.reverse();

        let mut score = 0.0_f64;
        let mut width = 1.0_f64;
        let mut parent = current;
        for &index in &path {
            let siblings = scene.children(parent);
            let count = siblings.len().max(1) as f64;
            width /= count;
            score += width * index as f64;
            parent = siblings.get(index).copied().unwrap_or(parent);
        }

        Self { score, path }
    }
}

impl Ord for HierarchyKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for HierarchyKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HierarchyKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HierarchyKey {}

/// Sorts `nodes` so that every parent precedes its children and siblings
/// keep their scene order.
pub fn sort_in_hierarchy_order(scene: &SceneGraph, root: NodeId, nodes: &mut [NodeId]) {
    nodes.sort_by_cached_key(|&node| HierarchyKey::of(scene, root, node));
}
