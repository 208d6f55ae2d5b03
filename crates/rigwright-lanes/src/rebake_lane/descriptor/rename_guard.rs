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

use std::ops::{Deref, DerefMut};

use rigwright_data::{NodeId, SceneGraph, Transform};

/// Temporarily renames nodes and undoes every rename when dropped.
///
/// The guard owns the only mutable borrow of the graph while it lives, so
/// nothing can observe the renamed state after it goes out of scope,
/// whichever way the scope is left.
pub struct RenameGuard<'a> {
    scene: &'a mut SceneGraph,
    renamed: Vec<(NodeId, String, Transform)>,
}

impl<'a> RenameGuard<'a> {
    /// Starts a rename session over `scene`.
    pub fn new(scene: &'a mut SceneGraph) -> Self {
        Self {
            scene,
            renamed: Vec::new(),
        }
    }

    /// Renames `node`, remembering its original name and local pose.
    pub fn rename(&mut self, node: NodeId, name: String) {
        let original = self.scene.name(node).to_owned();
        let pose = self.scene.local(node);
        log::trace!("RebakeLane: renaming '{original}' to '{name}' while capturing");
        self.scene.set_name(node, name);
        self.renamed.push((node, original, pose));
    }

    /// Number of nodes currently renamed.
    pub fn len(&self) -> usize {
        self.renamed.len()
    }

    /// Whether no node is renamed.
    pub fn is_empty(&self) -> bool {
        self.renamed.is_empty()
    }
}

impl Deref for RenameGuard<'_> {
    type Target = SceneGraph;

    fn deref(&self) -> &SceneGraph {
        &*self.scene
    }
}

impl DerefMut for RenameGuard<'_> {
    fn deref_mut(&mut self) -> &mut SceneGraph {
        &mut *self.scene
    }
}

impl Drop for RenameGuard<'_> {
    fn drop(&mut self) {
        for (node, name, pose) in self.renamed.drain(..).rev() {
            self.scene.set_local(node, pose);
            self.scene.set_name(node, name);
        }
    }
}
