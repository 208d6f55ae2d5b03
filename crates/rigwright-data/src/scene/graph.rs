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

use std::{collections::VecDeque, fmt};

use rigwright_core::{
    asset::AssetUUID,
    math::{AffineTransform, Quaternion, Vec3},
};
use serde::{Deserialize, Serialize};

use super::{SceneError, Transform};
use crate::components::{Component, ComponentId, ComponentKind};

/// Index of a node inside a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The position of the node in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single point of the transform hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Display name. Bones are matched by name, so duplicates matter.
    pub name: String,
    #[serde(default)]
    parent: Option<NodeId>,
    #[serde(default)]
    children: Vec<NodeId>,
    /// Pose relative to the parent.
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    components: Vec<ComponentId>,
    /// The rig descriptor bound to this node, if it is a rig root.
    #[serde(default)]
    pub rig_descriptor: Option<AssetUUID>,
}

impl Node {
    /// The parent node, `None` for top-level nodes.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The ordered child list.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Components owned by the node.
    pub fn components(&self) -> &[ComponentId] {
        &self.components
    }
}

/// A strictly tree-shaped arena of nodes and the components they own.
///
/// Nodes are never removed, so a `NodeId` handed out by a graph stays valid
/// for that graph's lifetime. Every traversal is iterative; rigs with very
/// deep chains (long tails, hair strands) must not overflow the stack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    #[serde(default)]
    components: Vec<Component>,
}

impl SceneGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a top-level node.
    pub fn add_root(&mut self, name: impl Into<String>, transform: Transform) -> NodeId {
        self.push_node(name.into(), None, transform)
    }

    /// Adds a node as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this graph.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
    ) -> NodeId {
        assert!(self.contains(parent), "parent {parent} is not in the graph");
        let id = self.push_node(name.into(), Some(parent), transform);
        self.nodes[parent.index()].children.push(id);
        id
    }

    fn push_node(&mut self, name: String, parent: Option<NodeId>, transform: Transform) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            name,
            parent,
            children: Vec::new(),
            transform,
            components: Vec::new(),
            rig_descriptor: None,
        });
        id
    }

    /// Whether `id` refers to a node of this graph.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Returns the node with the given id.
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Returns the node with the given id, mutably.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Iterates every node with its id, in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    /// The node's name, empty for an unknown id.
    pub fn name(&self, id: NodeId) -> &str {
        self.node(id).map_or("", |node| node.name.as_str())
    }

    /// Renames a node.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) {
        if let Some(node) = self.node_mut(id) {
            node.name = name.into();
        }
    }

    /// The node's parent.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// The node's ordered children.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    /// The node's local pose.
    pub fn local(&self, id: NodeId) -> Transform {
        self.node(id).map(|node| node.transform).unwrap_or_default()
    }

    /// Replaces the node's local pose.
    pub fn set_local(&mut self, id: NodeId, transform: Transform) {
        if let Some(node) = self.node_mut(id) {
            node.transform = transform;
        }
    }

    /// Composes the local matrices from the top of the hierarchy down to `id`.
    pub fn world_matrix(&self, id: NodeId) -> AffineTransform {
        let mut matrix = AffineTransform::IDENTITY;
        let mut current = self.node(id);
        while let Some(node) = current {
            matrix = node.transform.to_affine() * matrix;
            current = node.parent.and_then(|parent| self.node(parent));
        }
        matrix
    }

    /// The node's position in world space.
    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).translation()
    }

    /// The product of the local rotations along the ancestor chain.
    ///
    /// Unlike the rotation extracted from [`Self::world_matrix`], this never
    /// picks up skew introduced by non-uniform scale.
    pub fn world_rotation(&self, id: NodeId) -> Quaternion {
        let mut rotation = Quaternion::IDENTITY;
        let mut current = self.node(id);
        while let Some(node) = current {
            rotation = node.transform.rotation * rotation;
            current = node.parent.and_then(|parent| self.node(parent));
        }
        rotation.normalize()
    }

    /// The component-wise product of the absolute local scales along the chain.
    pub fn lossy_scale(&self, id: NodeId) -> Vec3 {
        let mut scale = Vec3::ONE;
        let mut current = self.node(id);
        while let Some(node) = current {
            scale = scale * node.transform.scale.abs();
            current = node.parent.and_then(|parent| self.node(parent));
        }
        scale
    }

    /// Moves the node so its world position becomes `position`, leaving its
    /// rotation and scale untouched.
    pub fn set_world_position(&mut self, id: NodeId, position: Vec3) {
        let local = match self.parent(id) {
            Some(parent) => self.world_matrix(parent).inverse_transform_point(position),
            None => position,
        };
        if let Some(node) = self.node_mut(id) {
            node.transform.translation = local;
        }
    }

    /// Rotates the node so its world rotation becomes `rotation`.
    pub fn set_world_rotation(&mut self, id: NodeId, rotation: Quaternion) {
        let local = match self.parent(id) {
            Some(parent) => self.world_rotation(parent).inverse() * rotation,
            None => rotation,
        };
        if let Some(node) = self.node_mut(id) {
            node.transform.rotation = local.normalize();
        }
    }

    /// Maps a world-space point into the node's local space.
    pub fn inverse_transform_point(&self, id: NodeId, point: Vec3) -> Vec3 {
        self.world_matrix(id).inverse_transform_point(point)
    }

    /// The node's position among its siblings. Top-level nodes report 0.
    pub fn sibling_index(&self, id: NodeId) -> usize {
        self.parent(id)
            .and_then(|parent| self.children(parent).iter().position(|&c| c == id))
            .unwrap_or(0)
    }

    /// Moves the node to `index` among its siblings, clamped to the last slot.
    /// Top-level nodes have no ordered siblings and are left alone.
    pub fn set_sibling_index(&mut self, id: NodeId, index: usize) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let siblings = &mut self.nodes[parent.index()].children;
        if let Some(current) = siblings.iter().position(|&c| c == id) {
            siblings.remove(current);
            let index = index.min(siblings.len());
            siblings.insert(index, id);
        }
    }

    /// Number of ancestors above the node.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    /// Whether `ancestor` lies strictly above `id`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent(parent);
        }
        false
    }

    /// Collects `root` and all of its descendants breadth-first.
    pub fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        if !self.contains(root) {
            return Vec::new();
        }
        let mut queue: VecDeque<NodeId> = VecDeque::from([root]);
        let mut head = 0;
        while let Some(&id) = queue.get(head) {
            head += 1;
            queue.extend(self.children(id).iter().copied());
        }
        queue.into()
    }

    /// Finds the first node named `name` under `root` (inclusive), breadth-first.
    pub fn find_by_name(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.subtree(root)
            .into_iter()
            .find(|&id| self.name(id) == name)
    }

    /// Attaches a component to `owner`.
    ///
    /// # Panics
    ///
    /// Panics if `owner` does not belong to this graph.
    pub fn add_component(&mut self, owner: NodeId, kind: impl Into<ComponentKind>) -> ComponentId {
        assert!(self.contains(owner), "owner {owner} is not in the graph");
        let id = ComponentId(self.components.len() as u32);
        self.components.push(Component {
            owner,
            kind: kind.into(),
        });
        self.nodes[owner.index()].components.push(id);
        id
    }

    /// Returns a component by id.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.index())
    }

    /// Returns a component by id, mutably.
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(id.index())
    }

    /// Components owned by `id`.
    pub fn components_of(&self, id: NodeId) -> &[ComponentId] {
        self.node(id)
            .map(|node| node.components.as_slice())
            .unwrap_or_default()
    }

    /// Checks the structural invariants of a graph built outside this API,
    /// such as one loaded from a file.
    pub fn validate(&self) -> Result<(), SceneError> {
        for (id, node) in self.nodes() {
            if let Some(parent) = node.parent {
                let siblings = self
                    .node(parent)
                    .ok_or(SceneError::UnknownNode(parent))?
                    .children();
                if !siblings.contains(&id) {
                    return Err(SceneError::BrokenLink { parent, child: id });
                }
            }
            for &child in node.children() {
                if self.node(child).ok_or(SceneError::UnknownNode(child))?.parent != Some(id) {
                    return Err(SceneError::BrokenLink { parent: id, child });
                }
            }
            for &component in node.components() {
                match self.component(component) {
                    Some(c) if c.owner == id => {}
                    _ => return Err(SceneError::BrokenComponent(component)),
                }
            }

            let mut steps = 0;
            let mut current = node.parent;
            while let Some(parent) = current {
                steps += 1;
                if steps > self.nodes.len() {
                    return Err(SceneError::Cycle(id));
                }
                current = self.parent(parent);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rigwright_core::math::FRAC_PI_2;

    fn chain() -> (SceneGraph, NodeId, NodeId, NodeId) {
        let mut scene = SceneGraph::new();
        let root = scene.add_root(
            "root",
            Transform::new(
                Vec3::new(10.0, 0.0, 0.0),
                Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2),
                Vec3::splat(2.0),
            ),
        );
        let mid = scene.add_child(root, "mid", Transform::from_translation(Vec3::new(0.0, 1.0, 0.0)));
        let tip = scene.add_child(mid, "tip", Transform::from_translation(Vec3::new(0.0, 0.0, 1.0)));
        (scene, root, mid, tip)
    }

    #[test]
    fn test_world_matrix_composes_down_the_chain() {
        let (scene, _, mid, tip) = chain();
        assert_abs_diff_eq!(scene.world_position(mid), Vec3::new(10.0, 2.0, 0.0), epsilon = 1e-5);
        // Rotated 90 degrees about Y and scaled by 2: local +Z maps to world +X * 2.
        assert_abs_diff_eq!(scene.world_position(tip), Vec3::new(12.0, 2.0, 0.0), epsilon = 1e-5);
        assert_abs_diff_eq!(scene.lossy_scale(tip), Vec3::splat(2.0));
    }

    #[test]
    fn test_world_setters_round_trip() {
        let (mut scene, _, mid, tip) = chain();
        let target_pos = Vec3::new(-3.0, 4.0, 5.0);
        let target_rot = Quaternion::from_axis_angle(Vec3::new(1.0, 1.0, 0.0), 0.6);

        scene.set_world_position(tip, target_pos);
        scene.set_world_rotation(mid, target_rot);
        scene.set_world_rotation(tip, target_rot);

        assert_abs_diff_eq!(scene.world_rotation(mid), target_rot, epsilon = 1e-5);
        assert_abs_diff_eq!(scene.world_rotation(tip), target_rot, epsilon = 1e-5);
        assert_abs_diff_eq!(scene.local(tip).rotation, Quaternion::IDENTITY, epsilon = 1e-5);
    }

    #[test]
    fn test_sibling_order() {
        let mut scene = SceneGraph::new();
        let root = scene.add_root("root", Transform::identity());
        let a = scene.add_child(root, "a", Transform::identity());
        let b = scene.add_child(root, "b", Transform::identity());
        let c = scene.add_child(root, "c", Transform::identity());

        scene.set_sibling_index(c, 0);
        assert_eq!(scene.children(root), &[c, a, b]);
        scene.set_sibling_index(c, 99);
        assert_eq!(scene.children(root), &[a, b, c]);
        assert_eq!(scene.sibling_index(b), 1);
    }

    #[test]
    fn test_subtree_is_breadth_first() {
        let mut scene = SceneGraph::new();
        let root = scene.add_root("root", Transform::identity());
        let a = scene.add_child(root, "a", Transform::identity());
        let b = scene.add_child(root, "b", Transform::identity());
        let a1 = scene.add_child(a, "a1", Transform::identity());
        let b1 = scene.add_child(b, "b1", Transform::identity());

        assert_eq!(scene.subtree(root), vec![root, a, b, a1, b1]);
        assert_eq!(scene.subtree(a), vec![a, a1]);
        assert_eq!(scene.find_by_name(root, "b1"), Some(b1));
        assert!(scene.is_ancestor_of(root, b1));
        assert!(!scene.is_ancestor_of(a, b1));
        assert_eq!(scene.depth(b1), 2);
    }

    #[test]
    fn test_validate_detects_broken_links() {
        let (scene, ..) = chain();
        assert!(scene.validate().is_ok());

        let text = ron::to_string(&scene).unwrap();
        let mut loaded: SceneGraph = ron::from_str(&text).unwrap();
        assert!(loaded.validate().is_ok());

        loaded.nodes[2].parent = Some(NodeId(0));
        assert!(matches!(
            loaded.validate(),
            Err(SceneError::BrokenLink { .. })
        ));
    }
}
