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

//! Finds every non-bone object whose placement depends on a bone.

use std::collections::HashMap;

use rigwright_data::{
    components::{ComponentId, ComponentKind},
    NodeId, SceneGraph,
};

/// An object whose world pose must survive bone edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffectedObject {
    /// A plain node, such as a child of an edited bone.
    Node(NodeId),
    /// A collider, constraint or contact volume.
    Component(ComponentId),
}

/// One placement of an affected object relative to an anchor node.
///
/// `slot` addresses the source of a multi-source constraint and is `None`
/// for objects with a single anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchored {
    /// The dependent object.
    pub object: AffectedObject,
    /// Source slot for multi-source objects.
    pub slot: Option<usize>,
}

/// Affected objects bucketed by the node they are placed against.
#[derive(Debug, Default)]
pub struct AffectedIndex {
    buckets: HashMap<NodeId, Vec<Anchored>>,
}

impl AffectedIndex {
    /// Scans the subtree under `root` breadth-first.
    ///
    /// Anchors pointing at nodes that do not exist are skipped.
    pub fn scan(scene: &SceneGraph, root: NodeId) -> Self {
        let mut index = Self::default();
        for node in scene.subtree(root) {
            for &id in scene.components_of(node) {
                let Some(component) = scene.component(id) else {
                    continue;
                };
                let object = AffectedObject::Component(id);
                match &component.kind {
                    ComponentKind::Collider(_) => index.push(scene, component.owner, object, None),
                    ComponentKind::Constraint(constraint) => {
                        for (slot, source) in constraint.sources.iter().enumerate() {
                            if let Some(anchor) = source.node {
                                index.push(scene, anchor, object, Some(slot));
                            }
                        }
                    }
                    ComponentKind::Contact(contact) => {
                        let anchor = contact.root.unwrap_or(component.owner);
                        index.push(scene, anchor, object, None);
                    }
                    ComponentKind::SkinnedMesh(_) => {}
                }
            }
        }
        log::debug!(
            "AffectedIndex: {} anchored objects across {} nodes",
            index.len(),
            index.buckets.len()
        );
        index
    }

    fn push(&mut self, scene: &SceneGraph, anchor: NodeId, object: AffectedObject, slot: Option<usize>) {
        if !scene.contains(anchor) {
            log::trace!("AffectedIndex: skipping {object:?}, anchor {anchor} does not exist");
            return;
        }
        self.buckets
            .entry(anchor)
            .or_default()
            .push(Anchored { object, slot });
    }

    /// Objects placed against `node`.
    pub fn anchored_to(&self, node: NodeId) -> &[Anchored] {
        self.buckets.get(&node).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of anchored placements.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Whether nothing is anchored anywhere.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigwright_core::math::Vec3;
    use rigwright_data::{
        components::{ConstraintSource, ContactVolume, MultiSourceConstraint, ShapeCollider, SkinnedMeshRenderer},
        Transform,
    };

    #[test]
    fn test_scan_buckets_by_anchor() {
        let mut scene = SceneGraph::new();
        let root = scene.add_root("root", Transform::identity());
        let hips = scene.add_child(root, "hips", Transform::identity());
        let spine = scene.add_child(hips, "spine", Transform::identity());
        let props = scene.add_child(root, "props", Transform::identity());

        let collider = scene.add_component(spine, ShapeCollider::new_sphere(Vec3::ZERO, 0.1));
        let constraint = scene.add_component(
            props,
            MultiSourceConstraint {
                sources: vec![
                    ConstraintSource::new(hips),
                    ConstraintSource::new(spine),
                    ConstraintSource {
                        node: Some(NodeId(99)),
                        ..ConstraintSource::new(hips)
                    },
                ],
            },
        );
        let contact = scene.add_component(
            props,
            ContactVolume {
                root: Some(hips),
                ..ContactVolume::sphere(0.2)
            },
        );
        scene.add_component(root, SkinnedMeshRenderer::default());

        let index = AffectedIndex::scan(&scene, root);

        assert_eq!(index.len(), 4);
        assert_eq!(
            index.anchored_to(spine),
            &[
                Anchored { object: AffectedObject::Component(constraint), slot: Some(1) },
                Anchored { object: AffectedObject::Component(collider), slot: None },
            ]
        );
        let on_hips = index.anchored_to(hips);
        assert!(on_hips.contains(&Anchored {
            object: AffectedObject::Component(constraint),
            slot: Some(0)
        }));
        assert!(on_hips.contains(&Anchored {
            object: AffectedObject::Component(contact),
            slot: None
        }));
        assert!(index.anchored_to(props).is_empty());
        assert!(index.anchored_to(root).is_empty());
    }
}
