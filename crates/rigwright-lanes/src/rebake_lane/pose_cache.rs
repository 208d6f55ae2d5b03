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

//! Captures the pose of dependent objects before a bone edit and puts them
//! back afterwards, so they keep their world placement.

use std::collections::HashSet;

use rigwright_core::math::{Quaternion, Vec3, EPSILON};
use rigwright_data::{
    components::{Axis, ColliderShape, ComponentKind, ContactVolume, ShapeCollider},
    NodeId, SceneGraph,
};

use super::affected_index::{AffectedIndex, AffectedObject, Anchored};

/// The frame a snapshot was taken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseSpace {
    /// Values as stored on the object, relative to its anchor.
    Local,
    /// Values in world space.
    World,
}

/// A captured placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSnapshot {
    /// Position, or a shape's center.
    pub position: Vec3,
    /// Rotation. For colliders this is the owner's rotation.
    pub rotation: Quaternion,
    /// Scale or shape dimensions, when the object has any.
    pub size: Option<Vec3>,
    /// The frame the values are expressed in.
    pub space: PoseSpace,
}

/// Extraction and re-injection of an object's placement.
pub trait PoseCapturable {
    /// Reads the placement at `slot`. `None` if the object or its anchor no
    /// longer resolves.
    fn extract(&self, scene: &SceneGraph, slot: Option<usize>, space: PoseSpace) -> Option<PoseSnapshot>;

    /// Writes `pose` back, re-expressing it against the anchor's current frame.
    fn inject(&self, scene: &mut SceneGraph, slot: Option<usize>, pose: &PoseSnapshot);
}

impl PoseCapturable for AffectedObject {
    fn extract(&self, scene: &SceneGraph, slot: Option<usize>, space: PoseSpace) -> Option<PoseSnapshot> {
        match *self {
            AffectedObject::Node(node) => extract_node(scene, node, space),
            AffectedObject::Component(id) => {
                let component = scene.component(id)?;
                match &component.kind {
                    ComponentKind::Collider(collider) => {
                        Some(extract_collider(scene, component.owner, collider, space))
                    }
                    ComponentKind::Constraint(constraint) => {
                        let source = constraint.sources.get(slot?)?;
                        let anchor = source.node.filter(|&n| scene.contains(n))?;
                        Some(extract_relative(
                            scene,
                            anchor,
                            source.position_offset,
                            source.rotation_offset,
                            None,
                            space,
                        ))
                    }
                    ComponentKind::Contact(contact) => {
                        let anchor = contact.root.unwrap_or(component.owner);
                        if !scene.contains(anchor) {
                            return None;
                        }
                        Some(extract_relative(
                            scene,
                            anchor,
                            contact.position,
                            contact.rotation,
                            Some(contact_dims(contact)),
                            space,
                        ))
                    }
                    ComponentKind::SkinnedMesh(_) => None,
                }
            }
        }
    }

    fn inject(&self, scene: &mut SceneGraph, slot: Option<usize>, pose: &PoseSnapshot) {
        match *self {
            AffectedObject::Node(node) => inject_node(scene, node, pose),
            AffectedObject::Component(id) => {
                let Some(component) = scene.component(id).cloned() else {
                    return;
                };
                let owner = component.owner;
                match component.kind {
                    ComponentKind::Collider(collider) => {
                        let collider = inject_collider(scene, owner, collider, pose);
                        if let Some(ComponentKind::Collider(target)) =
                            scene.component_mut(id).map(|c| &mut c.kind)
                        {
                            *target = collider;
                        }
                    }
                    ComponentKind::Constraint(constraint) => {
                        let Some(slot) = slot else {
                            return;
                        };
                        let Some(anchor) = constraint
                            .sources
                            .get(slot)
                            .and_then(|source| source.node)
                            .filter(|&n| scene.contains(n))
                        else {
                            return;
                        };
                        let (position, rotation, _) = relative_from_pose(scene, anchor, pose);
                        if let Some(ComponentKind::Constraint(target)) =
                            scene.component_mut(id).map(|c| &mut c.kind)
                        {
                            if let Some(source) = target.sources.get_mut(slot) {
                                source.position_offset = position;
                                source.rotation_offset = rotation;
                            }
                        }
                    }
                    ComponentKind::Contact(contact) => {
                        let anchor = contact.root.unwrap_or(owner);
                        if !scene.contains(anchor) {
                            return;
                        }
                        let (position, rotation, dims) = relative_from_pose(scene, anchor, pose);
                        if let Some(ComponentKind::Contact(target)) =
                            scene.component_mut(id).map(|c| &mut c.kind)
                        {
                            target.position = position;
                            target.rotation = rotation;
                            if let Some(dims) = dims {
                                target.radius = dims.x;
                                target.height = dims.y;
                            }
                        }
                    }
                    ComponentKind::SkinnedMesh(_) => {}
                }
            }
        }
    }
}

fn extract_node(scene: &SceneGraph, node: NodeId, space: PoseSpace) -> Option<PoseSnapshot> {
    let transform = scene.node(node)?.transform;
    Some(match space {
        PoseSpace::Local => PoseSnapshot {
            position: transform.translation,
            rotation: transform.rotation,
            size: Some(transform.scale),
            space,
        },
        PoseSpace::World => PoseSnapshot {
            position: scene.world_position(node),
            rotation: scene.world_rotation(node),
            size: None,
            space,
        },
    })
}

fn inject_node(scene: &mut SceneGraph, node: NodeId, pose: &PoseSnapshot) {
    match pose.space {
        PoseSpace::Local => {
            let mut transform = scene.local(node);
            transform.translation = pose.position;
            transform.rotation = pose.rotation;
            if let Some(scale) = pose.size {
                transform.scale = scale;
            }
            scene.set_local(node, transform);
        }
        PoseSpace::World => {
            scene.set_world_rotation(node, pose.rotation);
            scene.set_world_position(node, pose.position);
        }
    }
}

/// Largest scale of the two axes perpendicular to `axis`.
fn perpendicular_scale(scale: Vec3, axis: Axis) -> f32 {
    let i = axis.index();
    scale[(i + 1) % 3].max(scale[(i + 2) % 3])
}

fn safe_div(value: f32, scale: f32) -> f32 {
    if scale.abs() > EPSILON {
        value / scale
    } else {
        value
    }
}

fn shape_dims(shape: &ColliderShape) -> Vec3 {
    match *shape {
        ColliderShape::Box { size } => size,
        ColliderShape::Sphere { radius } => Vec3::new(radius, 0.0, 0.0),
        ColliderShape::Capsule { radius, height, .. } => Vec3::new(radius, height, 0.0),
    }
}

fn scaled_shape_dims(shape: &ColliderShape, scale: Vec3) -> Vec3 {
    match *shape {
        ColliderShape::Box { size } => size * scale,
        ColliderShape::Sphere { radius } => Vec3::new(radius * scale.max_element(), 0.0, 0.0),
        ColliderShape::Capsule {
            radius,
            height,
            direction,
        } => Vec3::new(
            radius * perpendicular_scale(scale, direction),
            height * scale[direction.index()],
            0.0,
        ),
    }
}

fn extract_collider(
    scene: &SceneGraph,
    owner: NodeId,
    collider: &ShapeCollider,
    space: PoseSpace,
) -> PoseSnapshot {
    match space {
        PoseSpace::Local => PoseSnapshot {
            position: collider.center,
            rotation: Quaternion::IDENTITY,
            size: Some(shape_dims(&collider.shape)),
            space,
        },
        PoseSpace::World => PoseSnapshot {
            position: scene.world_matrix(owner).transform_point(collider.center),
            rotation: scene.world_rotation(owner),
            size: Some(scaled_shape_dims(&collider.shape, scene.lossy_scale(owner))),
            space,
        },
    }
}

fn inject_collider(
    scene: &SceneGraph,
    owner: NodeId,
    mut collider: ShapeCollider,
    pose: &PoseSnapshot,
) -> ShapeCollider {
    let (center, scale) = match pose.space {
        PoseSpace::Local => (pose.position, Vec3::ONE),
        PoseSpace::World => (
            scene.inverse_transform_point(owner, pose.position),
            scene.lossy_scale(owner),
        ),
    };
    collider.center = center;
    let Some(dims) = pose.size else {
        return collider;
    };

    collider.shape = match collider.shape {
        ColliderShape::Box { .. } => ColliderShape::Box {
            size: dims.div_or_keep(scale),
        },
        ColliderShape::Sphere { .. } => ColliderShape::Sphere {
            radius: safe_div(dims.x, scale.max_element()),
        },
        ColliderShape::Capsule { direction, .. } => {
            let direction = match pose.space {
                PoseSpace::Local => direction,
                PoseSpace::World => nearest_axis(
                    scene.world_rotation(owner),
                    pose.rotation * direction.unit(),
                ),
            };
            ColliderShape::Capsule {
                radius: safe_div(dims.x, perpendicular_scale(scale, direction)),
                height: safe_div(dims.y, scale[direction.index()]),
                direction,
            }
        }
    };
    collider
}

/// The local axis of `rotation` that lines up best with `world_axis`.
fn nearest_axis(rotation: Quaternion, world_axis: Vec3) -> Axis {
    let basis = rotation.axes();
    let mut best = Axis::Y;
    let mut best_alignment = f32::MIN;
    for axis in Axis::ALL {
        let alignment = basis[axis.index()].dot(world_axis).abs();
        if alignment > best_alignment + EPSILON {
            best = axis;
            best_alignment = alignment;
        }
    }
    best
}

fn contact_dims(contact: &ContactVolume) -> Vec3 {
    Vec3::new(contact.radius, contact.height, 0.0)
}

fn extract_relative(
    scene: &SceneGraph,
    anchor: NodeId,
    position: Vec3,
    rotation: Quaternion,
    dims: Option<Vec3>,
    space: PoseSpace,
) -> PoseSnapshot {
    match space {
        PoseSpace::Local => PoseSnapshot {
            position,
            rotation,
            size: dims,
            space,
        },
        PoseSpace::World => PoseSnapshot {
            position: scene.world_matrix(anchor).transform_point(position),
            rotation: scene.world_rotation(anchor) * rotation,
            size: dims.map(|d| d * scene.lossy_scale(anchor).max_element()),
            space,
        },
    }
}

fn relative_from_pose(
    scene: &SceneGraph,
    anchor: NodeId,
    pose: &PoseSnapshot,
) -> (Vec3, Quaternion, Option<Vec3>) {
    match pose.space {
        PoseSpace::Local => (pose.position, pose.rotation, pose.size),
        PoseSpace::World => {
            let scale = scene.lossy_scale(anchor).max_element();
            (
                scene.inverse_transform_point(anchor, pose.position),
                (scene.world_rotation(anchor).inverse() * pose.rotation).normalize(),
                pose.size.map(|d| Vec3::new(safe_div(d.x, scale), safe_div(d.y, scale), d.z)),
            )
        }
    }
}

/// Snapshots taken before an edit, restored in the order they were taken.
///
/// Caching the same object twice keeps the first snapshot, so a batch of
/// edits restores objects to where they were before the batch began.
#[derive(Debug, Default)]
pub struct PoseCache {
    entries: Vec<(Anchored, PoseSnapshot)>,
    keys: HashSet<Anchored>,
}

impl PoseCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots `object` at `slot`, unless it is already cached.
    pub fn cache(&mut self, scene: &SceneGraph, object: AffectedObject, slot: Option<usize>, space: PoseSpace) {
        let key = Anchored { object, slot };
        if self.keys.contains(&key) {
            return;
        }
        if let Some(pose) = object.extract(scene, slot, space) {
            self.keys.insert(key);
            self.entries.push((key, pose));
        }
    }

    /// Snapshots every child of `node` in world space.
    pub fn cache_children(&mut self, scene: &SceneGraph, node: NodeId) {
        self.cache_children_except(scene, node, None);
    }

    /// Snapshots every child of `node` other than `skip` in world space.
    pub fn cache_children_except(&mut self, scene: &SceneGraph, node: NodeId, skip: Option<NodeId>) {
        for &child in scene.children(node) {
            if Some(child) != skip {
                self.cache(scene, AffectedObject::Node(child), None, PoseSpace::World);
            }
        }
    }

    /// Snapshots every object anchored to `node` in world space.
    pub fn cache_anchored(&mut self, scene: &SceneGraph, index: &AffectedIndex, node: NodeId) {
        for anchored in index.anchored_to(node) {
            self.cache(scene, anchored.object, anchored.slot, PoseSpace::World);
        }
    }

    /// Number of cached snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-applies every snapshot in insertion order and empties the cache.
    pub fn restore_all(&mut self, scene: &mut SceneGraph) {
        for (key, pose) in self.entries.drain(..) {
            key.object.inject(scene, key.slot, &pose);
        }
        self.keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rigwright_core::math::FRAC_PI_2;
    use rigwright_data::{
        components::{ConstraintSource, ContactShape, MultiSourceConstraint},
        Transform,
    };

    fn rig() -> (SceneGraph, NodeId, NodeId, NodeId) {
        let mut scene = SceneGraph::new();
        let root = scene.add_root("root", Transform::identity());
        let hips = scene.add_child(
            root,
            "hips",
            Transform::new(
                Vec3::new(0.0, 1.0, 0.0),
                Quaternion::from_axis_angle(Vec3::Z, 0.3),
                Vec3::new(1.0, 2.0, 1.0),
            ),
        );
        let spine = scene.add_child(hips, "spine", Transform::from_translation(Vec3::new(0.0, 0.2, 0.0)));
        (scene, root, hips, spine)
    }

    fn bend(scene: &mut SceneGraph, node: NodeId) {
        let mut local = scene.local(node);
        local.rotation = Quaternion::from_axis_angle(Vec3::new(1.0, 0.0, 1.0), 1.2) * local.rotation;
        scene.set_local(node, local);
    }

    #[test]
    fn test_capsule_keeps_world_pose_and_picks_new_axis() {
        let (mut scene, root, _hips, spine) = rig();
        let capsule = scene.add_component(
            spine,
            ShapeCollider::new_capsule(Vec3::new(0.0, 0.1, 0.0), 0.05, 0.3, Axis::Y),
        );
        let index = AffectedIndex::scan(&scene, root);
        let object = AffectedObject::Component(capsule);
        let before = object.extract(&scene, None, PoseSpace::World).unwrap();

        let mut cache = PoseCache::new();
        cache.cache_anchored(&scene, &index, spine);
        scene.set_world_rotation(spine, Quaternion::from_axis_angle(Vec3::Z, -FRAC_PI_2));
        cache.restore_all(&mut scene);

        let after = object.extract(&scene, None, PoseSpace::World).unwrap();
        assert_abs_diff_eq!(after.position, before.position, epsilon = 1e-4);
        assert!(cache.is_empty());

        // Rotating the spine by a quarter turn about Z swaps which local axis
        // runs along the capsule.
        match scene.component(capsule).map(|c| &c.kind) {
            Some(ComponentKind::Collider(ShapeCollider {
                shape: ColliderShape::Capsule { direction, .. },
                ..
            })) => assert_eq!(*direction, Axis::X),
            other => panic!("unexpected component {other:?}"),
        }
    }

    #[test]
    fn test_constraint_and_contact_keep_world_pose() {
        let (mut scene, root, hips, spine) = rig();
        let constraint = scene.add_component(
            root,
            MultiSourceConstraint {
                sources: vec![
                    ConstraintSource {
                        position_offset: Vec3::new(0.1, 0.0, 0.3),
                        rotation_offset: Quaternion::from_axis_angle(Vec3::Y, 0.4),
                        ..ConstraintSource::new(spine)
                    },
                    ConstraintSource::new(hips),
                ],
            },
        );
        let contact = scene.add_component(
            spine,
            ContactVolume {
                shape: ContactShape::Capsule,
                height: 0.4,
                position: Vec3::new(0.0, 0.05, 0.1),
                ..ContactVolume::sphere(0.08)
            },
        );
        let index = AffectedIndex::scan(&scene, root);
        let objects = [
            (AffectedObject::Component(constraint), Some(0)),
            (AffectedObject::Component(contact), None),
        ];
        let before: Vec<_> = objects
            .iter()
            .map(|(o, slot)| o.extract(&scene, *slot, PoseSpace::World).unwrap())
            .collect();

        let mut cache = PoseCache::new();
        cache.cache_anchored(&scene, &index, spine);
        assert_eq!(cache.len(), 2);
        bend(&mut scene, spine);
        cache.restore_all(&mut scene);

        for ((object, slot), before) in objects.iter().zip(before) {
            let after = object.extract(&scene, *slot, PoseSpace::World).unwrap();
            assert_abs_diff_eq!(after.position, before.position, epsilon = 1e-4);
            assert_abs_diff_eq!(after.rotation, before.rotation, epsilon = 1e-4);
            assert_abs_diff_eq!(after.size.unwrap_or_default(), before.size.unwrap_or_default(), epsilon = 1e-4);
        }
    }

    #[test]
    fn test_recaching_keeps_the_oldest_pose() {
        let (mut scene, _, hips, spine) = rig();
        let mut cache = PoseCache::new();
        let original = scene.world_position(spine);

        cache.cache_children(&scene, hips);
        scene.set_world_position(spine, Vec3::new(5.0, 5.0, 5.0));
        cache.cache_children(&scene, hips);
        assert_eq!(cache.len(), 1);

        bend(&mut scene, hips);
        cache.restore_all(&mut scene);
        assert_abs_diff_eq!(scene.world_position(spine), original, epsilon = 1e-4);
    }

    #[test]
    fn test_local_snapshot_restores_verbatim() {
        let (mut scene, _, _, spine) = rig();
        let object = AffectedObject::Node(spine);
        let local = scene.local(spine);

        let mut cache = PoseCache::new();
        cache.cache(&scene, object, None, PoseSpace::Local);
        scene.set_local(spine, Transform::identity());
        cache.restore_all(&mut scene);

        assert_eq!(scene.local(spine), local);
    }
}
