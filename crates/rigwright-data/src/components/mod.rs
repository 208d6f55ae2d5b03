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

//! Components that nodes of a rig can own.
//!
//! Colliders, constraints and contact volumes are placed relative to bone
//! nodes. A rig edit that moves a bone must re-express them so they stay put
//! in world space. Skinned mesh renderers reference bones by node and carry
//! bind poses in their mesh asset.

mod collider;
mod constraint;
mod contact;
mod skinned_mesh;

pub use self::collider::{Axis, ColliderShape, ShapeCollider};
pub use self::constraint::{ConstraintSource, MultiSourceConstraint};
pub use self::contact::{ContactShape, ContactVolume};
pub use self::skinned_mesh::SkinnedMeshRenderer;

use crate::scene::NodeId;
use serde::{Deserialize, Serialize};

/// Index of a component inside a [`SceneGraph`](crate::scene::SceneGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub u32);

impl ComponentId {
    /// The position of the component in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A component and the node that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// The owning node.
    pub owner: NodeId,
    /// The component data.
    pub kind: ComponentKind,
}

/// The closed set of component kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentKind {
    /// A bounding-shape collider.
    Collider(ShapeCollider),
    /// A weighted multi-source constraint.
    Constraint(MultiSourceConstraint),
    /// A contact volume.
    Contact(ContactVolume),
    /// A skinned mesh renderer.
    SkinnedMesh(SkinnedMeshRenderer),
}

impl From<ShapeCollider> for ComponentKind {
    fn from(value: ShapeCollider) -> Self {
        Self::Collider(value)
    }
}

impl From<MultiSourceConstraint> for ComponentKind {
    fn from(value: MultiSourceConstraint) -> Self {
        Self::Constraint(value)
    }
}

impl From<ContactVolume> for ComponentKind {
    fn from(value: ContactVolume) -> Self {
        Self::Contact(value)
    }
}

impl From<SkinnedMeshRenderer> for ComponentKind {
    fn from(value: SkinnedMeshRenderer) -> Self {
        Self::SkinnedMesh(value)
    }
}
