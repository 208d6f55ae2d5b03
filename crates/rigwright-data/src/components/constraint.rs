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

use rigwright_core::math::{Quaternion, Vec3};
use serde::{Deserialize, Serialize};

use crate::scene::NodeId;

/// One weighted source of a [`MultiSourceConstraint`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSource {
    /// The node the offset is expressed against. Unset sources are ignored.
    pub node: Option<NodeId>,
    /// Blend weight of this source.
    pub weight: f32,
    /// Position offset in the source node's local space.
    pub position_offset: Vec3,
    /// Rotation offset relative to the source node's world rotation.
    pub rotation_offset: Quaternion,
}

impl ConstraintSource {
    /// A full-weight source with no offset.
    pub fn new(node: NodeId) -> Self {
        Self {
            node: Some(node),
            weight: 1.0,
            position_offset: Vec3::ZERO,
            rotation_offset: Quaternion::IDENTITY,
        }
    }
}

/// A constraint that places its owner from several weighted source frames.
///
/// Each source keeps its own offset, so editing one source bone only
/// disturbs that source's slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiSourceConstraint {
    /// The sources, addressed by slot index.
    pub sources: Vec<ConstraintSource>,
}
