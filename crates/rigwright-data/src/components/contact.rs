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

/// Shape of a [`ContactVolume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactShape {
    /// A sphere of `radius`.
    Sphere,
    /// A capsule of `radius` and `height` along the local Y axis.
    Capsule,
}

/// A contact sensor or sender volume, placed relative to an optional root
/// node and otherwise relative to its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactVolume {
    /// Node the placement is relative to. `None` means the owner.
    pub root: Option<NodeId>,
    /// Shape of the volume.
    pub shape: ContactShape,
    /// Radius, in the anchor's local units.
    pub radius: f32,
    /// Height for capsules, in the anchor's local units.
    pub height: f32,
    /// Position in the anchor's local space.
    pub position: Vec3,
    /// Rotation relative to the anchor.
    pub rotation: Quaternion,
}

impl ContactVolume {
    /// A sphere volume centered on its owner.
    pub fn sphere(radius: f32) -> Self {
        Self {
            root: None,
            shape: ContactShape::Sphere,
            radius,
            height: 0.0,
            position: Vec3::ZERO,
            rotation: Quaternion::IDENTITY,
        }
    }
}
