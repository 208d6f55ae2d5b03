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

use rigwright_core::math::Vec3;
use serde::{Deserialize, Serialize};

/// A local coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Local X.
    X,
    /// Local Y.
    Y,
    /// Local Z.
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// The component index of the axis.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The unit vector along the axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// Supported collider shapes, sized in the owner's local units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Box with full edge lengths.
    Box {
        /// Edge length along each local axis.
        size: Vec3,
    },
    /// Sphere.
    Sphere {
        /// Radius.
        radius: f32,
    },
    /// Capsule aligned with one local axis.
    Capsule {
        /// Radius of the hemispherical caps.
        radius: f32,
        /// Total height, caps included.
        height: f32,
        /// Local axis the capsule extends along.
        direction: Axis,
    },
}

/// A bounding-shape collider placed in its owner node's local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeCollider {
    /// Shape and size.
    pub shape: ColliderShape,
    /// Center of the shape in the owner's local space.
    pub center: Vec3,
}

impl ShapeCollider {
    /// Creates a box collider.
    pub fn new_box(center: Vec3, size: Vec3) -> Self {
        Self {
            shape: ColliderShape::Box { size },
            center,
        }
    }

    /// Creates a sphere collider.
    pub fn new_sphere(center: Vec3, radius: f32) -> Self {
        Self {
            shape: ColliderShape::Sphere { radius },
            center,
        }
    }

    /// Creates a capsule collider.
    pub fn new_capsule(center: Vec3, radius: f32, height: f32, direction: Axis) -> Self {
        Self {
            shape: ColliderShape::Capsule {
                radius,
                height,
                direction,
            },
            center,
        }
    }
}
