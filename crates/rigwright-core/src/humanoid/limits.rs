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

use super::HumanRole::{self, *};
use crate::math::Vec3;
use serde::{Deserialize, Serialize};

/// Per-joint rotation range, in degrees.
///
/// The axes are twist (x), side-to-side (y) and front-to-back (z).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationLimit {
    /// Lower bound of each axis.
    pub min: Vec3,
    /// Upper bound of each axis.
    pub max: Vec3,
    /// Rest angle of each axis.
    pub center: Vec3,
}

impl RotationLimit {
    /// A joint that does not rotate at all.
    pub const LOCKED: Self = Self::symmetric(0.0, 0.0, 0.0);

    /// Creates a limit from explicit bounds.
    pub const fn new(min: Vec3, max: Vec3, center: Vec3) -> Self {
        Self { min, max, center }
    }

    const fn symmetric(twist: f32, side: f32, front: f32) -> Self {
        Self::range(twist, twist, side, side, front, front)
    }

    const fn range(
        twist_min: f32,
        twist_max: f32,
        side_min: f32,
        side_max: f32,
        front_min: f32,
        front_max: f32,
    ) -> Self {
        Self {
            min: Vec3::new(-twist_min, -side_min, -front_min),
            max: Vec3::new(twist_max, side_max, front_max),
            center: Vec3::ZERO,
        }
    }

    /// The stock range of motion for `role`.
    pub const fn default_for(role: HumanRole) -> Self {
        match role {
            Hips => Self::LOCKED,
            LeftUpperLeg | RightUpperLeg => Self::range(60.0, 60.0, 60.0, 60.0, 90.0, 50.0),
            LeftLowerLeg | RightLowerLeg => Self::symmetric(90.0, 0.0, 80.0),
            LeftFoot | RightFoot => Self::symmetric(30.0, 20.0, 50.0),
            LeftToes | RightToes => Self::symmetric(0.0, 0.0, 50.0),
            Spine | Chest => Self::symmetric(40.0, 40.0, 40.0),
            UpperChest => Self::symmetric(20.0, 20.0, 20.0),
            Neck | Head => Self::symmetric(40.0, 40.0, 40.0),
            LeftShoulder | RightShoulder => Self::range(0.0, 0.0, 15.0, 15.0, 15.0, 30.0),
            LeftUpperArm | RightUpperArm => Self::range(90.0, 90.0, 100.0, 100.0, 60.0, 100.0),
            LeftLowerArm | RightLowerArm => Self::symmetric(90.0, 0.0, 80.0),
            LeftHand | RightHand => Self::symmetric(40.0, 40.0, 80.0),
            LeftEye | RightEye => Self::range(0.0, 0.0, 20.0, 20.0, 10.0, 15.0),
            Jaw => Self::symmetric(0.0, 10.0, 10.0),
            LeftThumbProximal | RightThumbProximal => Self::symmetric(0.0, 25.0, 20.0),
            LeftThumbIntermediate | RightThumbIntermediate | LeftThumbDistal | RightThumbDistal => {
                Self::range(0.0, 0.0, 0.0, 0.0, 40.0, 35.0)
            }
            LeftIndexProximal | LeftMiddleProximal | LeftRingProximal | LeftLittleProximal
            | RightIndexProximal | RightMiddleProximal | RightRingProximal
            | RightLittleProximal => Self::symmetric(0.0, 20.0, 50.0),
            _ => Self::symmetric(0.0, 0.0, 45.0),
        }
    }
}

impl Default for RotationLimit {
    fn default() -> Self {
        Self::LOCKED
    }
}
