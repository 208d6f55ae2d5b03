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

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::OnceLock};

/// Which half of the body a role belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The character's left.
    Left,
    /// The character's right.
    Right,
}

/// One slot of a humanoid skeleton.
///
/// The declaration order is the canonical traversal order: hips first,
/// upper chest last. Every pass that walks "all roles" walks them in this
/// order, and [`HumanRole::ALL`] lists them the same way.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum HumanRole {
    Hips,
    LeftUpperLeg,
    RightUpperLeg,
    LeftLowerLeg,
    RightLowerLeg,
    LeftFoot,
    RightFoot,
    Spine,
    Chest,
    Neck,
    Head,
    LeftShoulder,
    RightShoulder,
    LeftUpperArm,
    RightUpperArm,
    LeftLowerArm,
    RightLowerArm,
    LeftHand,
    RightHand,
    LeftToes,
    RightToes,
    LeftEye,
    RightEye,
    Jaw,
    LeftThumbProximal,
    LeftThumbIntermediate,
    LeftThumbDistal,
    LeftIndexProximal,
    LeftIndexIntermediate,
    LeftIndexDistal,
    LeftMiddleProximal,
    LeftMiddleIntermediate,
    LeftMiddleDistal,
    LeftRingProximal,
    LeftRingIntermediate,
    LeftRingDistal,
    LeftLittleProximal,
    LeftLittleIntermediate,
    LeftLittleDistal,
    RightThumbProximal,
    RightThumbIntermediate,
    RightThumbDistal,
    RightIndexProximal,
    RightIndexIntermediate,
    RightIndexDistal,
    RightMiddleProximal,
    RightMiddleIntermediate,
    RightMiddleDistal,
    RightRingProximal,
    RightRingIntermediate,
    RightRingDistal,
    RightLittleProximal,
    RightLittleIntermediate,
    RightLittleDistal,
    UpperChest,
}

use HumanRole::*;

impl HumanRole {
    /// Number of roles.
    pub const COUNT: usize = 55;

    /// Every role, in canonical order.
    pub const ALL: [HumanRole; HumanRole::COUNT] = [
        Hips,
        LeftUpperLeg,
        RightUpperLeg,
        LeftLowerLeg,
        RightLowerLeg,
        LeftFoot,
        RightFoot,
        Spine,
        Chest,
        Neck,
        Head,
        LeftShoulder,
        RightShoulder,
        LeftUpperArm,
        RightUpperArm,
        LeftLowerArm,
        RightLowerArm,
        LeftHand,
        RightHand,
        LeftToes,
        RightToes,
        LeftEye,
        RightEye,
        Jaw,
        LeftThumbProximal,
        LeftThumbIntermediate,
        LeftThumbDistal,
        LeftIndexProximal,
        LeftIndexIntermediate,
        LeftIndexDistal,
        LeftMiddleProximal,
        LeftMiddleIntermediate,
        LeftMiddleDistal,
        LeftRingProximal,
        LeftRingIntermediate,
        LeftRingDistal,
        LeftLittleProximal,
        LeftLittleIntermediate,
        LeftLittleDistal,
        RightThumbProximal,
        RightThumbIntermediate,
        RightThumbDistal,
        RightIndexProximal,
        RightIndexIntermediate,
        RightIndexDistal,
        RightMiddleProximal,
        RightMiddleIntermediate,
        RightMiddleDistal,
        RightRingProximal,
        RightRingIntermediate,
        RightRingDistal,
        RightLittleProximal,
        RightLittleIntermediate,
        RightLittleDistal,
        UpperChest,
    ];

    /// Roles a descriptor cannot be built without.
    pub const REQUIRED: [HumanRole; 15] = [
        Hips,
        Spine,
        Head,
        LeftUpperLeg,
        RightUpperLeg,
        LeftLowerLeg,
        RightLowerLeg,
        LeftFoot,
        RightFoot,
        LeftUpperArm,
        RightUpperArm,
        LeftLowerArm,
        RightLowerArm,
        LeftHand,
        RightHand,
    ];

    /// Position of the role in canonical order.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks a role up by its canonical index.
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The anatomical parent role, `None` for the hips.
    pub const fn parent(self) -> Option<Self> {
        Some(match self {
            Hips => return None,
            LeftUpperLeg | RightUpperLeg | Spine => Hips,
            LeftLowerLeg => LeftUpperLeg,
            RightLowerLeg => RightUpperLeg,
            LeftFoot => LeftLowerLeg,
            RightFoot => RightLowerLeg,
            LeftToes => LeftFoot,
            RightToes => RightFoot,
            Chest => Spine,
            UpperChest => Chest,
            Neck | LeftShoulder | RightShoulder => UpperChest,
            Head => Neck,
            LeftEye | RightEye | Jaw => Head,
            LeftUpperArm => LeftShoulder,
            RightUpperArm => RightShoulder,
            LeftLowerArm => LeftUpperArm,
            RightLowerArm => RightUpperArm,
            LeftHand => LeftLowerArm,
            RightHand => RightLowerArm,
            LeftThumbProximal | LeftIndexProximal | LeftMiddleProximal | LeftRingProximal
            | LeftLittleProximal => LeftHand,
            RightThumbProximal | RightIndexProximal | RightMiddleProximal | RightRingProximal
            | RightLittleProximal => RightHand,
            LeftThumbIntermediate => LeftThumbProximal,
            LeftIndexIntermediate => LeftIndexProximal,
            LeftMiddleIntermediate => LeftMiddleProximal,
            LeftRingIntermediate => LeftRingProximal,
            LeftLittleIntermediate => LeftLittleProximal,
            RightThumbIntermediate => RightThumbProximal,
            RightIndexIntermediate => RightIndexProximal,
            RightMiddleIntermediate => RightMiddleProximal,
            RightRingIntermediate => RightRingProximal,
            RightLittleIntermediate => RightLittleProximal,
            LeftThumbDistal => LeftThumbIntermediate,
            LeftIndexDistal => LeftIndexIntermediate,
            LeftMiddleDistal => LeftMiddleIntermediate,
            LeftRingDistal => LeftRingIntermediate,
            LeftLittleDistal => LeftLittleIntermediate,
            RightThumbDistal => RightThumbIntermediate,
            RightIndexDistal => RightIndexIntermediate,
            RightMiddleDistal => RightMiddleIntermediate,
            RightRingDistal => RightRingIntermediate,
            RightLittleDistal => RightLittleIntermediate,
        })
    }

    /// Iterates the ancestor roles from the direct parent up to the hips.
    pub fn ancestors(self) -> impl Iterator<Item = HumanRole> {
        std::iter::successors(self.parent(), |role| role.parent())
    }

    /// Iterates the roles whose parent is `self`, in canonical order.
    pub fn children(self) -> impl Iterator<Item = HumanRole> {
        Self::ALL
            .into_iter()
            .filter(move |role| role.parent() == Some(self))
    }

    /// The single child role this role points at, if it has exactly one.
    ///
    /// Branching roles (hips, upper chest, head, hands) and leaves have none.
    pub fn child_of_interest(self) -> Option<HumanRole> {
        child_of_interest_table()[self.index()]
    }

    /// Whether a descriptor requires this role to be mapped.
    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }

    /// Whether this limb segment may carry an unmapped twist helper bone.
    pub const fn carries_twist(self) -> bool {
        matches!(
            self,
            LeftUpperArm
                | RightUpperArm
                | LeftLowerArm
                | RightLowerArm
                | LeftUpperLeg
                | RightUpperLeg
                | LeftLowerLeg
                | RightLowerLeg
        )
    }

    /// Whether the role is oriented like the root instead of along a limb.
    pub const fn aligns_to_root(self) -> bool {
        matches!(self, Hips | LeftEye | RightEye)
    }

    /// The body side of the role, `None` for roles on the center line.
    pub fn side(self) -> Option<Side> {
        let name = self.name();
        if name.starts_with("left_") {
            Some(Side::Left)
        } else if name.starts_with("right_") {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// The `snake_case` name used in serialized settings and descriptors.
    pub const fn name(self) -> &'static str {
        match self {
            Hips => "hips",
            LeftUpperLeg => "left_upper_leg",
            RightUpperLeg => "right_upper_leg",
            LeftLowerLeg => "left_lower_leg",
            RightLowerLeg => "right_lower_leg",
            LeftFoot => "left_foot",
            RightFoot => "right_foot",
            Spine => "spine",
            Chest => "chest",
            Neck => "neck",
            Head => "head",
            LeftShoulder => "left_shoulder",
            RightShoulder => "right_shoulder",
            LeftUpperArm => "left_upper_arm",
            RightUpperArm => "right_upper_arm",
            LeftLowerArm => "left_lower_arm",
            RightLowerArm => "right_lower_arm",
            LeftHand => "left_hand",
            RightHand => "right_hand",
            LeftToes => "left_toes",
            RightToes => "right_toes",
            LeftEye => "left_eye",
            RightEye => "right_eye",
            Jaw => "jaw",
            LeftThumbProximal => "left_thumb_proximal",
            LeftThumbIntermediate => "left_thumb_intermediate",
            LeftThumbDistal => "left_thumb_distal",
            LeftIndexProximal => "left_index_proximal",
            LeftIndexIntermediate => "left_index_intermediate",
            LeftIndexDistal => "left_index_distal",
            LeftMiddleProximal => "left_middle_proximal",
            LeftMiddleIntermediate => "left_middle_intermediate",
            LeftMiddleDistal => "left_middle_distal",
            LeftRingProximal => "left_ring_proximal",
            LeftRingIntermediate => "left_ring_intermediate",
            LeftRingDistal => "left_ring_distal",
            LeftLittleProximal => "left_little_proximal",
            LeftLittleIntermediate => "left_little_intermediate",
            LeftLittleDistal => "left_little_distal",
            RightThumbProximal => "right_thumb_proximal",
            RightThumbIntermediate => "right_thumb_intermediate",
            RightThumbDistal => "right_thumb_distal",
            RightIndexProximal => "right_index_proximal",
            RightIndexIntermediate => "right_index_intermediate",
            RightIndexDistal => "right_index_distal",
            RightMiddleProximal => "right_middle_proximal",
            RightMiddleIntermediate => "right_middle_intermediate",
            RightMiddleDistal => "right_middle_distal",
            RightRingProximal => "right_ring_proximal",
            RightRingIntermediate => "right_ring_intermediate",
            RightRingDistal => "right_ring_distal",
            RightLittleProximal => "right_little_proximal",
            RightLittleIntermediate => "right_little_intermediate",
            RightLittleDistal => "right_little_distal",
            UpperChest => "upper_chest",
        }
    }
}

static CHILD_OF_INTEREST: OnceLock<[Option<HumanRole>; HumanRole::COUNT]> = OnceLock::new();

fn child_of_interest_table() -> &'static [Option<HumanRole>; HumanRole::COUNT] {
    CHILD_OF_INTEREST.get_or_init(|| {
        let mut child_counts = [0usize; HumanRole::COUNT];
        let mut table = [None; HumanRole::COUNT];
        for role in HumanRole::ALL {
            if let Some(parent) = role.parent() {
                child_counts[parent.index()] += 1;
                table[parent.index()] = Some(role);
            }
        }
        for (slot, count) in table.iter_mut().zip(child_counts) {
            if count != 1 {
                *slot = None;
            }
        }
        table
    })
}

impl fmt::Display for HumanRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown humanoid role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for HumanRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.name() == s)
            .ok_or_else(|| UnknownRole(s.to_owned()))
    }
}
