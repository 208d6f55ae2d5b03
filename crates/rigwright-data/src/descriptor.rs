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

//! The rig descriptor asset consumed by retargeting.

use rigwright_core::{
    asset::Asset,
    humanoid::{HumanRole, RotationLimit},
    math::{Quaternion, Vec3},
};
use serde::{Deserialize, Serialize};

/// One entry of the descriptor's ordered skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonBone {
    /// Node name, unique within the descriptor.
    pub name: String,
    /// Local translation at capture time.
    pub position: Vec3,
    /// Local rotation at capture time.
    pub rotation: Quaternion,
    /// Local scale at capture time.
    pub scale: Vec3,
}

/// A role assignment with its rotation limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanBone {
    /// The role.
    pub role: HumanRole,
    /// Name of the skeleton bone playing the role.
    pub bone_name: String,
    /// Range of motion of the role.
    pub limit: RotationLimit,
}

/// A named skeleton plus role table, captured once from a normalized rig.
///
/// Descriptors are rebuilt from scratch on every rebake and never edited
/// after registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RigDescriptor {
    /// Asset name.
    pub name: String,
    /// Skeleton bones in hierarchy order, parents before children.
    pub skeleton: Vec<SkeletonBone>,
    /// Role assignments in canonical role order.
    pub human: Vec<HumanBone>,
}

impl RigDescriptor {
    /// The role entry for `role`.
    pub fn human_bone(&self, role: HumanRole) -> Option<&HumanBone> {
        self.human.iter().find(|bone| bone.role == role)
    }

    /// The name of the bone playing `role`.
    pub fn bone_name(&self, role: HumanRole) -> Option<&str> {
        self.human_bone(role).map(|bone| bone.bone_name.as_str())
    }

    /// The rotation limit recorded for `role`.
    pub fn limit(&self, role: HumanRole) -> Option<RotationLimit> {
        self.human_bone(role).map(|bone| bone.limit)
    }

    /// The skeleton entry named `name`.
    pub fn skeleton_bone(&self, name: &str) -> Option<&SkeletonBone> {
        self.skeleton.iter().find(|bone| bone.name == name)
    }
}

impl Asset for RigDescriptor {}
