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

//! User-facing switches of a rebake.

use std::collections::BTreeMap;

use rigwright_core::humanoid::{HumanRole, RotationLimit};
use rigwright_data::RigDescriptor;
use serde::{Deserialize, Serialize};

/// Which structural pose fixes run before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixPoseMode {
    /// Leave wrapper nodes and sibling order alone.
    Off,
    /// Collapse wrapper nodes between the root and the hips.
    ArmatureRoot,
    /// Collapse wrapper nodes and move every bone first among its siblings.
    #[default]
    ArmatureRootAndSiblings,
}

impl FixPoseMode {
    /// Whether wrapper nodes above the hips are collapsed.
    pub fn fixes_armature_root(self) -> bool {
        !matches!(self, FixPoseMode::Off)
    }

    /// Whether bones are reordered among their siblings.
    pub fn fixes_sibling_order(self) -> bool {
        matches!(self, FixPoseMode::ArmatureRootAndSiblings)
    }
}

/// Where a role's rotation limit comes from when it has no explicit override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitSource {
    /// Keep the limit of the descriptor currently bound to the root, falling
    /// back to the stock table for roles it does not list.
    #[default]
    Inherit,
    /// Always use the stock table.
    Defaults,
}

/// Per-role rotation limit resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    /// Source of limits without an override.
    pub source: LimitSource,
    /// Explicit per-role limits, winning over every other source.
    pub overrides: BTreeMap<HumanRole, RotationLimit>,
}

impl LimitSettings {
    /// The limit `role` ends up with.
    pub fn resolve(&self, role: HumanRole, existing: Option<&RigDescriptor>) -> RotationLimit {
        if let Some(limit) = self.overrides.get(&role) {
            return *limit;
        }
        match (self.source, existing.and_then(|d| d.limit(role))) {
            (LimitSource::Inherit, Some(limit)) => limit,
            _ => RotationLimit::default_for(role),
        }
    }
}

/// Settings of one rebake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebakeSettings {
    /// Re-orient every mapped bone into its canonical rotation.
    pub normalize_bones: bool,
    /// Counter-rotate legs whose knee does not bend the expected way.
    pub fix_cross_legs: bool,
    /// Structural fixes applied before normalization.
    pub fix_pose: FixPoseMode,
    /// Case-insensitive name fragments identifying twist helper bones.
    pub twist_keywords: Vec<String>,
    /// How far off the thigh's center plane a knee may sit and still count
    /// as bending correctly.
    pub cross_leg_tolerance: f32,
    /// Rotation limit resolution.
    pub limits: LimitSettings,
}

impl Default for RebakeSettings {
    fn default() -> Self {
        Self {
            normalize_bones: true,
            fix_cross_legs: true,
            fix_pose: FixPoseMode::default(),
            twist_keywords: vec!["twist".to_string()],
            cross_leg_tolerance: 0.01,
            limits: LimitSettings::default(),
        }
    }
}

impl RebakeSettings {
    /// Whether `name` looks like a twist helper bone.
    pub fn is_twist_name(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.twist_keywords
            .iter()
            .any(|keyword| !keyword.is_empty() && name.contains(&keyword.to_lowercase()))
    }
}
