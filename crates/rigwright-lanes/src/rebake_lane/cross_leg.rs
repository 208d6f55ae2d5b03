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

use rigwright_core::{
    math::{Quaternion, Vec3, DEG_TO_RAD, FRAC_PI_2},
    HumanRole,
};
use rigwright_data::{SceneGraph, SkeletonMap};

const LEGS: [(HumanRole, HumanRole, HumanRole); 2] = [
    (HumanRole::LeftUpperLeg, HumanRole::LeftLowerLeg, HumanRole::LeftFoot),
    (HumanRole::RightUpperLeg, HumanRole::RightLowerLeg, HumanRole::RightFoot),
];

/// Slightly past a right angle, so the knee ends up bending forward.
const KNEE_BIAS_DEGREES: f32 = 90.05;

/// Rotates thighs whose knee does not sit straight below and slightly
/// behind the thigh's local frame, keeping the knee and foot orientations.
///
/// Anchored geometry is not cached around this edit and no delta is
/// recorded.
pub fn fix_cross_legs(scene: &mut SceneGraph, skeleton: &SkeletonMap, tolerance: f32) {
    for (thigh_role, knee_role, foot_role) in LEGS {
        let (Some(thigh), Some(knee), Some(foot)) = (
            skeleton.get(thigh_role),
            skeleton.get(knee_role),
            skeleton.get(foot_role),
        ) else {
            log::trace!("RebakeLane: {thigh_role} chain incomplete, skipping cross-leg check");
            continue;
        };
        if ![thigh, knee, foot].iter().all(|&n| scene.contains(n)) {
            continue;
        }

        let Some(d) = scene
            .inverse_transform_point(thigh, scene.world_position(knee))
            .try_normalize()
        else {
            continue;
        };
        if d.x.abs() < tolerance && d.z < 0.0 {
            continue;
        }

        let counter = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2 - d.y.atan2(d.x))
            * Quaternion::from_axis_angle(Vec3::X, d.y.atan2(d.z) - KNEE_BIAS_DEGREES * DEG_TO_RAD);
        let foot_rotation = scene.world_rotation(foot);

        let mut local = scene.local(thigh);
        local.rotation = (local.rotation * counter).normalize();
        scene.set_local(thigh, local);

        let mut local = scene.local(knee);
        local.rotation = (counter.inverse() * local.rotation).normalize();
        scene.set_local(knee, local);

        scene.set_world_rotation(foot, foot_rotation);
        log::debug!("RebakeLane: uncrossed {thigh_role} ('{}')", scene.name(thigh));
    }
}
