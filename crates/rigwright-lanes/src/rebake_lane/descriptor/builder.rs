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

use std::collections::HashMap;

use rigwright_core::HumanRole;
use rigwright_data::{
    descriptor::{HumanBone, SkeletonBone},
    NodeId, RigDescriptor, SceneGraph,
};

/// Distance under which a bone counts as sitting on its parent role.
const COINCIDENT_DISTANCE: f32 = 1e-5;

/// Reasons a descriptor cannot be captured from a rig.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DescriptorBuildError {
    /// A role every descriptor needs is not mapped.
    #[error("required role {0} is not mapped")]
    MissingRequiredRole(HumanRole),
    /// A role names a bone absent from the skeleton list.
    #[error("{role} uses bone '{name}', which is not part of the skeleton")]
    MissingSkeletonBone {
        /// The role.
        role: HumanRole,
        /// The bone name it points at.
        name: String,
    },
    /// Two skeleton entries share a name.
    #[error("skeleton bone name '{0}' is not unique")]
    DuplicateSkeletonBone(String),
    /// A role's bone cannot be found under the root by name.
    #[error("{role} uses bone '{name}', which cannot be found under the root")]
    UnresolvedBone {
        /// The role.
        role: HumanRole,
        /// The bone name it points at.
        name: String,
    },
    /// A bone sits at the same position as its nearest mapped ancestor role.
    #[error("{role} sits on top of {ancestor}")]
    CoincidentBones {
        /// The role.
        role: HumanRole,
        /// The ancestor role it coincides with.
        ancestor: HumanRole,
    },
}

/// Everything captured from the rig before building a descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorDraft {
    /// Skeleton bones in hierarchy order.
    pub skeleton: Vec<SkeletonBone>,
    /// Role assignments in canonical order.
    pub human: Vec<HumanBone>,
}

/// Turns a captured draft into a descriptor asset.
pub trait DescriptorBuilder {
    /// Validates `draft` against the rig under `root` and builds the
    /// descriptor. The returned descriptor's name is assigned by the caller.
    fn build(
        &self,
        scene: &SceneGraph,
        root: NodeId,
        draft: &DescriptorDraft,
    ) -> Result<RigDescriptor, DescriptorBuildError>;
}

/// The stock builder.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardDescriptorBuilder;

impl DescriptorBuilder for StandardDescriptorBuilder {
    fn build(
        &self,
        scene: &SceneGraph,
        root: NodeId,
        draft: &DescriptorDraft,
    ) -> Result<RigDescriptor, DescriptorBuildError> {
        if let Some(&role) = HumanRole::REQUIRED
            .iter()
            .find(|&&role| !draft.human.iter().any(|bone| bone.role == role))
        {
            return Err(DescriptorBuildError::MissingRequiredRole(role));
        }

        let mut skeleton_names: HashMap<&str, usize> = HashMap::new();
        for bone in &draft.skeleton {
            let count = skeleton_names.entry(bone.name.as_str()).or_default();
            *count += 1;
            if *count > 1 {
                return Err(DescriptorBuildError::DuplicateSkeletonBone(bone.name.clone()));
            }
        }

        let mut resolved: HashMap<HumanRole, NodeId> = HashMap::new();
        for bone in &draft.human {
            if !skeleton_names.contains_key(bone.bone_name.as_str()) {
                return Err(DescriptorBuildError::MissingSkeletonBone {
                    role: bone.role,
                    name: bone.bone_name.clone(),
                });
            }
            let node = scene.find_by_name(root, &bone.bone_name).ok_or_else(|| {
                DescriptorBuildError::UnresolvedBone {
                    role: bone.role,
                    name: bone.bone_name.clone(),
                }
            })?;
            resolved.insert(bone.role, node);
        }

        for bone in &draft.human {
            let Some((ancestor, ancestor_node)) = bone
                .role
                .ancestors()
                .find_map(|ancestor| resolved.get(&ancestor).map(|&node| (ancestor, node)))
            else {
                continue;
            };
            let node = resolved[&bone.role];
            let distance = scene.world_position(node).distance(scene.world_position(ancestor_node));
            if distance < COINCIDENT_DISTANCE {
                return Err(DescriptorBuildError::CoincidentBones {
                    role: bone.role,
                    ancestor,
                });
            }
        }

        Ok(RigDescriptor {
            name: String::new(),
            skeleton: draft.skeleton.clone(),
            human: draft.human.clone(),
        })
    }
}
