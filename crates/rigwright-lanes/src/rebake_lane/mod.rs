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

//! Rebake Lane
//!
//! Normalizes a humanoid rig in place and regenerates the data derived from
//! it. A run edits bone transforms, keeps everything placed relative to
//! those bones where it was in world space, rebases skinned mesh bind poses
//! and captures a fresh rig descriptor.

mod affected_index;
mod armature;
mod bind_pose;
mod context;
mod cross_leg;
mod delta;
mod descriptor;
mod error;
mod guesser;
mod normalize;
mod pose_cache;
mod settings;

pub use self::affected_index::{AffectedIndex, AffectedObject, Anchored};
pub use self::armature::{fix_armature_root, fix_sibling_order, AnimationIndex};
pub use self::bind_pose::propagate_bind_poses;
pub use self::context::RigContext;
pub use self::cross_leg::fix_cross_legs;
pub use self::delta::DeltaTracker;
pub use self::descriptor::{
    collect_skeleton_nodes, rebuild_descriptor, sort_in_hierarchy_order, DescriptorBuildError,
    DescriptorBuilder, DescriptorDraft, HierarchyKey, RenameGuard, StandardDescriptorBuilder,
};
pub use self::error::RebakeError;
pub use self::guesser::{BoneGuesser, NameBoneGuesser};
pub use self::normalize::normalize_bones;
pub use self::pose_cache::{PoseCache, PoseCapturable, PoseSnapshot, PoseSpace};
pub use self::settings::{FixPoseMode, LimitSettings, LimitSource, RebakeSettings};

use rigwright_core::HumanRole;
use rigwright_data::{assets::AssetSink, NodeId, SceneGraph, SkeletonMap};

/// One rebake job.
pub struct RebakeRequest<'a> {
    /// The rig's top node.
    pub root: NodeId,
    /// Role assignment. Guessed from the rig when `None`.
    pub skeleton: Option<SkeletonMap>,
    /// Which passes run and how.
    pub settings: RebakeSettings,
    /// Notified of local translation changes made by the armature fix.
    pub animation: Option<&'a mut dyn AnimationIndex>,
}

impl RebakeRequest<'_> {
    /// A request with default settings and a guessed skeleton.
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            skeleton: None,
            settings: RebakeSettings::default(),
            animation: None,
        }
    }
}

/// Runs rebakes with a pluggable bone guesser and descriptor builder.
pub struct Rebaker {
    guesser: Box<dyn BoneGuesser>,
    builder: Box<dyn DescriptorBuilder>,
}

impl Default for Rebaker {
    fn default() -> Self {
        Self::new()
    }
}

impl Rebaker {
    /// A rebaker using [`NameBoneGuesser`] and [`StandardDescriptorBuilder`].
    pub fn new() -> Self {
        Self {
            guesser: Box::new(NameBoneGuesser),
            builder: Box::new(StandardDescriptorBuilder),
        }
    }

    /// Replaces the bone guesser.
    pub fn with_guesser(mut self, guesser: impl BoneGuesser + 'static) -> Self {
        self.guesser = Box::new(guesser);
        self
    }

    /// Replaces the descriptor builder.
    pub fn with_builder(mut self, builder: impl DescriptorBuilder + 'static) -> Self {
        self.builder = Box::new(builder);
        self
    }

    /// Rebakes the rig under `request.root`.
    ///
    /// Configuration errors are returned before the scene is touched. Once
    /// editing starts the run always completes; `Ok(false)` means the bone
    /// edits and bind poses were applied but no descriptor could be
    /// captured.
    pub fn process(
        &self,
        scene: &mut SceneGraph,
        sink: &mut dyn AssetSink,
        request: RebakeRequest<'_>,
    ) -> Result<bool, RebakeError> {
        let RebakeRequest {
            root,
            skeleton,
            settings,
            animation,
        } = request;

        // 1. Resolve the skeleton. Nothing is edited before this succeeds.
        if !scene.contains(root) {
            return Err(RebakeError::RootNotFound(root));
        }
        let skeleton = match skeleton {
            Some(skeleton) => skeleton,
            None => {
                let existing = scene
                    .node(root)
                    .and_then(|node| node.rig_descriptor)
                    .and_then(|uuid| sink.descriptor(&uuid));
                self.guesser
                    .guess(scene, root, existing.as_deref())
                    .ok_or_else(|| RebakeError::NoSkeleton {
                        root: scene.name(root).to_owned(),
                    })?
            }
        };
        if !skeleton
            .get(HumanRole::Hips)
            .is_some_and(|hips| scene.contains(hips))
        {
            return Err(RebakeError::MissingHips);
        }
        log::info!(
            "RebakeLane: rebaking '{}' with {} mapped roles",
            scene.name(root),
            skeleton.len()
        );

        // 2. Edit bones, keeping dependents in place.
        let index = AffectedIndex::scan(scene, root);
        let mut deltas = DeltaTracker::new();
        {
            let mut ctx = RigContext {
                scene: &mut *scene,
                root,
                skeleton: &skeleton,
                index: &index,
                deltas: &mut deltas,
            };
            if settings.fix_pose.fixes_armature_root() {
                fix_armature_root(&mut ctx, animation);
            }
            if settings.normalize_bones {
                normalize_bones(&mut ctx, &settings);
            }
        }
        if settings.fix_cross_legs {
            fix_cross_legs(scene, &skeleton, settings.cross_leg_tolerance);
        }
        if settings.fix_pose.fixes_sibling_order() {
            fix_sibling_order(scene, &skeleton);
        }

        // 3. Regenerate derived data.
        let rebased = propagate_bind_poses(scene, root, &deltas, sink);
        let captured = rebuild_descriptor(
            scene,
            root,
            &skeleton,
            &settings.limits,
            self.builder.as_ref(),
            sink,
        );
        log::info!(
            "RebakeLane: '{}' done, {} bones edited, {} meshes rebased, descriptor {}",
            scene.name(root),
            deltas.len(),
            rebased,
            if captured { "captured" } else { "kept" }
        );
        Ok(captured)
    }
}
