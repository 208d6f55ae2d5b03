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

use rigwright_data::{NodeId, SceneGraph, SkeletonMap};

use super::{affected_index::AffectedIndex, delta::DeltaTracker};

/// The state shared by the bone-editing passes of one rebake.
pub struct RigContext<'a> {
    /// The graph being edited.
    pub scene: &'a mut SceneGraph,
    /// The rig's top node.
    pub root: NodeId,
    /// The role assignment.
    pub skeleton: &'a SkeletonMap,
    /// Objects placed relative to bones, scanned before any edit.
    pub index: &'a AffectedIndex,
    /// Frame changes recorded so far.
    pub deltas: &'a mut DeltaTracker,
}
