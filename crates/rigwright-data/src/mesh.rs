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

//! Mesh asset data relevant to skinning.

use rigwright_core::{
    asset::Asset,
    math::{Mat4, Vec3},
};
use serde::{Deserialize, Serialize};

/// A skinned mesh asset.
///
/// Only the data a rig edit touches is modeled: the rest positions and the
/// per-bone bind poses. `bind_poses[i]` maps mesh space into the local space
/// of the renderer's `i`-th bone at bind time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Asset name.
    pub name: String,
    /// Rest vertex positions in mesh space.
    #[serde(default)]
    pub positions: Vec<Vec3>,
    /// Inverse bind matrices, one per renderer bone slot.
    #[serde(default)]
    pub bind_poses: Vec<Mat4>,
}

impl Asset for Mesh {}
