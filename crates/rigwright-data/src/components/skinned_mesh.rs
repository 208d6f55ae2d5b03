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

use rigwright_core::asset::AssetUUID;
use serde::{Deserialize, Serialize};

use crate::scene::NodeId;

/// Draws a [`Mesh`](crate::mesh::Mesh) deformed by a list of bone nodes.
///
/// `bones[i]` drives the vertices bound with `mesh.bind_poses[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkinnedMeshRenderer {
    /// The mesh asset being drawn.
    pub mesh: Option<AssetUUID>,
    /// Bone nodes, indexed like the mesh's bind poses.
    pub bones: Vec<Option<NodeId>>,
}
