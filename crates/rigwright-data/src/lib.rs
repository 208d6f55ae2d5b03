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

//! # Rigwright Data
//!
//! The data a rig edit operates on: the scene graph arena, the components
//! placed relative to bones, skinned meshes, the role mapping and the rig
//! descriptor asset, plus in-memory asset storage.

pub mod assets;
pub mod components;
pub mod descriptor;
pub mod mesh;
pub mod scene;
pub mod skeleton;

pub use descriptor::RigDescriptor;
pub use mesh::Mesh;
pub use scene::{NodeId, SceneGraph, Transform};
pub use skeleton::SkeletonMap;
