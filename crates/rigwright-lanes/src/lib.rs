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

//! # Rigwright Lanes
//!
//! The processing pipelines of Rigwright. The rebake lane turns an imported
//! humanoid rig into a normalized one: canonical bone orientations, a
//! collapsed armature root, untangled legs, rebased bind poses and a
//! freshly captured rig descriptor.

#![warn(missing_docs)]

pub mod rebake_lane;

pub use rebake_lane::{RebakeError, RebakeRequest, RebakeSettings, Rebaker};
