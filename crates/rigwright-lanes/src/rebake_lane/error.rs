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

use rigwright_data::NodeId;

/// Configuration errors that stop a rebake before anything is edited.
#[derive(Debug, thiserror::Error)]
pub enum RebakeError {
    /// The requested root is not part of the scene.
    #[error("rig root {0} is not part of the scene")]
    RootNotFound(NodeId),
    /// No skeleton mapping was supplied and none could be guessed.
    #[error("no humanoid skeleton could be resolved under '{root}'")]
    NoSkeleton {
        /// Name of the rig root.
        root: String,
    },
    /// The supplied skeleton mapping has no hips.
    #[error("the skeleton mapping has no hips bone")]
    MissingHips,
}
