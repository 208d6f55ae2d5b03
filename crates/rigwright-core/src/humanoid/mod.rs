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

//! The fixed humanoid skeleton layout.
//!
//! A humanoid rig is described by which scene node plays each [`HumanRole`].
//! The roles, their anatomical parents and their stock rotation limits are
//! process-wide immutable tables.

mod limits;
mod role;

pub use self::limits::RotationLimit;
pub use self::role::{HumanRole, Side, UnknownRole};
