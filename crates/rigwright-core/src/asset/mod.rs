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

//! Provides the primitive types shared by every crate that stores or
//! references derived assets (rig descriptors, cloned meshes).
//!
//! The module has no knowledge of how assets are stored. Storage lives in
//! `rigwright-data`; this module only defines what an asset is and how it is
//! identified.

mod handle;
mod uuid;

pub use self::handle::*;
pub use self::uuid::*;

/// A marker trait for types that can be managed by the asset system.
///
/// The supertraits keep assets shareable across threads and free of borrowed
/// data, so a registered asset can outlive the edit that produced it.
///
/// # Examples
///
/// ```
/// use rigwright_core::asset::Asset;
///
/// struct Curve {
///     keys: Vec<f32>,
/// }
///
/// impl Asset for Curve {}
/// ```
pub trait Asset: Send + Sync + 'static {}
