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

//! A generic, type-safe storage for registered asset handles.

use rigwright_core::asset::{Asset, AssetHandle, AssetUUID};
use std::collections::BTreeMap;

/// An in-memory table of registered assets of type `A`.
///
/// Keyed by `AssetUUID` and iterated in identifier order, so anything
/// written out from it is reproducible run to run.
pub struct Assets<A: Asset> {
    storage: BTreeMap<AssetUUID, AssetHandle<A>>,
}

impl<A: Asset> Default for Assets<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Asset> Clone for Assets<A> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
        }
    }
}

impl<A: Asset> Assets<A> {
    /// Creates a new, empty asset storage.
    pub fn new() -> Self {
        Self {
            storage: BTreeMap::new(),
        }
    }

    /// Inserts an asset handle, replacing any asset stored under the same UUID.
    pub fn insert(&mut self, uuid: AssetUUID, handle: AssetHandle<A>) {
        self.storage.insert(uuid, handle);
    }

    /// Retrieves the handle stored under `uuid`.
    pub fn get(&self, uuid: &AssetUUID) -> Option<&AssetHandle<A>> {
        self.storage.get(uuid)
    }

    /// Checks if an asset with the specified UUID exists in the storage.
    pub fn contains(&self, uuid: &AssetUUID) -> bool {
        self.storage.contains_key(uuid)
    }

    /// Number of stored assets.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Whether the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Iterates the stored assets in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&AssetUUID, &AssetHandle<A>)> {
        self.storage.iter()
    }
}
