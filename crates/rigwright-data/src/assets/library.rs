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

use rigwright_core::asset::{AssetHandle, AssetUUID};

use super::Assets;
use crate::{descriptor::RigDescriptor, mesh::Mesh};

/// Lookup and registration of the assets a rebake reads and produces.
///
/// Registration never mutates an existing asset: callers hand over a fresh
/// value and receive the handle of the newly registered copy.
pub trait AssetSink {
    /// The mesh registered under `uuid`.
    fn mesh(&self, uuid: &AssetUUID) -> Option<AssetHandle<Mesh>>;

    /// Registers `mesh` under `uuid`, replacing any previous registration.
    fn register_mesh(&mut self, uuid: AssetUUID, mesh: Mesh) -> AssetHandle<Mesh>;

    /// The descriptor registered under `uuid`.
    fn descriptor(&self, uuid: &AssetUUID) -> Option<AssetHandle<RigDescriptor>>;

    /// Registers `descriptor` under `uuid`, replacing any previous registration.
    fn register_descriptor(
        &mut self,
        uuid: AssetUUID,
        descriptor: RigDescriptor,
    ) -> AssetHandle<RigDescriptor>;
}

/// The in-memory [`AssetSink`] used by the command line and by tests.
#[derive(Default, Clone)]
pub struct AssetLibrary {
    /// Registered meshes.
    pub meshes: Assets<Mesh>,
    /// Registered rig descriptors.
    pub descriptors: Assets<RigDescriptor>,
}

impl AssetLibrary {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssetSink for AssetLibrary {
    fn mesh(&self, uuid: &AssetUUID) -> Option<AssetHandle<Mesh>> {
        self.meshes.get(uuid).cloned()
    }

    fn register_mesh(&mut self, uuid: AssetUUID, mesh: Mesh) -> AssetHandle<Mesh> {
        log::debug!("Registering mesh '{}' as {}", mesh.name, uuid);
        let handle = AssetHandle::new(mesh);
        self.meshes.insert(uuid, handle.clone());
        handle
    }

    fn descriptor(&self, uuid: &AssetUUID) -> Option<AssetHandle<RigDescriptor>> {
        self.descriptors.get(uuid).cloned()
    }

    fn register_descriptor(
        &mut self,
        uuid: AssetUUID,
        descriptor: RigDescriptor,
    ) -> AssetHandle<RigDescriptor> {
        log::debug!("Registering rig descriptor '{}' as {}", descriptor.name, uuid);
        let handle = AssetHandle::new(descriptor);
        self.descriptors.insert(uuid, handle.clone());
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_replaces_without_touching_old_handles() {
        let mut library = AssetLibrary::new();
        let uuid = AssetUUID::from_name("body");
        let first = library.register_mesh(
            uuid,
            Mesh {
                name: "body".into(),
                ..Default::default()
            },
        );
        library.register_mesh(
            uuid,
            Mesh {
                name: "body (rebaked)".into(),
                ..Default::default()
            },
        );

        assert_eq!(library.meshes.len(), 1);
        assert_eq!(first.name, "body");
        assert_eq!(
            library.mesh(&uuid).map(|m| m.name.clone()),
            Some("body (rebaked)".to_string())
        );
        assert!(library.descriptor(&uuid).is_none());
    }
}
