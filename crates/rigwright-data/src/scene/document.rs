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

//! A stable, human-readable file representation of a scene and its assets.

use rigwright_core::asset::{AssetHandle, AssetUUID};
use serde::{Deserialize, Serialize};

use super::{SceneError, SceneGraph};
use crate::{assets::AssetLibrary, descriptor::RigDescriptor, mesh::Mesh};

/// A scene graph together with the assets its components reference.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SceneDocument {
    /// The node hierarchy.
    pub scene: SceneGraph,
    /// Meshes referenced by skinned renderers.
    #[serde(default)]
    pub meshes: Vec<(AssetUUID, Mesh)>,
    /// Rig descriptors bound to rig roots.
    #[serde(default)]
    pub descriptors: Vec<(AssetUUID, RigDescriptor)>,
}

impl SceneDocument {
    /// Parses a document from RON text and checks the graph's structure.
    pub fn from_ron(text: &str) -> Result<Self, SceneError> {
        let document: SceneDocument = ron::de::from_str(text)?;
        document.scene.validate()?;
        Ok(document)
    }

    /// Writes the document as indented RON.
    pub fn to_ron(&self) -> Result<String, SceneError> {
        let pretty_config = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty_config)?)
    }

    /// Splits the document into a live graph and an asset library.
    pub fn into_parts(self) -> (SceneGraph, AssetLibrary) {
        let mut library = AssetLibrary::new();
        for (uuid, mesh) in self.meshes {
            library.meshes.insert(uuid, AssetHandle::new(mesh));
        }
        for (uuid, descriptor) in self.descriptors {
            library.descriptors.insert(uuid, AssetHandle::new(descriptor));
        }
        (self.scene, library)
    }

    /// Builds a document from a graph and the assets of a library.
    pub fn from_parts(scene: SceneGraph, library: &AssetLibrary) -> Self {
        Self {
            scene,
            meshes: library
                .meshes
                .iter()
                .map(|(uuid, mesh)| (*uuid, mesh.to_owned_asset()))
                .collect(),
            descriptors: library
                .descriptors
                .iter()
                .map(|(uuid, descriptor)| (*uuid, descriptor.to_owned_asset()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assets::AssetSink,
        components::{ShapeCollider, SkinnedMeshRenderer},
        scene::Transform,
    };
    use rigwright_core::math::{Mat4, Vec3};

    #[test]
    fn test_document_survives_a_text_round_trip() {
        let mut scene = SceneGraph::new();
        let root = scene.add_root("Hero", Transform::identity());
        let hips = scene.add_child(root, "Hips", Transform::from_translation(Vec3::Y));
        scene.add_component(hips, ShapeCollider::new_sphere(Vec3::ZERO, 0.1));

        let mesh_id = AssetUUID::from_name("body");
        scene.add_component(
            root,
            SkinnedMeshRenderer {
                mesh: Some(mesh_id),
                bones: vec![Some(hips)],
            },
        );
        let mut library = AssetLibrary::new();
        library.register_mesh(
            mesh_id,
            Mesh {
                name: "body".into(),
                positions: vec![Vec3::ZERO],
                bind_poses: vec![Mat4::IDENTITY],
            },
        );

        let text = SceneDocument::from_parts(scene, &library).to_ron().unwrap();
        let (scene, library) = SceneDocument::from_ron(&text).unwrap().into_parts();

        assert_eq!(scene.len(), 2);
        assert_eq!(scene.name(hips), "Hips");
        assert_eq!(scene.components_of(root).len(), 1);
        assert_eq!(
            library.mesh(&mesh_id).map(|m| m.bind_poses.len()),
            Some(1)
        );
    }

    #[test]
    fn test_malformed_text_is_rejected() {
        assert!(matches!(
            SceneDocument::from_ron("(scene: oops"),
            Err(SceneError::Parse(_))
        ));
    }
}
