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

//! The optional TOML file steering a rebake.
//!
//! ```toml
//! [rebake]
//! fix_cross_legs = false
//! twist_keywords = ["twist", "roll"]
//!
//! [skeleton]
//! hips = "mixamorig:Hips"
//! spine = "mixamorig:Spine"
//! ```

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use rigwright_core::HumanRole;
use rigwright_data::{NodeId, SceneGraph, SkeletonMap};
use rigwright_lanes::RebakeSettings;
use serde::Deserialize;

/// Contents of a rebake configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RebakeConfig {
    /// Settings handed to the rebaker.
    pub rebake: RebakeSettings,
    /// Explicit role to bone-name assignment. Guessed when empty.
    pub skeleton: BTreeMap<HumanRole, String>,
}

impl RebakeConfig {
    /// Resolves the configured bone names under `root`.
    pub fn skeleton_map(&self, scene: &SceneGraph, root: NodeId) -> Result<Option<SkeletonMap>> {
        if self.skeleton.is_empty() {
            return Ok(None);
        }
        let mut map = SkeletonMap::new();
        for (&role, name) in &self.skeleton {
            let Some(node) = scene.find_by_name(root, name) else {
                bail!("bone '{name}' configured for {role} is not under '{}'", scene.name(root));
            };
            map.set(role, node);
        }
        Ok(Some(map))
    }
}

/// Loads the configuration at `path`, or the defaults when no path is given.
pub fn load(path: Option<&Path>) -> Result<RebakeConfig> {
    let Some(path) = path else {
        log::info!("No configuration given, using default rebake settings");
        return Ok(RebakeConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file at '{}'", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("Failed to parse TOML from '{}'", path.display()))
}

/// Picks the rig root: the first node called `name`, or the first top-level
/// node when no name is given.
pub fn resolve_root(scene: &SceneGraph, name: Option<&str>) -> Result<NodeId> {
    let found = match name {
        Some(name) => scene.nodes().find(|(_, node)| node.name == name),
        None => scene.nodes().find(|(_, node)| node.parent().is_none()),
    };
    match (found, name) {
        (Some((id, _)), _) => Ok(id),
        (None, Some(name)) => bail!("no node named '{name}' in the scene"),
        (None, None) => bail!("the scene is empty"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigwright_data::Transform;
    use rigwright_lanes::rebake_lane::FixPoseMode;
    use std::io::Write;

    #[test]
    fn test_load_reads_settings_and_skeleton() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[rebake]
fix_cross_legs = false
fix_pose = "armature_root"
twist_keywords = ["roll"]

[rebake.limits.overrides.spine]
min = {{ x = -10.0, y = -10.0, z = -10.0 }}
max = {{ x = 10.0, y = 10.0, z = 10.0 }}
center = {{ x = 0.0, y = 0.0, z = 0.0 }}

[skeleton]
hips = "pelvis"
"#
        )
        .unwrap();

        let config = load(Some(file.path())).unwrap();
        assert!(!config.rebake.fix_cross_legs);
        assert!(config.rebake.normalize_bones);
        assert_eq!(config.rebake.fix_pose, FixPoseMode::ArmatureRoot);
        assert!(config.rebake.is_twist_name("UpperArm_Roll"));
        assert_eq!(config.rebake.limits.overrides[&HumanRole::Spine].max.x, 10.0);
        assert_eq!(config.skeleton[&HumanRole::Hips], "pelvis");
    }

    #[test]
    fn test_missing_file_and_bad_toml_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(Some(&dir.path().join("absent.toml"))).is_err());

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "[rebake\nfix_cross_legs = ").unwrap();
        let error = load(Some(&bad)).unwrap_err();
        assert!(error.to_string().contains("Failed to parse TOML"));
        assert!(load(None).unwrap().skeleton.is_empty());
    }

    #[test]
    fn test_roots_and_bones_resolve_by_name() {
        let mut scene = SceneGraph::new();
        let hero = scene.add_root("Hero", Transform::identity());
        let pelvis = scene.add_child(hero, "pelvis", Transform::identity());
        let other = scene.add_root("Villain", Transform::identity());

        assert_eq!(resolve_root(&scene, None).unwrap(), hero);
        assert_eq!(resolve_root(&scene, Some("Villain")).unwrap(), other);
        assert!(resolve_root(&scene, Some("Nobody")).is_err());

        let mut config = RebakeConfig::default();
        assert!(config.skeleton_map(&scene, hero).unwrap().is_none());
        config.skeleton.insert(HumanRole::Hips, "pelvis".into());
        let map = config.skeleton_map(&scene, hero).unwrap().unwrap();
        assert_eq!(map.get(HumanRole::Hips), Some(pelvis));
        assert!(config.skeleton_map(&scene, other).is_err());
    }
}
