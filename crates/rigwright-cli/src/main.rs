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

// Rigwright command line
// Rebakes the humanoid rig of a RON scene file and writes the result back.

mod config;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use rigwright_data::scene::SceneDocument;
use rigwright_lanes::{RebakeRequest, Rebaker};

/// Normalizes a humanoid rig and regenerates its bind poses and descriptor.
#[derive(Debug, Parser)]
#[command(name = "rigwright", version, about)]
struct Cli {
    /// Scene file to rebake (RON).
    input: PathBuf,

    /// Where to write the rebaked scene. Defaults to overwriting the input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML file with rebake settings and an optional skeleton mapping.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Name of the rig's root node. Defaults to the first top-level node.
    #[arg(short, long)]
    root: Option<String>,

    /// Fail when no rig descriptor could be captured.
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    run(&Cli::parse())
}

fn read_scene(path: &Path) -> Result<SceneDocument> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene file at '{}'", path.display()))?;
    SceneDocument::from_ron(&text)
        .with_context(|| format!("Failed to load scene from '{}'", path.display()))
}

fn run(cli: &Cli) -> Result<()> {
    let config = config::load(cli.config.as_deref())?;
    let (mut scene, mut library) = read_scene(&cli.input)?.into_parts();
    let root = config::resolve_root(&scene, cli.root.as_deref())?;
    let skeleton = config.skeleton_map(&scene, root)?;

    let captured = Rebaker::new().process(
        &mut scene,
        &mut library,
        RebakeRequest {
            root,
            skeleton,
            settings: config.rebake,
            animation: None,
        },
    )?;
    if !captured && cli.strict {
        bail!("no rig descriptor could be captured for '{}'", scene.name(root));
    }

    let output = cli.output.as_deref().unwrap_or(&cli.input);
    let text = SceneDocument::from_parts(scene, &library).to_ron()?;
    fs::write(output, text)
        .with_context(|| format!("Failed to write scene to '{}'", output.display()))?;
    log::info!("Wrote rebaked scene to '{}'", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigwright_core::math::{Quaternion, Vec3};
    use rigwright_data::{assets::AssetLibrary, SceneGraph, Transform};

    fn write_scene(dir: &Path) -> PathBuf {
        let mut scene = SceneGraph::new();
        let root = scene.add_root("Hero", Transform::identity());
        let hips = scene.add_child(root, "Hips", Transform::from_translation(Vec3::Y));
        scene.add_child(
            hips,
            "Spine",
            Transform::from_translation_rotation(
                Vec3::new(0.0, 0.1, 0.0),
                Quaternion::from_axis_angle(Vec3::X, 0.3),
            ),
        );
        let path = dir.join("hero.ron");
        let text = SceneDocument::from_parts(scene, &AssetLibrary::new())
            .to_ron()
            .unwrap();
        fs::write(&path, text).unwrap();
        path
    }

    fn cli(input: PathBuf, output: PathBuf, strict: bool) -> Cli {
        Cli {
            input,
            output: Some(output),
            config: None,
            root: None,
            strict,
        }
    }

    #[test]
    fn test_run_writes_normalized_scene() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_scene(dir.path());
        let output = dir.path().join("out.ron");

        run(&cli(input, output.clone(), false)).unwrap();

        let (scene, _) = read_scene(&output).unwrap().into_parts();
        let spine = scene.nodes().find(|(_, n)| n.name == "Spine").unwrap().0;
        let rotation = scene.world_rotation(spine);
        assert!(rotation.angle_between(Quaternion::IDENTITY) < 1e-4);
    }

    #[test]
    fn test_strict_run_fails_without_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_scene(dir.path());
        let output = dir.path().join("out.ron");

        assert!(run(&cli(input, output.clone(), true)).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_cli_arguments_parse() {
        let cli = Cli::try_parse_from(["rigwright", "hero.ron", "-o", "out.ron", "--strict"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("hero.ron"));
        assert_eq!(cli.output, Some(PathBuf::from("out.ron")));
        assert!(cli.strict);
        assert!(cli.config.is_none());
    }
}
