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

//! Role assignment for rigs that arrive without one.

use std::collections::HashSet;

use rigwright_core::{HumanRole, Side};
use rigwright_data::{NodeId, RigDescriptor, SceneGraph, SkeletonMap};

/// Produces a role assignment for the rig under `root`.
pub trait BoneGuesser {
    /// Guesses the mapping, using `existing` when the rig already carries a
    /// descriptor. `None` when no usable mapping (at least the hips) is found.
    fn guess(
        &self,
        scene: &SceneGraph,
        root: NodeId,
        existing: Option<&RigDescriptor>,
    ) -> Option<SkeletonMap>;
}

/// Guesses roles from node names.
#[derive(Debug, Default, Clone, Copy)]
pub struct NameBoneGuesser;

impl BoneGuesser for NameBoneGuesser {
    fn guess(
        &self,
        scene: &SceneGraph,
        root: NodeId,
        existing: Option<&RigDescriptor>,
    ) -> Option<SkeletonMap> {
        let map = match existing {
            Some(descriptor) => from_descriptor(scene, root, descriptor),
            None => from_names(scene, root),
        };
        map.contains(HumanRole::Hips).then_some(map)
    }
}

fn from_descriptor(scene: &SceneGraph, root: NodeId, descriptor: &RigDescriptor) -> SkeletonMap {
    descriptor
        .human
        .iter()
        .filter_map(|bone| {
            scene
                .find_by_name(root, &bone.bone_name)
                .map(|node| (bone.role, node))
        })
        .collect()
}

fn from_names(scene: &SceneGraph, root: NodeId) -> SkeletonMap {
    let candidates: Vec<(NodeId, ParsedName)> = scene
        .subtree(root)
        .into_iter()
        .filter(|&node| node != root)
        .map(|node| (node, ParsedName::parse(scene.name(node))))
        .collect();

    let mut taken = HashSet::new();
    let mut map = SkeletonMap::new();
    for role in HumanRole::ALL {
        let found = candidates.iter().find(|(node, parsed)| {
            !taken.contains(node) && parsed.side == role.side() && matches(role, &parsed.body)
        });
        if let Some(&(node, _)) = found {
            taken.insert(node);
            map.set(role, node);
        }
    }
    map
}

/// A node name split into a body side and the remaining lowercase text.
#[derive(Debug, PartialEq)]
struct ParsedName {
    side: Option<Side>,
    body: String,
}

impl ParsedName {
    fn parse(name: &str) -> Self {
        // Drop exporter namespaces such as "mixamorig:".
        let name = name.rsplit(':').next().unwrap_or(name);
        let lower = name.to_lowercase();
        let tokens: Vec<&str> = lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();

        let mut side = None;
        let mut body = String::new();
        for token in tokens {
            let (token_side, rest) = split_side(token);
            if side.is_none() {
                side = token_side;
            }
            body.push_str(rest);
        }
        Self { side, body }
    }
}

/// Strips a side marker from a single token.
fn split_side(token: &str) -> (Option<Side>, &str) {
    const MARKERS: [(&str, &str, Side); 2] = [("left", "l", Side::Left), ("right", "r", Side::Right)];
    for (word, letter, side) in MARKERS {
        if token == word || token == letter {
            return (Some(side), "");
        }
        if let Some(rest) = token.strip_prefix(word) {
            return (Some(side), rest);
        }
        if let Some(rest) = token.strip_suffix(word) {
            return (Some(side), rest);
        }
    }
    (None, token)
}

fn matches(role: HumanRole, body: &str) -> bool {
    use HumanRole::*;
    let has = |needle: &str| body.contains(needle);
    match role {
        Hips => has("hips") || has("pelvis"),
        LeftUpperLeg | RightUpperLeg => has("upperleg") || has("upleg") || has("thigh"),
        LeftLowerLeg | RightLowerLeg => {
            has("lowerleg") || has("calf") || has("shin") || has("knee") || body == "leg"
        }
        LeftFoot | RightFoot => has("foot") || has("ankle"),
        LeftToes | RightToes => has("toe"),
        Spine => matches!(body, "spine" | "spine0" | "abdomen"),
        Chest => (has("chest") && !has("upperchest")) || matches!(body, "spine1" | "spine01"),
        UpperChest => has("upperchest") || matches!(body, "spine2" | "spine02"),
        Neck => has("neck"),
        Head => body == "head",
        LeftEye | RightEye => has("eye"),
        Jaw => has("jaw"),
        LeftShoulder | RightShoulder => has("shoulder") || has("clavicle"),
        LeftUpperArm | RightUpperArm => has("upperarm") || has("uparm") || body == "arm",
        LeftLowerArm | RightLowerArm => has("lowerarm") || has("forearm") || has("elbow"),
        LeftHand | RightHand => matches!(body, "hand" | "wrist"),
        _ => finger_matches(role, body),
    }
}

fn finger_matches(role: HumanRole, body: &str) -> bool {
    let role_name = role.name();
    let fingers: [(&str, &[&str]); 5] = [
        ("thumb", &["thumb"]),
        ("index", &["index"]),
        ("middle", &["middle"]),
        ("ring", &["ring"]),
        ("little", &["little", "pinky"]),
    ];
    let segments: [(&str, &[&str]); 3] = [
        ("proximal", &["proximal", "1"]),
        ("intermediate", &["intermediate", "2"]),
        ("distal", &["distal", "3"]),
    ];

    let Some((_, finger_words)) = fingers.iter().find(|(key, _)| role_name.contains(key)) else {
        return false;
    };
    let Some((_, segment_words)) = segments.iter().find(|(key, _)| role_name.ends_with(key)) else {
        return false;
    };
    let body = body.strip_prefix("hand").unwrap_or(body);
    finger_words.iter().any(|finger| {
        body.strip_prefix(finger)
            .map(|rest| rest.trim_start_matches("finger"))
            .is_some_and(|rest| segment_words.iter().any(|segment| rest == *segment || rest == format!("0{segment}")))
    })
}
