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

use approx::assert_abs_diff_eq;
use rigwright_core::{
    asset::AssetUUID,
    math::{Quaternion, Vec3},
    HumanRole,
};
use rigwright_data::{
    assets::{AssetLibrary, AssetSink},
    components::{
        Axis, ColliderShape, ComponentId, ComponentKind, ConstraintSource, ContactVolume, MultiSourceConstraint,
        ShapeCollider, SkinnedMeshRenderer,
    },
    Mesh, NodeId, SceneGraph, SkeletonMap, Transform,
};
use rigwright_lanes::rebake_lane::{
    AffectedObject, AnimationIndex, BoneGuesser, FixPoseMode, NameBoneGuesser, PoseCapturable,
    PoseSpace, RebakeError, RebakeRequest, RebakeSettings, Rebaker,
};

struct Hero {
    scene: SceneGraph,
    library: AssetLibrary,
    root: NodeId,
    armature: NodeId,
    hips: NodeId,
    bones: Vec<NodeId>,
    legs: [NodeId; 3],
    socket: NodeId,
    renderer: ComponentId,
    dependents: Vec<(AffectedObject, Option<usize>)>,
    mesh_id: AssetUUID,
}

/// Adds a node at a world position, with a rotation relative to its parent.
fn add_at(scene: &mut SceneGraph, parent: NodeId, name: &str, world: Vec3, rotation: Quaternion) -> NodeId {
    let translation = scene.inverse_transform_point(parent, world);
    scene.add_child(parent, name, Transform::from_translation_rotation(translation, rotation))
}

fn tilt(angle: f32) -> Quaternion {
    Quaternion::from_axis_angle(Vec3::new(0.2, 0.3, 1.0), angle)
}

/// A small humanoid in T-pose under an offset armature node, with a few
/// objects placed relative to its bones and a skinned body.
fn hero() -> Hero {
    let mut scene = SceneGraph::new();
    let root = scene.add_root("Hero", Transform::identity());
    let armature = scene.add_child(root, "Armature", Transform::from_translation(Vec3::new(0.0, 0.02, 0.0)));
    let id = Quaternion::IDENTITY;

    let hips = add_at(&mut scene, armature, "Hips", Vec3::new(0.0, 1.0, 0.0), id);
    let spine = add_at(&mut scene, hips, "Spine", Vec3::new(0.0, 1.1, 0.0), tilt(0.2));
    let chest = add_at(&mut scene, spine, "Spine1", Vec3::new(0.0, 1.25, 0.01), tilt(-0.1));
    let neck = add_at(&mut scene, chest, "Neck", Vec3::new(0.0, 1.5, 0.0), tilt(0.3));
    let head = add_at(&mut scene, neck, "Head", Vec3::new(0.0, 1.6, 0.02), tilt(0.1));

    let mut bones = vec![hips, spine, chest, neck, head];
    let mut legs = [hips; 3];
    for (sign, prefix) in [(1.0, "Left"), (-1.0, "Right")] {
        let thigh = add_at(&mut scene, hips, &format!("{prefix}UpLeg"), Vec3::new(0.1 * sign, 0.95, 0.0), id);
        let knee = add_at(&mut scene, thigh, &format!("{prefix}Leg"), Vec3::new(0.1 * sign, 0.5, -0.02), id);
        let foot = add_at(&mut scene, knee, &format!("{prefix}Foot"), Vec3::new(0.1 * sign, 0.08, 0.0), id);
        let shoulder = add_at(&mut scene, chest, &format!("{prefix}Shoulder"), Vec3::new(0.05 * sign, 1.45, 0.0), tilt(0.4));
        let arm = add_at(&mut scene, shoulder, &format!("{prefix}Arm"), Vec3::new(0.15 * sign, 1.45, 0.0), tilt(-0.3));
        let twist = add_at(&mut scene, arm, &format!("{prefix}ArmTwist"), Vec3::new(0.28 * sign, 1.45, 0.0), tilt(0.5));
        let forearm = add_at(&mut scene, arm, &format!("{prefix}ForeArm"), Vec3::new(0.42 * sign, 1.45, -0.01), tilt(0.2));
        let hand = add_at(&mut scene, forearm, &format!("{prefix}Hand"), Vec3::new(0.68 * sign, 1.45, 0.0), tilt(-0.2));
        if sign > 0.0 {
            legs = [thigh, knee, foot];
        }
        bones.extend([thigh, knee, foot, shoulder, arm, twist, forearm, hand]);
    }
    let left_forearm = scene.find_by_name(root, "LeftForeArm").unwrap();
    let left_hand = scene.find_by_name(root, "LeftHand").unwrap();
    let socket = add_at(&mut scene, left_hand, "Spine", Vec3::new(0.75, 1.45, 0.0), id);

    let box_collider = scene.add_component(
        chest,
        ShapeCollider::new_box(Vec3::new(0.0, 0.05, 0.1), Vec3::new(0.3, 0.2, 0.2)),
    );
    let capsule = scene.add_component(
        left_forearm,
        ShapeCollider::new_capsule(Vec3::new(0.1, 0.0, 0.0), 0.04, 0.25, Axis::X),
    );
    let prop = scene.add_child(root, "Prop", Transform::identity());
    let constraint = scene.add_component(
        prop,
        MultiSourceConstraint {
            sources: vec![ConstraintSource {
                position_offset: Vec3::new(0.05, 0.0, 0.02),
                rotation_offset: Quaternion::from_axis_angle(Vec3::Y, 0.3),
                ..ConstraintSource::new(left_hand)
            }],
        },
    );
    let contact = scene.add_component(
        head,
        ContactVolume {
            position: Vec3::new(0.0, 0.1, 0.0),
            ..ContactVolume::sphere(0.1)
        },
    );

    let skinned = [hips, spine, chest, head, left_forearm, left_hand];
    let mut library = AssetLibrary::new();
    let mesh_id = AssetUUID::from_name("Hero Body");
    library.register_mesh(
        mesh_id,
        Mesh {
            name: "Hero Body".into(),
            positions: vec![Vec3::new(0.0, 1.2, 0.1), Vec3::new(0.5, 1.45, 0.0)],
            bind_poses: skinned
                .iter()
                .map(|&bone| scene.world_matrix(bone).inverse().unwrap().to_matrix())
                .collect(),
        },
    );
    let body = scene.add_child(root, "Body", Transform::identity());
    let renderer = scene.add_component(
        body,
        SkinnedMeshRenderer {
            mesh: Some(mesh_id),
            bones: skinned.iter().copied().map(Some).collect(),
        },
    );

    Hero {
        scene,
        library,
        root,
        armature,
        hips,
        bones,
        legs,
        socket,
        renderer,
        dependents: vec![
            (AffectedObject::Component(box_collider), None),
            (AffectedObject::Component(capsule), None),
            (AffectedObject::Component(constraint), Some(0)),
            (AffectedObject::Component(contact), None),
        ],
        mesh_id,
    }
}

fn settings_without_cross_legs() -> RebakeSettings {
    RebakeSettings {
        fix_cross_legs: false,
        ..RebakeSettings::default()
    }
}

fn run(hero: &mut Hero, settings: RebakeSettings) -> Result<bool, RebakeError> {
    Rebaker::new().process(
        &mut hero.scene,
        &mut hero.library,
        RebakeRequest {
            settings,
            ..RebakeRequest::new(hero.root)
        },
    )
}

fn renderer_mesh(hero: &Hero) -> AssetUUID {
    match hero.scene.component(hero.renderer).map(|c| &c.kind) {
        Some(ComponentKind::SkinnedMesh(renderer)) => renderer.mesh.unwrap(),
        other => panic!("unexpected component {other:?}"),
    }
}

#[test]
fn test_rebake_keeps_world_placement() {
    let mut hero = hero();
    let positions: Vec<Vec3> = hero.bones.iter().map(|&n| hero.scene.world_position(n)).collect();
    let dependents: Vec<_> = hero
        .dependents
        .iter()
        .map(|(object, slot)| object.extract(&hero.scene, *slot, PoseSpace::World).unwrap())
        .collect();

    assert!(run(&mut hero, settings_without_cross_legs()).unwrap());

    for (&bone, before) in hero.bones.iter().zip(positions) {
        assert_abs_diff_eq!(hero.scene.world_position(bone), before, epsilon = 1e-4);
    }
    for ((object, slot), before) in hero.dependents.iter().zip(dependents) {
        let after = object.extract(&hero.scene, *slot, PoseSpace::World).unwrap();
        assert_abs_diff_eq!(after.position, before.position, epsilon = 1e-4);
        assert_abs_diff_eq!(after.size.unwrap_or_default(), before.size.unwrap_or_default(), epsilon = 1e-4);
    }
    assert_abs_diff_eq!(
        hero.scene.world_position(hero.armature),
        hero.scene.world_position(hero.root),
        epsilon = 1e-5
    );
}

#[test]
fn test_bind_poses_follow_bone_edits() {
    let mut hero = hero();
    let original = hero.library.mesh(&hero.mesh_id).unwrap();

    assert!(run(&mut hero, settings_without_cross_legs()).unwrap());

    let rebased_id = renderer_mesh(&hero);
    assert_ne!(rebased_id, hero.mesh_id);
    let rebased = hero.library.mesh(&rebased_id).unwrap();
    let bones: Vec<NodeId> = match hero.scene.component(hero.renderer).map(|c| &c.kind) {
        Some(ComponentKind::SkinnedMesh(renderer)) => renderer.bones.iter().flatten().copied().collect(),
        other => panic!("unexpected component {other:?}"),
    };

    // Every vertex, bound fully to any one bone, still lands on its rest position.
    for (slot, &bone) in bones.iter().enumerate() {
        let world = hero.scene.world_matrix(bone).to_matrix();
        for &vertex in &original.positions {
            let skinned = (world * rebased.bind_poses[slot]).transform_point(vertex);
            assert_abs_diff_eq!(skinned, vertex, epsilon = 1e-4);
        }
    }
    // The source mesh is left alone.
    assert_eq!(hero.library.mesh(&hero.mesh_id).unwrap().bind_poses, original.bind_poses);
}

#[test]
fn test_descriptor_is_captured_and_bound() {
    let mut hero = hero();
    assert!(run(&mut hero, RebakeSettings::default()).unwrap());

    let uuid = AssetUUID::from_name("Hero Rig");
    assert_eq!(hero.scene.node(hero.root).unwrap().rig_descriptor, Some(uuid));
    let descriptor = hero.library.descriptor(&uuid).unwrap();
    assert_eq!(descriptor.name, "Hero Rig");
    assert_eq!(descriptor.bone_name(HumanRole::Chest), Some("Spine1"));
    assert_eq!(descriptor.bone_name(HumanRole::LeftLowerArm), Some("LeftForeArm"));
    assert!(descriptor.skeleton_bone("Armature").is_some());
    assert!(descriptor.skeleton_bone("LeftArmTwist").is_none());

    // The socket shared a name with the spine only while capturing.
    assert_eq!(hero.scene.name(hero.socket), "Spine");
    assert!(descriptor.skeleton_bone("Spine (1)").is_none());
}

#[test]
fn test_descriptor_order_is_deterministic_pre_order() {
    let names = |hero: &Hero| -> Vec<String> {
        let uuid = hero.scene.node(hero.root).unwrap().rig_descriptor.unwrap();
        let descriptor = hero.library.descriptor(&uuid).unwrap();
        descriptor.skeleton.iter().map(|bone| bone.name.clone()).collect()
    };

    let mut first = hero();
    let mut second = hero();
    assert!(run(&mut first, RebakeSettings::default()).unwrap());
    assert!(run(&mut second, RebakeSettings::default()).unwrap());
    let order = names(&first);
    assert_eq!(order, names(&second));

    for (i, name) in order.iter().enumerate() {
        let node = first.scene.find_by_name(first.root, name).unwrap();
        if let Some(parent) = first.scene.parent(node) {
            let parent_name = first.scene.name(parent);
            if let Some(parent_index) = order.iter().position(|n| n == parent_name) {
                assert!(parent_index < i, "{parent_name} listed after {name}");
            }
        }
    }
    // Mapped bones were moved first among their siblings, spine ahead of the legs.
    assert_eq!(first.scene.children(first.hips)[0], first.scene.find_by_name(first.root, "Spine").unwrap());
}

#[test]
fn test_descriptor_failure_keeps_edits_and_names() {
    let mut hero = hero();
    let mut skeleton = NameBoneGuesser.guess(&hero.scene, hero.root, None).unwrap();
    skeleton.clear(HumanRole::Head);
    let spine_before = hero.scene.world_rotation(skeleton.get(HumanRole::Spine).unwrap());

    let captured = Rebaker::new()
        .process(
            &mut hero.scene,
            &mut hero.library,
            RebakeRequest {
                skeleton: Some(skeleton.clone()),
                ..RebakeRequest::new(hero.root)
            },
        )
        .unwrap();

    assert!(!captured);
    assert_eq!(hero.scene.node(hero.root).unwrap().rig_descriptor, None);
    assert!(hero.library.descriptors.is_empty());
    assert_eq!(hero.scene.name(hero.socket), "Spine");
    // Bone edits and the rebased mesh stay.
    let spine_after = hero.scene.world_rotation(skeleton.get(HumanRole::Spine).unwrap());
    assert!(spine_after.angle_between(spine_before) > 1e-3);
    assert_ne!(renderer_mesh(&hero), hero.mesh_id);
}

#[test]
fn test_second_rebake_changes_nothing() {
    let mut hero = hero();
    assert!(run(&mut hero, settings_without_cross_legs()).unwrap());
    let matrices: Vec<_> = hero.bones.iter().map(|&n| hero.scene.world_matrix(n)).collect();

    assert!(run(&mut hero, settings_without_cross_legs()).unwrap());
    for (&bone, before) in hero.bones.iter().zip(matrices) {
        assert_abs_diff_eq!(hero.scene.world_matrix(bone).0, before.0, epsilon = 1e-4);
    }
}

#[test]
fn test_canonical_legs_survive_cross_leg_check() {
    let mut hero = hero();
    let before: Vec<Transform> = hero.legs.iter().map(|&n| hero.scene.local(n)).collect();

    let settings = RebakeSettings {
        normalize_bones: false,
        fix_pose: FixPoseMode::Off,
        ..RebakeSettings::default()
    };
    assert!(run(&mut hero, settings).unwrap());

    for (&node, local) in hero.legs.iter().zip(before) {
        assert_eq!(hero.scene.local(node), local);
    }
    // Nothing moved, so the body keeps its original mesh.
    assert_eq!(renderer_mesh(&hero), hero.mesh_id);
}

#[derive(Default)]
struct CurveRebaser(Vec<(String, Vec3)>);

impl AnimationIndex for CurveRebaser {
    fn on_local_translation_changed(&mut self, scene: &SceneGraph, node: NodeId, before: Vec3, after: Vec3) {
        self.0.push((scene.name(node).to_owned(), after - before));
    }
}

#[test]
fn test_armature_fix_reports_translation_changes() {
    let mut hero = hero();
    let mut curves = CurveRebaser::default();
    Rebaker::new()
        .process(
            &mut hero.scene,
            &mut hero.library,
            RebakeRequest {
                animation: Some(&mut curves as &mut dyn AnimationIndex),
                ..RebakeRequest::new(hero.root)
            },
        )
        .unwrap();

    let names: Vec<&str> = curves.0.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["Armature", "Hips"]);
    assert_abs_diff_eq!(curves.0[0].1, Vec3::new(0.0, -0.02, 0.0), epsilon = 1e-6);
    assert_abs_diff_eq!(curves.0[1].1, Vec3::new(0.0, 0.02, 0.0), epsilon = 1e-6);
}

#[test]
fn test_box_collider_keeps_world_center_when_its_bone_turns() {
    let mut scene = SceneGraph::new();
    let root = scene.add_root("root", Transform::identity());
    let hip = scene.add_child(root, "hip", Transform::from_translation(Vec3::new(0.0, 1.0, 0.0)));
    let spine = scene.add_child(
        hip,
        "spine",
        Transform::from_translation_rotation(Vec3::new(0.0, 0.2, 0.0), Quaternion::from_axis_angle(Vec3::X, 0.4)),
    );
    let collider = scene.add_component(
        spine,
        ShapeCollider::new_box(Vec3::new(0.0, 0.0, 0.1), Vec3::new(0.2, 0.2, 0.2)),
    );
    let world_center = scene.world_matrix(spine).transform_point(Vec3::new(0.0, 0.0, 0.1));
    let skeleton: SkeletonMap = [(HumanRole::Hips, hip), (HumanRole::Spine, spine)].into_iter().collect();

    let mut library = AssetLibrary::new();
    let captured = Rebaker::new()
        .process(
            &mut scene,
            &mut library,
            RebakeRequest {
                skeleton: Some(skeleton),
                ..RebakeRequest::new(root)
            },
        )
        .unwrap();

    // Too few roles for a descriptor, but the bone edit still happened.
    assert!(!captured);
    assert_abs_diff_eq!(scene.world_rotation(spine), Quaternion::IDENTITY, epsilon = 1e-5);
    let Some(ComponentKind::Collider(box_collider)) = scene.component(collider).map(|c| &c.kind) else {
        panic!("collider missing");
    };
    assert!((box_collider.center - Vec3::new(0.0, 0.0, 0.1)).length() > 1e-3);
    assert_abs_diff_eq!(
        scene.world_matrix(spine).transform_point(box_collider.center),
        world_center,
        epsilon = 1e-4
    );
    assert_eq!(
        box_collider.shape,
        ColliderShape::Box {
            size: Vec3::new(0.2, 0.2, 0.2)
        }
    );
}

#[test]
fn test_configuration_errors_leave_scene_untouched() {
    let mut scene = SceneGraph::new();
    let root = scene.add_root("Crate", Transform::identity());
    let lid = scene.add_child(
        root,
        "Lid",
        Transform::from_translation_rotation(Vec3::Y, Quaternion::from_axis_angle(Vec3::X, 0.3)),
    );
    let before = scene.local(lid);
    let mut library = AssetLibrary::new();
    let rebaker = Rebaker::new();

    let result = rebaker.process(&mut scene, &mut library, RebakeRequest::new(root));
    assert!(matches!(result, Err(RebakeError::NoSkeleton { ref root }) if root == "Crate"));

    let result = rebaker.process(
        &mut scene,
        &mut library,
        RebakeRequest {
            skeleton: Some([(HumanRole::Spine, lid)].into_iter().collect()),
            ..RebakeRequest::new(root)
        },
    );
    assert!(matches!(result, Err(RebakeError::MissingHips)));

    let result = rebaker.process(&mut scene, &mut library, RebakeRequest::new(NodeId(99)));
    assert!(matches!(result, Err(RebakeError::RootNotFound(NodeId(99)))));

    assert_eq!(scene.local(lid), before);
    assert_eq!(scene.name(lid), "Lid");
}
