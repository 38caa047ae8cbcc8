// End-to-end behavior of a leg: readiness, FK/IK, contact, commands and frames
use approx::assert_abs_diff_eq;
use phantomx_kinematics::communication::{Link, Subscriber};
use phantomx_kinematics::prelude::*;
use phantomx_kinematics::tf::BODY_FRAME;
use std::sync::Arc;
use std::thread;

fn settle(leg: &LegKinematics, angles: JointAngles) {
    let feedback = JointId::ALL.map(|joint| (joint, JointFeedback::settled(angles.get(joint))));
    leg.update_joints(feedback.iter().map(|(joint, fb)| (*joint, fb)));
}

#[test]
fn test_round_trip_over_joint_grid() {
    let settings = RobotSettings::default();
    let mut checked = 0;
    for name in LegName::ALL {
        let leg = settings.build_leg(name).unwrap();
        for alpha in [-0.4, 0.0, 0.4] {
            for (beta, gamma) in [(0.2, -0.5), (0.1, -0.8), (0.25, -0.2), (-0.3, 0.5), (-0.6, 0.8)] {
                let angles = JointAngles::new(alpha, beta, gamma);
                let foot = leg.compute_forward_kinematics(Some(angles)).unwrap();
                let solved = leg.compute_inverse_kinematics(Some(foot)).unwrap();
                assert!(
                    solved.max_abs_diff(&angles) < 0.02,
                    "{} {:?} -> {:?}",
                    name,
                    angles,
                    solved
                );
                checked += 1;
            }
        }
    }
    assert_eq!(checked, 6 * 3 * 5);
}

#[test]
fn test_left_and_right_legs_mirror() {
    let settings = RobotSettings::default();
    for (left, right) in [
        (LegName::LeftFront, LegName::RightFront),
        (LegName::LeftMiddle, LegName::RightMiddle),
        (LegName::LeftRear, LegName::RightRear),
    ] {
        let l = settings.build_leg(left).unwrap();
        let r = settings.build_leg(right).unwrap();
        let pl = l.compute_forward_kinematics(Some(JointAngles::new(0.2, 0.1, -0.4))).unwrap();
        let pr = r.compute_forward_kinematics(Some(JointAngles::new(-0.2, 0.1, -0.4))).unwrap();
        assert_abs_diff_eq!(pl.x, pr.x, epsilon = 1e-9);
        assert_abs_diff_eq!(pl.y, -pr.y, epsilon = 1e-9);
        assert_abs_diff_eq!(pl.z, pr.z, epsilon = 1e-9);
    }
}

#[test]
fn test_unreachable_target_keeps_original_point() {
    let leg = LegKinematics::new(LegGeometry::phantomx(LegName::LeftMiddle));
    let target = Point3::new(0.0, -0.6, 0.0);
    match leg.compute_inverse_kinematics(Some(target)) {
        Err(KinematicsError::UnreachableTarget { leg, target: t }) => {
            assert_eq!(leg, LegName::LeftMiddle);
            assert_eq!(t, target);
        }
        other => panic!("expected UnreachableTarget, got {:?}", other),
    }
}

#[test]
fn test_contact_for_each_group() {
    // Each pose puts the foot at its group AEP with y mirrored per side.
    // The X check mirrors the AEP through movement_dir as well, so right legs
    // end up far from it and never predict contact.
    let cases = [
        (LegName::LeftFront, JointAngles::new(0.2119, -0.2705, -1.1113), true),
        (LegName::RightFront, JointAngles::new(-0.2119, -0.2705, -1.1113), false),
        (LegName::LeftMiddle, JointAngles::new(-0.2007, -0.3771, -1.2999), true),
        (LegName::RightMiddle, JointAngles::new(0.2007, -0.3771, -1.2999), false),
        (LegName::LeftRear, JointAngles::new(-0.2119, -0.2705, -1.1113), true),
        (LegName::RightRear, JointAngles::new(0.2119, -0.2705, -1.1113), false),
    ];
    for (name, angles, expected) in cases {
        let leg = LegKinematics::new(LegGeometry::phantomx(name));
        assert!(!leg.predicted_ground_contact());
        settle(&leg, angles);
        let ee = leg.end_effector_position().unwrap();
        assert!(ee.z < leg.contact_reference().height_threshold(), "{}", name);
        assert_eq!(leg.predicted_ground_contact(), expected, "{}", name);
    }
}

#[test]
fn test_commands_flow_to_sink() {
    let link: Link<LegCommand> = Link::new("leg_commands", 16);
    let leg = LegKinematics::new(LegGeometry::phantomx(LegName::RightMiddle))
        .with_command_sink(Arc::new(link.clone()));

    let target = leg
        .compute_forward_kinematics(Some(JointAngles::new(0.1, 0.2, -0.5)))
        .unwrap();
    let angles = leg.compute_inverse_kinematics(Some(target)).unwrap();
    leg.set_command(angles);

    let cmd = Subscriber::recv(&link).unwrap();
    assert_eq!(cmd.leg, LegName::RightMiddle);
    assert!(cmd.angles.max_abs_diff(&JointAngles::new(0.1, 0.2, -0.5)) < 1e-4);
    let names: Vec<String> = cmd.joint_commands().iter().map(|(n, _)| n.clone()).collect();
    assert_eq!(names, vec!["j_c1_rm", "j_thigh_rm", "j_tibia_rm"]);
}

#[test]
fn test_tf_and_analytic_paths_agree() {
    let mut tree = TFTree::new(BODY_FRAME);
    for name in LegName::ALL {
        let leg = LegKinematics::new(LegGeometry::phantomx(name));
        for (t, angles) in [
            JointAngles::new(0.0, 0.2, -0.5),
            JointAngles::new(-0.4, 0.1, -0.8),
            JointAngles::new(0.5, 0.25, -0.2),
        ]
        .into_iter()
        .enumerate()
        {
            settle(&leg, angles);
            let timestamp = 1_000 * (t as u64 + 1);
            assert!(leg.publish_frames(&mut tree, timestamp).unwrap());
            let via_tree = leg.compute_forward_kinematics_tf(&tree, timestamp).unwrap();
            let analytic = leg.end_effector_position().unwrap();
            assert!((via_tree - analytic).norm() < 1e-9, "{} {:?}", name, angles);
        }
    }
}

#[test]
fn test_snapshots_are_never_torn() {
    let leg = Arc::new(LegKinematics::new(LegGeometry::phantomx(LegName::LeftFront)));
    let a = JointAngles::new(0.0, 0.2, -0.5);
    let b = JointAngles::new(0.3, 0.1, -0.8);
    settle(&leg, a);

    let writer = {
        let leg = Arc::clone(&leg);
        thread::spawn(move || {
            for i in 0..2_000 {
                settle(&leg, if i % 2 == 0 { b } else { a });
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let leg = Arc::clone(&leg);
            thread::spawn(move || {
                for _ in 0..2_000 {
                    let angles = leg.get_current_angles().unwrap();
                    assert!(angles == a || angles == b, "torn snapshot {:?}", angles);
                    assert!(leg.end_effector_position().is_ok());
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}
