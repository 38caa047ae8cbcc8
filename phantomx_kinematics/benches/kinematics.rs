// Forward/inverse kinematics throughput
// Run with: cargo bench --bench kinematics

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Point3;
use phantomx_kinematics::kinematics::{forward_kinematics, inverse_kinematics};
use phantomx_kinematics::prelude::*;

fn benchmark_forward(c: &mut Criterion) {
    let geometry = LegGeometry::phantomx(LegName::LeftFront);
    let angles = JointAngles::new(0.3, 0.2, -0.5);
    c.bench_function("forward_kinematics", |b| {
        b.iter(|| forward_kinematics(black_box(&geometry), black_box(&angles)))
    });
}

fn benchmark_inverse(c: &mut Criterion) {
    let geometry = LegGeometry::phantomx(LegName::LeftFront);
    let target = Point3::new(-0.24, -0.24, -0.13);
    c.bench_function("inverse_kinematics", |b| {
        b.iter(|| inverse_kinematics(black_box(&geometry), black_box(&target)))
    });
}

fn benchmark_leg_queries(c: &mut Criterion) {
    let leg = LegKinematics::new(LegGeometry::phantomx(LegName::RightMiddle));
    for joint in JointId::ALL {
        leg.update_joint(joint, &JointFeedback::settled(0.1));
    }

    let mut group = c.benchmark_group("leg_queries");
    for query in ["end_effector", "inverse", "contact"] {
        group.bench_with_input(BenchmarkId::from_parameter(query), &query, |b, &query| {
            b.iter(|| match query {
                "end_effector" => black_box(leg.end_effector_position().is_ok()),
                "inverse" => black_box(leg.compute_inverse_kinematics(None).is_ok()),
                _ => black_box(leg.predicted_ground_contact()),
            })
        });
    }
    group.finish();
}

fn benchmark_tf_lookup(c: &mut Criterion) {
    let leg = LegKinematics::new(LegGeometry::phantomx(LegName::LeftRear));
    for joint in JointId::ALL {
        leg.update_joint(joint, &JointFeedback::settled(0.2));
    }
    let mut tree = TFTree::new(phantomx_kinematics::tf::BODY_FRAME);
    for t in 0..50u64 {
        let _ = leg.publish_frames(&mut tree, t * 1_000);
    }

    c.bench_function("forward_kinematics_tf", |b| {
        b.iter(|| leg.compute_forward_kinematics_tf(black_box(&tree), black_box(24_500)))
    });
}

criterion_group!(
    benches,
    benchmark_forward,
    benchmark_inverse,
    benchmark_leg_queries,
    benchmark_tf_lookup
);
criterion_main!(benches);
