//! Benchmarks for pose evaluation

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use glam::Vec2;
use skel2d_anim::pose::Pose2D;
use skel2d_anim::skeleton::Bone;
use skel2d_anim::{AnimationClip, BoneKey, Keyframe, Skeleton, evaluate_pose_into};

/// A 64-bone chain, each bone one unit out from its parent
fn create_test_skeleton() -> Skeleton {
    let bones = (0..64)
        .map(|i| {
            let parent = if i == 0 { None } else { Some(i - 1) };
            Bone::new(
                format!("bone_{i}"),
                parent,
                Pose2D::new(Vec2::new(1.0, 0.0), 0.0, Vec2::ONE),
                1.0,
            )
        })
        .collect();
    Skeleton::new("chain", bones, Vec::new()).unwrap()
}

/// Sparse keyframes: every fourth frame keys half the bones
fn create_test_clip() -> AnimationClip {
    let keyframes = (0..16)
        .map(|i| {
            let keys = (0..32)
                .map(|bone| BoneKey {
                    rotation: Some(0.01 * (i * 32 + bone) as f32),
                    ..BoneKey::empty(bone as u16 * 2)
                })
                .collect();
            Keyframe::new(i * 4, keys).unwrap()
        })
        .collect();
    AnimationClip::new("sweep", 1.0 / 30.0, 64, keyframes).unwrap()
}

fn bench_evaluate_pose(c: &mut Criterion) {
    let skeleton = create_test_skeleton();
    let clip = create_test_clip();
    let mut world = Vec::new();

    c.bench_function("evaluate_pose_64_bones", |b| {
        b.iter(|| {
            evaluate_pose_into(&skeleton, &clip, black_box(17.3), &mut world);
            black_box(&world);
        });
    });
}

fn bench_sample_time(c: &mut Criterion) {
    let clip = create_test_clip();

    c.bench_function("sample_time_loop", |b| {
        b.iter(|| {
            let position = clip.sample_time(black_box(5.21), skel2d_anim::LoopMode::Loop);
            black_box(position)
        });
    });
}

criterion_group!(benches, bench_evaluate_pose, bench_sample_time);
criterion_main!(benches);
