//! Pose evaluation: a pure function of (skeleton, clip, frame position).
//!
//! No hidden state lives here, so the same clip can be sampled by any
//! number of simultaneously playing instances, and every property of
//! the sampler is testable in isolation.

use crate::clip::{AnimationClip, BoneKey, Keyframe};
use crate::pose::Pose2D;
use crate::skeleton::Skeleton;

/// Evaluate the world transform of every bone at a fractional frame
/// position.
///
/// The output is indexed identically to the skeleton's bone order. Bone
/// references outside the skeleton must have been rejected at bind time
/// ([`AnimationClip::validate_for`]); sampling itself cannot fail.
pub fn evaluate_pose(skeleton: &Skeleton, clip: &AnimationClip, frame: f32) -> Vec<Pose2D> {
    let mut world = Vec::new();
    evaluate_pose_into(skeleton, clip, frame, &mut world);
    world
}

/// As [`evaluate_pose`], writing into a caller-owned buffer.
pub fn evaluate_pose_into(
    skeleton: &Skeleton,
    clip: &AnimationClip,
    frame: f32,
    out: &mut Vec<Pose2D>,
) {
    let locals: Vec<Pose2D> = match clip.bracket(frame) {
        Some((prev, next)) => {
            let t = blend_factor(prev, next, frame);
            skeleton
                .bones()
                .iter()
                .enumerate()
                .map(|(index, bone)| local_pose(index as u16, &bone.bind, prev, next, t))
                .collect()
        }
        // No keyframes: the clip plays the bind pose
        None => skeleton.bind_locals(),
    };

    skeleton.resolve_world_transforms_into(&locals, out);
}

/// Fractional position of `frame` between two bracketing keyframes
fn blend_factor(prev: &Keyframe, next: &Keyframe, frame: f32) -> f32 {
    if next.frame() <= prev.frame() {
        return 0.0;
    }
    let span = (next.frame() - prev.frame()) as f32;
    ((frame - prev.frame() as f32) / span).clamp(0.0, 1.0)
}

/// Interpolated local pose for one bone between two keyframes
fn local_pose(bone: u16, bind: &Pose2D, prev: &Keyframe, next: &Keyframe, t: f32) -> Pose2D {
    let a = effective_pose(bind, prev.key_for(bone));
    let b = effective_pose(bind, next.key_for(bone));
    a.lerp(&b, t)
}

/// A keyframe's pose for one bone: the bind pose overridden per-field
/// by the authored key. Absent fields fall back to the bind pose, never
/// to an earlier keyframe.
fn effective_pose(bind: &Pose2D, key: Option<&BoneKey>) -> Pose2D {
    match key {
        Some(key) => Pose2D {
            position: key.position.unwrap_or(bind.position),
            rotation: key.rotation.unwrap_or(bind.rotation),
            scale: key.scale.unwrap_or(bind.scale),
        },
        None => *bind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::Keyframe;
    use crate::skeleton::Bone;
    use glam::Vec2;

    const EPSILON: f32 = 1e-4;

    fn create_test_skeleton() -> Skeleton {
        let bones = vec![
            Bone::new("root", None, Pose2D::IDENTITY, 1.0),
            Bone::new(
                "arm",
                Some(0),
                Pose2D::new(Vec2::new(2.0, 0.0), 0.0, Vec2::ONE),
                1.0,
            ),
        ];
        Skeleton::new("rig", bones, Vec::new()).unwrap()
    }

    fn position_key(bone: u16, x: f32, y: f32) -> BoneKey {
        BoneKey {
            position: Some(Vec2::new(x, y)),
            ..BoneKey::empty(bone)
        }
    }

    fn rotation_key(bone: u16, degrees: f32) -> BoneKey {
        BoneKey {
            rotation: Some(degrees.to_radians()),
            ..BoneKey::empty(bone)
        }
    }

    #[test]
    fn test_exact_keyframe_hit_returns_authored_pose() {
        let skeleton = create_test_skeleton();
        let keyframes = vec![
            Keyframe::new(0, vec![position_key(0, 1.0, 1.0)]).unwrap(),
            Keyframe::new(5, vec![position_key(0, 9.0, 9.0)]).unwrap(),
        ];
        let clip = AnimationClip::new("test", 0.1, 10, keyframes).unwrap();

        let world = evaluate_pose(&skeleton, &clip, 5.0);
        assert!((world[0].position.x - 9.0).abs() < EPSILON);
        assert!((world[0].position.y - 9.0).abs() < EPSILON);
    }

    #[test]
    fn test_omitted_bone_keeps_bind_pose() {
        let skeleton = create_test_skeleton();
        // Keyframes only ever mention bone 0; bone 1 stays at bind
        let keyframes = vec![
            Keyframe::new(0, vec![position_key(0, 5.0, 0.0)]).unwrap(),
            Keyframe::new(4, vec![position_key(0, 5.0, 0.0)]).unwrap(),
        ];
        let clip = AnimationClip::new("test", 0.1, 10, keyframes).unwrap();

        let world = evaluate_pose(&skeleton, &clip, 2.0);
        // Bone 1 sits at its bind offset from the animated root
        assert!((world[1].position.x - 7.0).abs() < EPSILON);
    }

    #[test]
    fn test_omitted_field_keeps_bind_value() {
        let skeleton = create_test_skeleton();
        // The key overrides rotation only; position stays at bind
        let keyframes = vec![Keyframe::new(0, vec![rotation_key(1, 90.0)]).unwrap()];
        let clip = AnimationClip::new("test", 0.1, 10, keyframes).unwrap();

        let world = evaluate_pose(&skeleton, &clip, 0.0);
        assert!((world[1].position.x - 2.0).abs() < EPSILON);
        assert!((world[1].rotation - std::f32::consts::FRAC_PI_2).abs() < EPSILON);
    }

    #[test]
    fn test_midpoint_position_interpolation() {
        let skeleton = create_test_skeleton();
        let keyframes = vec![
            Keyframe::new(0, vec![position_key(0, 0.0, 0.0)]).unwrap(),
            Keyframe::new(4, vec![position_key(0, 10.0, 0.0)]).unwrap(),
        ];
        let clip = AnimationClip::new("test", 0.1, 10, keyframes).unwrap();

        let world = evaluate_pose(&skeleton, &clip, 2.0);
        assert!((world[0].position.x - 5.0).abs() < EPSILON);
        assert!(world[0].position.y.abs() < EPSILON);
    }

    #[test]
    fn test_midpoint_rotation_takes_shortest_arc() {
        let skeleton = create_test_skeleton();
        let keyframes = vec![
            Keyframe::new(0, vec![rotation_key(0, 350.0)]).unwrap(),
            Keyframe::new(4, vec![rotation_key(0, 10.0)]).unwrap(),
        ];
        let clip = AnimationClip::new("test", 0.1, 10, keyframes).unwrap();

        let world = evaluate_pose(&skeleton, &clip, 2.0);
        // 350 -> 10 degrees blends through 0, not through 180
        let wrapped = crate::pose::wrap_angle(world[0].rotation);
        assert!(wrapped.abs() < EPSILON, "expected 0, got {wrapped}");
    }

    #[test]
    fn test_holds_last_keyframe_past_the_tail() {
        let skeleton = create_test_skeleton();
        let keyframes = vec![
            Keyframe::new(0, vec![position_key(0, 0.0, 0.0)]).unwrap(),
            Keyframe::new(3, vec![position_key(0, 6.0, 0.0)]).unwrap(),
        ];
        let clip = AnimationClip::new("test", 0.1, 10, keyframes).unwrap();

        let at_tail = evaluate_pose(&skeleton, &clip, 3.0);
        let beyond = evaluate_pose(&skeleton, &clip, 8.5);
        assert_eq!(at_tail[0].position, beyond[0].position);
    }

    #[test]
    fn test_empty_clip_plays_bind_pose() {
        let skeleton = create_test_skeleton();
        let clip = AnimationClip::new("empty", 0.1, 10, Vec::new()).unwrap();

        let world = evaluate_pose(&skeleton, &clip, 4.2);
        let bind = skeleton.resolve_world_transforms(&skeleton.bind_locals());
        assert_eq!(world, bind);
    }

    #[test]
    fn test_animated_root_carries_children() {
        let skeleton = create_test_skeleton();
        let keyframes = vec![
            Keyframe::new(0, vec![position_key(0, 0.0, 0.0)]).unwrap(),
            Keyframe::new(4, vec![position_key(0, 0.0, 8.0)]).unwrap(),
        ];
        let clip = AnimationClip::new("test", 0.1, 10, keyframes).unwrap();

        let world = evaluate_pose(&skeleton, &clip, 4.0);
        assert!((world[1].position.y - 8.0).abs() < EPSILON);
        assert!((world[1].position.x - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_evaluate_into_reuses_buffer() {
        let skeleton = create_test_skeleton();
        let clip = AnimationClip::new("empty", 0.1, 10, Vec::new()).unwrap();

        let mut buffer = Vec::new();
        evaluate_pose_into(&skeleton, &clip, 0.0, &mut buffer);
        assert_eq!(buffer.len(), 2);
        evaluate_pose_into(&skeleton, &clip, 5.0, &mut buffer);
        assert_eq!(buffer.len(), 2);
    }
}
