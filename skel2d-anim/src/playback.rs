//! Per-instance playback state: one controller per animated entity.

use std::sync::Arc;

use crate::clip::{AnimationClip, LoopMode};
use crate::error::Result;
use crate::evaluator;
use crate::pose::Pose2D;
use crate::skeleton::Skeleton;

/// Playback state of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No clip playing; the pose holds its last value
    Stopped,
    /// Advancing on every tick
    Playing,
    /// Clip bound but time frozen
    Paused,
    /// A [`LoopMode::Once`] clip reached its end; terminal until the
    /// next `play`
    Finished,
}

/// Mutable playback state for one skeleton instance.
///
/// The skeleton and clip are immutable shared assets behind [`Arc`];
/// the controller owns only its own time, speed, and cached pose, so
/// many controllers can play the same clip concurrently. The host game
/// loop calls [`tick`] once per frame and reads
/// [`world_transforms`] for rendering or physics.
///
/// [`tick`]: Self::tick
/// [`world_transforms`]: Self::world_transforms
#[derive(Debug)]
pub struct PlaybackController {
    skeleton: Arc<Skeleton>,
    clip: Option<Arc<AnimationClip>>,
    state: PlaybackState,
    /// Seconds of playback, already scaled by the speed multiplier
    elapsed: f32,
    speed: f32,
    loop_mode: LoopMode,
    world: Vec<Pose2D>,
}

impl PlaybackController {
    /// Create a stopped controller for one skeleton instance.
    ///
    /// The cached pose starts at the skeleton's bind pose so consumers
    /// see sensible transforms before any clip plays.
    pub fn new(skeleton: Arc<Skeleton>) -> Self {
        let world = skeleton.resolve_world_transforms(&skeleton.bind_locals());
        Self {
            skeleton,
            clip: None,
            state: PlaybackState::Stopped,
            elapsed: 0.0,
            speed: 1.0,
            loop_mode: LoopMode::default(),
            world,
        }
    }

    /// Start playing a clip from its beginning.
    ///
    /// Binds the clip to this controller's skeleton, which validates
    /// every bone reference. Also the way to switch clips mid-playback
    /// and to leave the `Finished` state.
    ///
    /// # Errors
    ///
    /// Returns [`AnimError::UnknownBoneReference`] if the clip
    /// references a bone the skeleton does not have; the controller is
    /// left unchanged.
    ///
    /// [`AnimError::UnknownBoneReference`]: crate::error::AnimError::UnknownBoneReference
    pub fn play(&mut self, clip: Arc<AnimationClip>) -> Result<()> {
        clip.validate_for(&self.skeleton)?;

        log::debug!(
            "playing clip '{}' on skeleton '{}'",
            clip.name(),
            self.skeleton.name()
        );

        self.clip = Some(clip);
        self.elapsed = 0.0;
        self.state = PlaybackState::Playing;
        self.refresh_pose();
        Ok(())
    }

    /// Freeze playback time. Only meaningful while `Playing`.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Resume from `Paused`.
    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Playing;
        }
    }

    /// Stop playback and reset time. The last evaluated pose stays
    /// readable.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.elapsed = 0.0;
    }

    /// Advance playback by `dt` seconds and re-evaluate the pose.
    ///
    /// A no-op in every state but `Playing`. Under [`LoopMode::Once`]
    /// the controller transitions to `Finished` when the clip's end is
    /// reached; it never re-enters `Playing` without an explicit
    /// [`play`].
    ///
    /// [`play`]: Self::play
    pub fn tick(&mut self, dt: f32) {
        if self.state != PlaybackState::Playing {
            return;
        }

        self.elapsed += dt * self.speed;
        if self.refresh_pose() {
            self.state = PlaybackState::Finished;
        }
    }

    /// Re-evaluate the cached pose; true if the clip reported finished
    fn refresh_pose(&mut self) -> bool {
        let Some(clip) = self.clip.as_ref() else {
            return false;
        };

        let position = clip.sample_time(self.elapsed, self.loop_mode);
        evaluator::evaluate_pose_into(&self.skeleton, clip, position.frame, &mut self.world);
        position.finished
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Elapsed playback time in seconds
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Speed multiplier applied to every tick
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Set the speed multiplier (1.0 = authored speed; negative plays
    /// in reverse and pins at frame 0)
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Current loop mode
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    /// Set the loop mode for subsequent ticks
    pub fn set_loop_mode(&mut self, loop_mode: LoopMode) {
        self.loop_mode = loop_mode;
    }

    /// The active clip, if any
    pub fn clip(&self) -> Option<&Arc<AnimationClip>> {
        self.clip.as_ref()
    }

    /// The skeleton this controller animates
    pub fn skeleton(&self) -> &Arc<Skeleton> {
        &self.skeleton
    }

    /// World transforms of the last evaluated pose, one per bone in
    /// skeleton index order
    pub fn world_transforms(&self) -> &[Pose2D] {
        &self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{BoneKey, Keyframe};
    use crate::error::AnimError;
    use crate::skeleton::Bone;
    use glam::Vec2;

    const EPSILON: f32 = 1e-4;

    fn create_test_skeleton() -> Arc<Skeleton> {
        let bones = vec![
            Bone::new("root", None, Pose2D::IDENTITY, 1.0),
            Bone::new(
                "tip",
                Some(0),
                Pose2D::new(Vec2::new(1.0, 0.0), 0.0, Vec2::ONE),
                1.0,
            ),
        ];
        Arc::new(Skeleton::new("rig", bones, Vec::new()).unwrap())
    }

    fn create_test_clip() -> Arc<AnimationClip> {
        let key = |x| BoneKey {
            position: Some(Vec2::new(x, 0.0)),
            ..BoneKey::empty(0)
        };
        let keyframes = vec![
            Keyframe::new(0, vec![key(0.0)]).unwrap(),
            Keyframe::new(9, vec![key(9.0)]).unwrap(),
        ];
        // 10 frames at 0.1s: one second long
        Arc::new(AnimationClip::new("slide", 0.1, 10, keyframes).unwrap())
    }

    #[test]
    fn test_starts_stopped_with_bind_pose() {
        let controller = PlaybackController::new(create_test_skeleton());
        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert_eq!(controller.world_transforms().len(), 2);
        assert!((controller.world_transforms()[1].position.x - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_play_rejects_unknown_bone() {
        let mut controller = PlaybackController::new(create_test_skeleton());
        let keyframes = vec![Keyframe::new(0, vec![BoneKey::empty(9)]).unwrap()];
        let clip = Arc::new(AnimationClip::new("bad", 0.1, 10, keyframes).unwrap());

        let result = controller.play(clip);
        assert!(matches!(
            result,
            Err(AnimError::UnknownBoneReference { bone: 9, .. })
        ));
        assert_eq!(controller.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_tick_advances_while_playing() {
        let mut controller = PlaybackController::new(create_test_skeleton());
        controller.play(create_test_clip()).unwrap();

        controller.tick(0.45);
        assert!((controller.elapsed() - 0.45).abs() < EPSILON);
        // Frame 4.5 of a 0..9 slide: root at x = 4.5
        assert!((controller.world_transforms()[0].position.x - 4.5).abs() < EPSILON);
    }

    #[test]
    fn test_tick_noop_unless_playing() {
        let mut controller = PlaybackController::new(create_test_skeleton());
        controller.tick(1.0);
        assert!(controller.elapsed().abs() < EPSILON);

        controller.play(create_test_clip()).unwrap();
        controller.pause();
        controller.tick(1.0);
        assert!(controller.elapsed().abs() < EPSILON);
        assert_eq!(controller.state(), PlaybackState::Paused);

        controller.resume();
        controller.tick(0.2);
        assert!((controller.elapsed() - 0.2).abs() < EPSILON);
    }

    #[test]
    fn test_pause_resume_only_from_expected_states() {
        let mut controller = PlaybackController::new(create_test_skeleton());

        // Pause on a stopped controller does nothing
        controller.pause();
        assert_eq!(controller.state(), PlaybackState::Stopped);

        // Resume without a pause does nothing
        controller.resume();
        assert_eq!(controller.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_speed_multiplier() {
        let mut controller = PlaybackController::new(create_test_skeleton());
        controller.play(create_test_clip()).unwrap();
        controller.set_speed(2.0);

        controller.tick(0.1);
        assert!((controller.elapsed() - 0.2).abs() < EPSILON);
    }

    #[test]
    fn test_once_finishes_exactly_once_and_stays() {
        let mut controller = PlaybackController::new(create_test_skeleton());
        controller.set_loop_mode(LoopMode::Once);
        controller.play(create_test_clip()).unwrap();

        let mut finished_transitions = 0;
        for _ in 0..40 {
            let before = controller.state();
            controller.tick(1.0 / 30.0);
            if before != PlaybackState::Finished && controller.state() == PlaybackState::Finished {
                finished_transitions += 1;
            }
        }

        assert_eq!(finished_transitions, 1);
        assert_eq!(controller.state(), PlaybackState::Finished);

        // Finished pose equals the final frame's pose
        assert!((controller.world_transforms()[0].position.x - 9.0).abs() < EPSILON);

        // Further ticks change nothing
        controller.tick(1.0);
        assert_eq!(controller.state(), PlaybackState::Finished);
    }

    #[test]
    fn test_loop_never_finishes() {
        let mut controller = PlaybackController::new(create_test_skeleton());
        controller.set_loop_mode(LoopMode::Loop);
        controller.play(create_test_clip()).unwrap();

        for _ in 0..100 {
            controller.tick(0.1);
        }
        assert_eq!(controller.state(), PlaybackState::Playing);
    }

    #[test]
    fn test_play_again_after_finished() {
        let mut controller = PlaybackController::new(create_test_skeleton());
        controller.set_loop_mode(LoopMode::Once);
        controller.play(create_test_clip()).unwrap();

        controller.tick(5.0);
        assert_eq!(controller.state(), PlaybackState::Finished);

        controller.play(create_test_clip()).unwrap();
        assert_eq!(controller.state(), PlaybackState::Playing);
        assert!(controller.elapsed().abs() < EPSILON);
    }

    #[test]
    fn test_stop_resets_time_keeps_pose() {
        let mut controller = PlaybackController::new(create_test_skeleton());
        controller.play(create_test_clip()).unwrap();
        controller.tick(0.45);

        controller.stop();
        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert!(controller.elapsed().abs() < EPSILON);
        assert!((controller.world_transforms()[0].position.x - 4.5).abs() < EPSILON);
    }

    #[test]
    fn test_switching_clips_resets_time() {
        let mut controller = PlaybackController::new(create_test_skeleton());
        controller.play(create_test_clip()).unwrap();
        controller.tick(0.45);

        let other = Arc::new(AnimationClip::new("idle", 0.1, 10, Vec::new()).unwrap());
        controller.play(other).unwrap();
        assert!(controller.elapsed().abs() < EPSILON);
        assert_eq!(controller.clip().unwrap().name(), "idle");
    }
}
