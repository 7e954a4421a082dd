//! 2D skeletal animation runtime.
//!
//! This crate animates a bone hierarchy from sparse keyframe clips:
//! skeletons and clips are immutable, validated assets shared by any
//! number of per-entity playback controllers, and pose evaluation is a
//! pure function of (skeleton, clip, frame position).
//!
//! # Overview
//!
//! - [`Skeleton`] — index-addressed bone arena with bind poses and a
//!   validated, cycle-free parent graph
//! - [`AnimationClip`] — sparse keyframes over a fixed frame count and
//!   frame time, with loop-mode time sampling
//! - [`evaluator`] — stateless interpolation and hierarchy composition
//! - [`PlaybackController`] — per-instance time, speed, and state
//!   machine, ticked once per host frame
//! - [`loader`] — JSON asset documents mirroring the authoring format
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use skel2d_anim::{AnimationClip, LoopMode, PlaybackController, Skeleton};
//! use skel2d_anim::pose::Pose2D;
//! use skel2d_anim::skeleton::Bone;
//!
//! let bones = vec![Bone::new("root", None, Pose2D::IDENTITY, 0.0)];
//! let skeleton = Arc::new(Skeleton::new("rig", bones, vec![]).unwrap());
//! let clip = Arc::new(AnimationClip::new("idle", 0.1, 10, vec![]).unwrap());
//!
//! let mut controller = PlaybackController::new(skeleton);
//! controller.set_loop_mode(LoopMode::Loop);
//! controller.play(clip).unwrap();
//! controller.tick(1.0 / 60.0);
//!
//! assert_eq!(controller.world_transforms().len(), 1);
//! ```

#![forbid(unsafe_code)]

pub mod clip;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod playback;
pub mod pose;
pub mod skeleton;

// Re-export common types
pub use clip::{AnimationClip, BoneKey, FramePosition, Keyframe, LoopMode};
pub use error::{AnimError, Result};
pub use evaluator::{evaluate_pose, evaluate_pose_into};
pub use loader::{load_clip, load_skeleton};
pub use playback::{PlaybackController, PlaybackState};
pub use pose::Pose2D;
pub use skeleton::{Bone, Skeleton};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
