//! Animation clips: sparse keyframe tracks plus time-to-frame sampling.

use glam::Vec2;

use crate::error::{AnimError, Result};
use crate::skeleton::Skeleton;

/// What happens when playback time leaves the clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Clamp to the final frame and report finished
    Once,
    /// Wrap around to the start
    #[default]
    Loop,
    /// Reflect back and forth between the first and final frame
    PingPong,
}

/// Sparse pose override for a single bone at a single keyframe.
///
/// Each field is independently optional; an absent field means the
/// bone's bind pose value is used, never a value from an earlier
/// keyframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneKey {
    /// Index of the bone this key targets
    pub bone: u16,
    /// Position override, if authored
    pub position: Option<Vec2>,
    /// Rotation override in radians, if authored
    pub rotation: Option<f32>,
    /// Scale override, if authored
    pub scale: Option<Vec2>,
}

impl BoneKey {
    /// A key for `bone` with no field overrides
    pub fn empty(bone: u16) -> Self {
        Self {
            bone,
            position: None,
            rotation: None,
            scale: None,
        }
    }
}

/// Pose updates for a subset of bones at one frame number
#[derive(Debug, Clone)]
pub struct Keyframe {
    frame: u32,
    /// Bone keys sorted by bone index
    keys: Vec<BoneKey>,
}

impl Keyframe {
    /// Build a keyframe, sorting its keys by bone index.
    ///
    /// # Errors
    ///
    /// Returns [`AnimError::MalformedClip`] if two keys target the same
    /// bone.
    pub fn new(frame: u32, mut keys: Vec<BoneKey>) -> Result<Self> {
        keys.sort_by_key(|key| key.bone);
        for pair in keys.windows(2) {
            if pair[0].bone == pair[1].bone {
                return Err(AnimError::MalformedClip(format!(
                    "keyframe {frame} has duplicate keys for bone {}",
                    pair[0].bone
                )));
            }
        }

        Ok(Self { frame, keys })
    }

    /// Frame number this keyframe sits at
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Bone keys, sorted by bone index
    pub fn keys(&self) -> &[BoneKey] {
        &self.keys
    }

    /// The key targeting `bone`, if this keyframe has one
    pub fn key_for(&self, bone: u16) -> Option<&BoneKey> {
        self.keys
            .binary_search_by_key(&bone, |key| key.bone)
            .ok()
            .map(|index| &self.keys[index])
    }
}

/// A fractional frame position produced by [`AnimationClip::sample_time`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePosition {
    /// Frame position, `0.0..frames`
    pub frame: f32,
    /// Whether the clip's end was reached under [`LoopMode::Once`]
    pub finished: bool,
}

/// A named, timed sequence of keyframes.
///
/// Immutable after construction; owned by an asset cache and shared by
/// many playback controllers. Clips are skeleton-agnostic until bound:
/// bone indices are validated against a concrete skeleton by
/// [`validate_for`], not at load.
///
/// [`validate_for`]: Self::validate_for
#[derive(Debug, Clone)]
pub struct AnimationClip {
    name: String,
    /// Seconds per frame
    frame_time: f32,
    /// Total frame count
    frames: u32,
    /// Keyframes sorted by strictly ascending frame number
    keyframes: Vec<Keyframe>,
}

impl AnimationClip {
    /// Build a clip, validating its structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AnimError::MalformedClip`] if `frame_time` is not a
    /// positive finite number, `frames` is zero, keyframe numbers are
    /// not strictly ascending, or a keyframe number is `>= frames`.
    pub fn new(
        name: impl Into<String>,
        frame_time: f32,
        frames: u32,
        keyframes: Vec<Keyframe>,
    ) -> Result<Self> {
        let name = name.into();

        if !(frame_time.is_finite() && frame_time > 0.0) {
            return Err(AnimError::MalformedClip(format!(
                "clip '{name}': frame time must be positive, got {frame_time}"
            )));
        }
        if frames == 0 {
            return Err(AnimError::MalformedClip(format!(
                "clip '{name}': frame count must be non-zero"
            )));
        }

        for pair in keyframes.windows(2) {
            if pair[0].frame >= pair[1].frame {
                return Err(AnimError::MalformedClip(format!(
                    "clip '{name}': keyframes out of order ({} then {})",
                    pair[0].frame, pair[1].frame
                )));
            }
        }
        if let Some(last) = keyframes.last() {
            if last.frame >= frames {
                return Err(AnimError::MalformedClip(format!(
                    "clip '{name}': keyframe {} past the end (clip has {} frames)",
                    last.frame, frames
                )));
            }
        }

        if keyframes.is_empty() {
            log::warn!("clip '{name}' has no keyframes; it will play the bind pose");
        }

        Ok(Self {
            name,
            frame_time,
            frames,
            keyframes,
        })
    }

    /// Clip name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Seconds per frame
    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    /// Total frame count
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Keyframes, sorted by frame number
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Total clip length in seconds
    pub fn duration(&self) -> f32 {
        self.frames as f32 * self.frame_time
    }

    /// Highest bone index referenced by any keyframe
    pub fn max_bone_index(&self) -> Option<u16> {
        // Keys are sorted per keyframe, so the last key has the
        // keyframe's highest bone index
        self.keyframes
            .iter()
            .filter_map(|keyframe| keyframe.keys.last())
            .map(|key| key.bone)
            .max()
    }

    /// Check every bone reference against a concrete skeleton.
    ///
    /// Called at bind time, when the clip is first associated with a
    /// skeleton.
    ///
    /// # Errors
    ///
    /// Returns [`AnimError::UnknownBoneReference`] naming the first
    /// out-of-range bone index.
    pub fn validate_for(&self, skeleton: &Skeleton) -> Result<()> {
        if let Some(bone) = self.max_bone_index() {
            if usize::from(bone) >= skeleton.len() {
                return Err(AnimError::UnknownBoneReference {
                    bone,
                    bone_count: skeleton.len(),
                });
            }
        }
        Ok(())
    }

    /// Find the keyframes bracketing a fractional frame position.
    ///
    /// Returns `(prev, next)` with `prev.frame() <= frame` and `next`
    /// the following keyframe. Before the first keyframe both sides are
    /// the first keyframe; past the last both sides are the last (hold
    /// pose). `None` if the clip has no keyframes.
    pub fn bracket(&self, frame: f32) -> Option<(&Keyframe, &Keyframe)> {
        let (first, last) = (self.keyframes.first()?, self.keyframes.last()?);

        let upper = self
            .keyframes
            .partition_point(|keyframe| keyframe.frame as f32 <= frame);

        Some(match upper {
            0 => (first, first),
            n if n == self.keyframes.len() => (last, last),
            n => (&self.keyframes[n - 1], &self.keyframes[n]),
        })
    }

    /// Convert elapsed seconds to a frame position under a loop mode.
    ///
    /// Negative or zero time maps to frame 0. Under [`LoopMode::Once`]
    /// the position clamps to the final frame and `finished` is
    /// reported once the elapsed time covers the whole clip; `Loop`
    /// wraps with period [`duration`]; `PingPong` reflects between the
    /// first and final frame and never finishes.
    ///
    /// [`duration`]: Self::duration
    pub fn sample_time(&self, t: f32, mode: LoopMode) -> FramePosition {
        let frames = self.frames as f32;
        let raw = t / self.frame_time;

        if raw <= 0.0 {
            return FramePosition {
                frame: 0.0,
                finished: false,
            };
        }

        match mode {
            LoopMode::Once => FramePosition {
                frame: raw.min(frames - 1.0),
                finished: raw >= frames,
            },
            LoopMode::Loop => FramePosition {
                frame: raw.rem_euclid(frames),
                finished: false,
            },
            LoopMode::PingPong => {
                let span = frames - 1.0;
                let frame = if span <= 0.0 {
                    0.0
                } else {
                    let phase = raw.rem_euclid(2.0 * span);
                    if phase <= span { phase } else { 2.0 * span - phase }
                };
                FramePosition {
                    frame,
                    finished: false,
                }
            }
        }
    }
}
