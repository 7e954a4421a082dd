//! JSON asset loading for skeletons and clips.
//!
//! The documents mirror the authoring format: a bone carries name,
//! index, parent index, position, rotation, scale, and length; a
//! keyframe carries a frame number and per-bone updates; a clip carries
//! frame time and frame count plus its keyframes. Every structural
//! invariant is enforced before an asset is returned, so a loaded
//! [`Skeleton`]/[`AnimationClip`] is always safe to sample.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clip::{AnimationClip, BoneKey, Keyframe};
use crate::error::{AnimError, Result};
use crate::pose::Pose2D;
use crate::skeleton::{Bone, Skeleton};

fn default_scale() -> [f32; 2] {
    [1.0, 1.0]
}

#[derive(Debug, Serialize, Deserialize)]
struct SkeletonDoc {
    name: String,
    #[serde(default)]
    animations: Vec<String>,
    bones: Vec<BoneDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BoneDoc {
    name: String,
    index: u32,
    /// Parent bone index; -1 for a root
    parent: i32,
    #[serde(default)]
    position: [f32; 2],
    #[serde(default)]
    rotation: f32,
    #[serde(default = "default_scale")]
    scale: [f32; 2],
    #[serde(default)]
    length: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClipDoc {
    name: String,
    frame_time: f32,
    frames: u32,
    #[serde(default)]
    keyframes: Vec<KeyframeDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct KeyframeDoc {
    frame: u32,
    #[serde(default)]
    bones: Vec<BoneKeyDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BoneKeyDoc {
    bone: u32,
    #[serde(default)]
    position: Option<[f32; 2]>,
    #[serde(default)]
    rotation: Option<f32>,
    #[serde(default)]
    scale: Option<[f32; 2]>,
}

/// Load and validate a skeleton from a JSON document.
///
/// # Errors
///
/// Returns [`AnimError::Json`] for a malformed document,
/// [`AnimError::InvalidData`] if a bone's declared index does not match
/// its position or a parent index is out of representable range, and
/// [`AnimError::InvalidHierarchy`] for a dangling parent, a cycle, or a
/// duplicate bone name.
pub fn load_skeleton(bytes: &[u8]) -> Result<Skeleton> {
    let doc: SkeletonDoc = serde_json::from_slice(bytes)?;

    let mut bones = Vec::with_capacity(doc.bones.len());
    for (position, bone) in doc.bones.into_iter().enumerate() {
        if bone.index as usize != position {
            return Err(AnimError::InvalidData(format!(
                "bone '{}' declares index {} but sits at position {position}",
                bone.name, bone.index
            )));
        }

        let parent = parse_parent(&bone.name, bone.parent)?;
        let bind = Pose2D::new(
            Vec2::from_array(bone.position),
            bone.rotation,
            Vec2::from_array(bone.scale),
        );
        bones.push(Bone::new(bone.name, parent, bind, bone.length));
    }

    let skeleton = Skeleton::new(doc.name, bones, doc.animations)?;
    log::debug!(
        "loaded skeleton '{}': {} bones, {} animations",
        skeleton.name(),
        skeleton.len(),
        skeleton.animations().len()
    );
    Ok(skeleton)
}

/// Load and validate an animation clip from a JSON document.
///
/// # Errors
///
/// Returns [`AnimError::Json`] for a malformed document,
/// [`AnimError::InvalidData`] for a bone index out of representable
/// range, and [`AnimError::MalformedClip`] for ordering or frame-bound
/// violations.
pub fn load_clip(bytes: &[u8]) -> Result<AnimationClip> {
    let doc: ClipDoc = serde_json::from_slice(bytes)?;

    let mut keyframes = Vec::with_capacity(doc.keyframes.len());
    for keyframe in doc.keyframes {
        let mut keys = Vec::with_capacity(keyframe.bones.len());
        for key in keyframe.bones {
            let bone = u16::try_from(key.bone).map_err(|_| {
                AnimError::InvalidData(format!(
                    "keyframe {}: bone index {} out of range",
                    keyframe.frame, key.bone
                ))
            })?;
            keys.push(BoneKey {
                bone,
                position: key.position.map(Vec2::from_array),
                rotation: key.rotation,
                scale: key.scale.map(Vec2::from_array),
            });
        }
        keyframes.push(Keyframe::new(keyframe.frame, keys)?);
    }

    let clip = AnimationClip::new(doc.name, doc.frame_time, doc.frames, keyframes)?;
    log::debug!(
        "loaded clip '{}': {} frames at {}s, {} keyframes",
        clip.name(),
        clip.frames(),
        clip.frame_time(),
        clip.keyframes().len()
    );
    Ok(clip)
}

fn parse_parent(name: &str, parent: i32) -> Result<Option<u16>> {
    if parent == -1 {
        return Ok(None);
    }
    u16::try_from(parent)
        .map(Some)
        .map_err(|_| AnimError::InvalidData(format!("bone '{name}': bad parent index {parent}")))
}
