use std::io;
use thiserror::Error;

/// Error types for skeleton and clip loading, validation, and binding
#[derive(Error, Debug)]
pub enum AnimError {
    /// I/O Error during reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON in a skeleton or clip document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Cycle or dangling parent reference in a skeleton's bone graph
    #[error("Invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    /// Clip violates its structural invariants (keyframe ordering,
    /// frame bounds, frame timing)
    #[error("Malformed clip: {0}")]
    MalformedClip(String),

    /// A keyframe references a bone index the bound skeleton does not have
    #[error("Unknown bone reference: bone {bone} not in skeleton ({bone_count} bones)")]
    UnknownBoneReference { bone: u16, bone_count: usize },

    /// A document field is out of range or inconsistent with its position
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type using AnimError
pub type Result<T> = std::result::Result<T, AnimError>;
