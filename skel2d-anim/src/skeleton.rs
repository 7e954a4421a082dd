//! Bone hierarchy: an immutable, index-addressed arena of bones.

use std::collections::HashSet;

use crate::error::{AnimError, Result};
use crate::pose::Pose2D;

/// A single bone in a skeleton.
///
/// Bones are addressed by their dense index (position in the skeleton's
/// bone array). The parent link is an index into the same array, not a
/// reference, so the hierarchy is a flat arena with no back-pointers.
#[derive(Debug, Clone)]
pub struct Bone {
    /// Bone name, unique within the skeleton
    pub name: String,
    /// Index of the parent bone; `None` for a root
    pub parent: Option<u16>,
    /// Rest pose relative to the parent
    pub bind: Pose2D,
    /// Bone length, for visualization and reach queries only
    pub length: f32,
}

impl Bone {
    /// Create a bone from its components
    pub fn new(name: impl Into<String>, parent: Option<u16>, bind: Pose2D, length: f32) -> Self {
        Self {
            name: name.into(),
            parent,
            bind,
            length,
        }
    }
}

/// An immutable bone hierarchy plus the animation names it supports.
///
/// Construction validates the parent graph (no cycles, no dangling
/// indices) and precomputes a parent-before-child evaluation order, so
/// world transforms resolve in a single forward pass with no recursion.
/// Skeletons are loaded once and shared read-only by any number of
/// playback controllers.
#[derive(Debug, Clone)]
pub struct Skeleton {
    name: String,
    bones: Vec<Bone>,
    animations: Vec<String>,
    /// Bone indices ordered so every parent precedes its children
    eval_order: Vec<u16>,
}

impl Skeleton {
    /// Build a skeleton from its bones, validating the hierarchy.
    ///
    /// # Errors
    ///
    /// Returns [`AnimError::InvalidHierarchy`] if a parent index is
    /// dangling, the parent graph contains a cycle, or two bones share
    /// a name, and [`AnimError::InvalidData`] if a bone length is
    /// negative.
    pub fn new(
        name: impl Into<String>,
        bones: Vec<Bone>,
        animations: Vec<String>,
    ) -> Result<Self> {
        if bones.len() > usize::from(u16::MAX) {
            return Err(AnimError::InvalidHierarchy(format!(
                "too many bones: {} (limit {})",
                bones.len(),
                u16::MAX
            )));
        }

        let mut names = HashSet::with_capacity(bones.len());
        for (index, bone) in bones.iter().enumerate() {
            if let Some(parent) = bone.parent {
                if usize::from(parent) >= bones.len() {
                    return Err(AnimError::InvalidHierarchy(format!(
                        "bone {index} ('{}') references missing parent {parent}",
                        bone.name
                    )));
                }
            }
            if bone.length < 0.0 {
                return Err(AnimError::InvalidData(format!(
                    "bone {index} ('{}') has negative length {}",
                    bone.name, bone.length
                )));
            }
            if !names.insert(bone.name.as_str()) {
                return Err(AnimError::InvalidHierarchy(format!(
                    "duplicate bone name '{}'",
                    bone.name
                )));
            }
        }

        let eval_order = topological_order(&bones)?;

        Ok(Self {
            name: name.into(),
            bones,
            animations,
            eval_order,
        })
    }

    /// Skeleton name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All bones, in index order
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Bone at `index`, if present
    pub fn bone(&self, index: u16) -> Option<&Bone> {
        self.bones.get(usize::from(index))
    }

    /// Look up a bone index by name
    pub fn bone_index(&self, name: &str) -> Option<u16> {
        self.bones
            .iter()
            .position(|bone| bone.name == name)
            .map(|index| index as u16)
    }

    /// Number of bones
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    /// Whether the skeleton has no bones
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Names of the animations this skeleton supports
    pub fn animations(&self) -> &[String] {
        &self.animations
    }

    /// Whether `name` is among the skeleton's supported animations
    pub fn supports_animation(&self, name: &str) -> bool {
        self.animations.iter().any(|animation| animation == name)
    }

    /// Compose per-bone local poses through the hierarchy into world
    /// transforms, one per bone, indexed identically to [`bones`].
    ///
    /// [`bones`]: Self::bones
    ///
    /// # Panics
    ///
    /// Panics if `locals.len() != self.len()`.
    pub fn resolve_world_transforms(&self, locals: &[Pose2D]) -> Vec<Pose2D> {
        let mut world = Vec::new();
        self.resolve_world_transforms_into(locals, &mut world);
        world
    }

    /// As [`resolve_world_transforms`], writing into a caller-owned
    /// buffer to avoid a per-tick allocation.
    ///
    /// [`resolve_world_transforms`]: Self::resolve_world_transforms
    ///
    /// # Panics
    ///
    /// Panics if `locals.len() != self.len()`.
    pub fn resolve_world_transforms_into(&self, locals: &[Pose2D], out: &mut Vec<Pose2D>) {
        assert_eq!(
            locals.len(),
            self.bones.len(),
            "local pose count must match bone count"
        );

        out.clear();
        out.resize(self.bones.len(), Pose2D::IDENTITY);

        // eval_order guarantees every parent's world transform is
        // already written when its children are visited
        for &index in &self.eval_order {
            let i = usize::from(index);
            out[i] = match self.bones[i].parent {
                Some(parent) => out[usize::from(parent)].compose(&locals[i]),
                None => locals[i],
            };
        }
    }

    /// Local poses of the rest pose, in index order
    pub fn bind_locals(&self) -> Vec<Pose2D> {
        self.bones.iter().map(|bone| bone.bind).collect()
    }
}

/// Order bone indices so parents come before children, rejecting cycles.
///
/// Parents at a later index than their children are legal in the data
/// model, so insertion order cannot be assumed to be evaluation order.
fn topological_order(bones: &[Bone]) -> Result<Vec<u16>> {
    let mut children: Vec<Vec<u16>> = vec![Vec::new(); bones.len()];
    let mut order = Vec::with_capacity(bones.len());

    for (index, bone) in bones.iter().enumerate() {
        match bone.parent {
            Some(parent) => children[usize::from(parent)].push(index as u16),
            None => order.push(index as u16),
        }
    }

    let mut cursor = 0;
    while cursor < order.len() {
        let current = order[cursor];
        cursor += 1;
        order.extend_from_slice(&children[usize::from(current)]);
    }

    if order.len() != bones.len() {
        return Err(AnimError::InvalidHierarchy(format!(
            "parent graph contains a cycle ({} of {} bones reachable from roots)",
            order.len(),
            bones.len()
        )));
    }

    Ok(order)
}
