//! Animation clip command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
use std::fs;
use std::path::{Path, PathBuf};

use skel2d_anim::{AnimationClip, load_clip, load_skeleton};

#[derive(Subcommand)]
pub enum ClipCommands {
    /// Display information about a clip file
    Info {
        /// Path to the clip JSON file
        file: PathBuf,
    },

    /// Validate a clip file
    Validate {
        /// Path to the clip JSON file
        file: PathBuf,

        /// Also check every bone reference against a skeleton file
        #[arg(long, value_name = "FILE")]
        skeleton: Option<PathBuf>,
    },
}

pub fn execute(command: ClipCommands) -> Result<()> {
    match command {
        ClipCommands::Info { file } => execute_info(file),
        ClipCommands::Validate { file, skeleton } => execute_validate(file, skeleton),
    }
}

fn load(path: &Path) -> Result<AnimationClip> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    load_clip(&bytes).with_context(|| format!("Failed to load clip: {}", path.display()))
}

fn execute_info(path: PathBuf) -> Result<()> {
    let clip = load(&path)?;

    println!("Clip: {}", style(clip.name()).cyan());
    println!(
        "Frames: {} at {:.4}s per frame ({:.2}s total)",
        clip.frames(),
        clip.frame_time(),
        clip.duration()
    );
    println!("Keyframes: {}", clip.keyframes().len());
    for keyframe in clip.keyframes() {
        let bones: Vec<String> = keyframe
            .keys()
            .iter()
            .map(|key| key.bone.to_string())
            .collect();
        println!("  frame {:>4}: bones [{}]", keyframe.frame(), bones.join(", "));
    }

    Ok(())
}

fn execute_validate(path: PathBuf, skeleton_path: Option<PathBuf>) -> Result<()> {
    let clip = match load(&path) {
        Ok(clip) => clip,
        Err(err) => anyhow::bail!("Validation failed: {:#}", err),
    };

    if let Some(skeleton_path) = skeleton_path {
        let bytes = fs::read(&skeleton_path)
            .with_context(|| format!("Failed to open file: {}", skeleton_path.display()))?;
        let skeleton = load_skeleton(&bytes)
            .with_context(|| format!("Failed to load skeleton: {}", skeleton_path.display()))?;

        if let Err(err) = clip.validate_for(&skeleton) {
            anyhow::bail!(
                "Clip '{}' does not bind to skeleton '{}': {}",
                clip.name(),
                skeleton.name(),
                err
            );
        }

        println!(
            "✓ Clip '{}' is valid and binds to skeleton '{}'",
            style(path.display()).cyan(),
            style(skeleton.name()).yellow()
        );
    } else {
        println!(
            "✓ Clip '{}' is valid ({} keyframes)",
            style(path.display()).cyan(),
            clip.keyframes().len()
        );
    }

    Ok(())
}
