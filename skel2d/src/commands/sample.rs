//! Pose sampling command implementation

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use std::fs;
use std::path::PathBuf;

use skel2d_anim::{LoopMode, evaluate_pose, load_clip, load_skeleton};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LoopModeArg {
    Once,
    Loop,
    PingPong,
}

impl From<LoopModeArg> for LoopMode {
    fn from(mode: LoopModeArg) -> Self {
        match mode {
            LoopModeArg::Once => LoopMode::Once,
            LoopModeArg::Loop => LoopMode::Loop,
            LoopModeArg::PingPong => LoopMode::PingPong,
        }
    }
}

#[derive(Args)]
pub struct SampleArgs {
    /// Path to the skeleton JSON file
    pub skeleton: PathBuf,

    /// Path to the clip JSON file
    pub clip: PathBuf,

    /// Playback time in seconds to sample at
    #[arg(short, long, default_value_t = 0.0)]
    pub time: f32,

    /// Loop mode applied when the time leaves the clip
    #[arg(long, value_enum, default_value = "loop")]
    pub loop_mode: LoopModeArg,
}

pub fn execute(args: SampleArgs) -> Result<()> {
    let bytes = fs::read(&args.skeleton)
        .with_context(|| format!("Failed to open file: {}", args.skeleton.display()))?;
    let skeleton = load_skeleton(&bytes)
        .with_context(|| format!("Failed to load skeleton: {}", args.skeleton.display()))?;

    let bytes = fs::read(&args.clip)
        .with_context(|| format!("Failed to open file: {}", args.clip.display()))?;
    let clip = load_clip(&bytes)
        .with_context(|| format!("Failed to load clip: {}", args.clip.display()))?;

    clip.validate_for(&skeleton).with_context(|| {
        format!(
            "Clip '{}' does not bind to skeleton '{}'",
            clip.name(),
            skeleton.name()
        )
    })?;

    let position = clip.sample_time(args.time, args.loop_mode.into());
    let world = evaluate_pose(&skeleton, &clip, position.frame);

    println!(
        "Clip '{}' at t={:.3}s -> frame {:.3}{}",
        style(clip.name()).cyan(),
        args.time,
        position.frame,
        if position.finished { " (finished)" } else { "" }
    );
    println!("{:>4}  {:<16} {:>18} {:>10} {:>16}", "bone", "name", "position", "rotation", "scale");
    for (index, pose) in world.iter().enumerate() {
        let name = skeleton
            .bone(index as u16)
            .map_or("?", |bone| bone.name.as_str());
        println!(
            "{index:>4}  {name:<16} ({:>7.3}, {:>7.3}) {:>10.4} ({:>6.3}, {:>6.3})",
            pose.position.x, pose.position.y, pose.rotation, pose.scale.x, pose.scale.y
        );
    }

    Ok(())
}
