//! Skeleton asset command implementations

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
use std::fs;
use std::path::{Path, PathBuf};

use skel2d_anim::{Skeleton, load_skeleton};

#[derive(Subcommand)]
pub enum SkeletonCommands {
    /// Display information about a skeleton file
    Info {
        /// Path to the skeleton JSON file
        file: PathBuf,
    },

    /// Validate a skeleton file
    Validate {
        /// Path to the skeleton JSON file
        file: PathBuf,
    },
}

pub fn execute(command: SkeletonCommands) -> Result<()> {
    match command {
        SkeletonCommands::Info { file } => execute_info(file),
        SkeletonCommands::Validate { file } => execute_validate(file),
    }
}

fn load(path: &Path) -> Result<Skeleton> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    load_skeleton(&bytes).with_context(|| format!("Failed to load skeleton: {}", path.display()))
}

fn execute_info(path: PathBuf) -> Result<()> {
    let skeleton = load(&path)?;

    println!("Skeleton: {}", style(skeleton.name()).cyan());
    println!("Bones: {}", skeleton.len());
    for (index, bone) in skeleton.bones().iter().enumerate() {
        let parent = match bone.parent {
            Some(parent) => format!("parent {parent}"),
            None => "root".to_string(),
        };
        println!(
            "  [{index}] {} ({parent}, length {:.2})",
            style(&bone.name).green(),
            bone.length
        );
    }

    if skeleton.animations().is_empty() {
        println!("Animations: none");
    } else {
        println!("Animations: {}", skeleton.animations().join(", "));
    }

    Ok(())
}

fn execute_validate(path: PathBuf) -> Result<()> {
    match load(&path) {
        Ok(skeleton) => {
            println!(
                "✓ Skeleton '{}' is valid ({} bones)",
                style(path.display()).cyan(),
                skeleton.len()
            );
            Ok(())
        }
        Err(err) => {
            anyhow::bail!("Validation failed: {:#}", err);
        }
    }
}
