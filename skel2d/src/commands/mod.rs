//! Command implementations for each asset kind

pub mod clip;
pub mod sample;
pub mod skeleton;
