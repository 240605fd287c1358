//! Headless driver for the steering simulation.
//!
//! Loads a scene and tuning settings from JSON, runs a fixed number of ticks
//! and streams the agent state as JSON lines.

pub mod config;
pub mod sim;

pub use config::{apply_overrides, load_scene, load_settings, Toggle};
pub use sim::{run, Mode, RunOptions, Simulation, TargetScript, CROWD_CAPACITY};
