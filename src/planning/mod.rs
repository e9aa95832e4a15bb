//! # Job Planning
//!
//! Turns the discovered audio and video lists into an ordered list of
//! [`JobSpec`]s. All randomness comes from a single RNG owned by the
//! [`JobPlanner`], seeded once when a reproducibility seed is configured.

pub mod planner;
pub mod types;

pub use planner::JobPlanner;
pub use types::{InferenceParams, JobSpec, UsedVideoSet};
