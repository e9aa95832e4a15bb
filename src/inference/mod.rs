//! # Inference Invocation
//!
//! Wraps the external lip-sync tool. [`InferenceCommand`] turns a
//! [`JobSpec`](crate::planning::JobSpec) into an argument vector and
//! [`InferenceRunner`] executes it, reducing the outcome to a [`RunResult`].

pub mod command;
pub mod runner;

pub use command::InferenceCommand;
pub use runner::{InferenceRunner, ProcessRunner, RunResult};
