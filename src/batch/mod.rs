//! # Batch Engine
//!
//! Drives discovery, planning, execution and reporting for one run.

pub mod engine;

pub use engine::BatchEngine;
