//! Common utilities for the tessel style engine.
//!
//! This crate provides shared infrastructure used by all engine components:
//! - **Warning System** - colored, deduplicated terminal output for stylesheet problems
//! - **Logging** - `tracing` subscriber setup for binaries

pub mod logging;
pub mod warning;
