//! Structured summaries for zoo keeper observations.
//!
//! This crate owns the monitoring summary schema returned by the
//! observation endpoints, the prompt used to produce it, tolerant parsing
//! of model output, and a deterministic keyword summariser used when no
//! model is available.

pub mod prompts;
pub mod summary;

pub use prompts::*;
pub use summary::*;
