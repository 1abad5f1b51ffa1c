//! Configuration for the TRS engine.
//!
//! This module provides the construction-time configuration of an engine.

mod engine;

pub use engine::EngineConfig;
