//! Type definitions for the TRS engine.
//!
//! This module contains the core value types shared by the engine and its
//! tooling.

mod ids;
mod timestamps;

pub use ids::{Feed, Order};
pub use timestamps::Timestamp;
