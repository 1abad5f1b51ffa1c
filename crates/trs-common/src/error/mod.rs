//! Error handling for the TRS engine.
//!
//! This module provides a unified error type and result alias used
//! across all TRS components.

mod trs;

pub use trs::{ErrorCode, TrsError};

/// Result type alias for TRS operations.
pub type TrsResult<T> = std::result::Result<T, TrsError>;
