//! # trs-common
//!
//! Common types, errors, and configuration for the TRS engine.
//!
//! This crate provides the foundational pieces shared by the engine and its
//! tooling:
//!
//! - **Types**: change-event ordering (`Order`), the feed selector (`Feed`),
//!   and wall-clock `Timestamp`s
//! - **Errors**: unified error handling with `TrsError` and stable `ErrorCode`s
//! - **Config**: the `EngineConfig` used to construct an engine
//! - **Constants**: page size defaults and URI layout constants
//!
//! ## Example
//!
//! ```rust
//! use trs_common::config::EngineConfig;
//! use trs_common::error::TrsResult;
//!
//! fn example() -> TrsResult<()> {
//!     let config = EngineConfig::new("http://localhost:1337/trs/")?
//!         .with_base_page_size(5)
//!         .with_changelog_page_size(5);
//!     config.validate()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at the crate root
pub use config::EngineConfig;
pub use constants::*;
pub use error::{ErrorCode, TrsError, TrsResult};
pub use types::{Feed, Order, Timestamp};
