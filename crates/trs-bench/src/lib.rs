//! TRS Performance Benchmarks
//!
//! This crate contains benchmarks for the TRS engine:
//! - Base construction and page lookup
//! - Change log ingestion, single and multi-threaded
//! - Change log page lookup while the log grows
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench -p trs-bench
//! ```

pub mod utils;
