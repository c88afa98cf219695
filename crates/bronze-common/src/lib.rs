//! Bronze Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared plumbing for the bronze extraction tools.
//!
//! # Overview
//!
//! This crate provides functionality used across the workspace members:
//!
//! - **Logging**: Centralized tracing configuration and initialization
//!
//! # Example
//!
//! ```no_run
//! use bronze_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     let _guard = init_logging(&config)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

pub mod logging;
