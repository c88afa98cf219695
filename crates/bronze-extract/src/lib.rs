//! Bronze Extract
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Batch extraction from MongoDB into a PostgreSQL staging schema.
//!
//! Every collection of the configured source database is copied into a
//! `bronze.raw_<collection>` table as JSONB rows, one row per document,
//! stamped with the run's extraction timestamp and the source `_id`.
//! ObjectIds are rewritten to hex strings on the way through so the
//! stored JSON is plain.
//!
//! # Example
//!
//! ```no_run
//! use bronze_extract::{Config, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pipeline = Pipeline::connect(&config).await?;
//!     let summary = pipeline.run().await?;
//!     pipeline.close().await;
//!     println!("{} documents staged", summary.total_documents());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod normalize;
pub mod pipeline;
pub mod schema;
pub mod source;

pub use config::{Config, MongoConfig, PostgresConfig};
pub use error::{ExtractError, Result};
pub use normalize::normalize;
pub use pipeline::{CollectionFailure, CollectionReport, Pipeline, RunSummary};
