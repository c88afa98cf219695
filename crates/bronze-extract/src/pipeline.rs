//! Extraction Pipeline Orchestration
//!
//! Owns both database handles and drives a full extraction run: list the
//! source collections, then for each one provision its staging table and
//! copy every document inside a single transaction. A collection either
//! lands completely or not at all; whether a failure stops the whole run
//! is the operator's choice.

use chrono::{DateTime, Utc};
use mongodb::bson::Document;
use mongodb::Client;
use sqlx::PgPool;
use tracing::{error, info};

use crate::config::Config;
use crate::error::Result;
use crate::{db, ingest, schema, source};

/// Outcome of one successfully extracted collection
#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub collection: String,
    pub table: String,
    pub documents: u64,
}

/// A collection that failed to extract
#[derive(Debug, Clone)]
pub struct CollectionFailure {
    pub collection: String,
    pub reason: String,
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Timestamp stamped on every row written during this run
    pub extracted_at: DateTime<Utc>,
    pub completed: Vec<CollectionReport>,
    pub failed: Vec<CollectionFailure>,
}

impl RunSummary {
    /// Total documents written across all completed collections
    pub fn total_documents(&self) -> u64 {
        self.completed.iter().map(|report| report.documents).sum()
    }
}

/// Extraction pipeline from MongoDB to the PostgreSQL staging schema
pub struct Pipeline {
    mongo: Client,
    source_db: String,
    pg: PgPool,
    continue_on_error: bool,
}

impl Pipeline {
    /// Connect to both stores and verify they respond
    pub async fn connect(config: &Config) -> Result<Self> {
        let mongo = source::connect(&config.mongo).await?;
        let pg = db::create_pool(&config.postgres).await?;
        db::health_check(&pg).await?;

        Ok(Self {
            mongo,
            source_db: config.mongo.database.clone(),
            pg,
            continue_on_error: false,
        })
    }

    /// Keep going after a failed collection instead of aborting the run
    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Extract every collection of the source database
    ///
    /// Each collection runs in its own transaction; a failure rolls that
    /// collection back and, in the default mode, aborts the run with the
    /// error. With continue-on-error the failure is recorded in the
    /// summary and the remaining collections still run.
    pub async fn run(&self) -> Result<RunSummary> {
        let database = self.mongo.database(&self.source_db);
        let collections = database.list_collection_names().await?;

        info!(
            database = %self.source_db,
            collections = collections.len(),
            "Starting extraction run"
        );

        let extracted_at = Utc::now();
        let mut summary = RunSummary {
            extracted_at,
            completed: Vec::new(),
            failed: Vec::new(),
        };

        for name in collections {
            match self.extract_collection(&name, extracted_at).await {
                Ok(report) => {
                    info!(
                        collection = %report.collection,
                        table = %report.table,
                        documents = report.documents,
                        "Collection extracted"
                    );
                    summary.completed.push(report);
                }
                Err(err) if self.continue_on_error => {
                    error!(collection = %name, error = %err, "Collection failed, continuing");
                    summary.failed.push(CollectionFailure {
                        collection: name,
                        reason: err.to_string(),
                    });
                }
                Err(err) => {
                    error!(collection = %name, error = %err, "Collection failed, aborting run");
                    return Err(err);
                }
            }
        }

        Ok(summary)
    }

    async fn extract_collection(
        &self,
        name: &str,
        extracted_at: DateTime<Utc>,
    ) -> Result<CollectionReport> {
        let mut tx = self.pg.begin().await?;

        let table = schema::ensure_table(&mut tx, name).await?;

        let collection = self
            .mongo
            .database(&self.source_db)
            .collection::<Document>(name);
        let documents = ingest::ingest(&collection, &table, extracted_at, &mut tx).await?;

        tx.commit().await?;

        Ok(CollectionReport {
            collection: name.to_string(),
            table,
            documents,
        })
    }

    /// Shut down both connections
    pub async fn close(self) {
        self.pg.close().await;
        self.mongo.shutdown().await;
    }
}
