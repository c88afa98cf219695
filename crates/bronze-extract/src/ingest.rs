//! Collection Ingestion
//!
//! Streams every document of a source collection and writes it into the
//! staging table as one JSONB row. Each row carries the run's extraction
//! timestamp and the text form of the document's `_id` so a batch can be
//! traced back to its source.

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::Collection;
use sqlx::{Postgres, Transaction};
use tracing::debug;

use crate::error::{ExtractError, Result};
use crate::normalize::normalize;

/// Copy all documents from `collection` into `table`
///
/// Runs a full scan, normalizes each document, and inserts it inside the
/// caller's transaction. Returns the number of rows written. Any driver
/// or database error aborts the stream and propagates to the caller, who
/// decides whether to roll back.
pub async fn ingest(
    collection: &Collection<Document>,
    table: &str,
    extracted_at: DateTime<Utc>,
    tx: &mut Transaction<'_, Postgres>,
) -> Result<u64> {
    let insert = format!(
        "INSERT INTO {} (data, _extraction_date, _source_file_or_id) VALUES ($1, $2, $3)",
        table
    );

    let mut cursor = collection.find(doc! {}).await?;
    let mut rows: u64 = 0;

    while let Some(document) = cursor.try_next().await? {
        let source_id = source_id_text(&document).ok_or_else(|| {
            ExtractError::MissingDocumentId {
                collection: collection.name().to_string(),
            }
        })?;

        let payload: serde_json::Value = normalize(Bson::Document(document)).into_relaxed_extjson();

        sqlx::query(&insert)
            .bind(sqlx::types::Json(payload))
            .bind(extracted_at)
            .bind(&source_id)
            .execute(&mut **tx)
            .await?;

        rows += 1;
    }

    debug!(collection = collection.name(), rows, "Collection ingested");

    Ok(rows)
}

/// Text form of a document's `_id`
///
/// ObjectId becomes its hex string, a string id is taken as-is, and any
/// other BSON value falls back to its display form. Returns `None` when
/// the document has no `_id` at all.
fn source_id_text(document: &Document) -> Option<String> {
    match document.get("_id")? {
        Bson::ObjectId(id) => Some(id.to_hex()),
        Bson::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
