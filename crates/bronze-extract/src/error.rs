//! Error types for the extraction pipeline

use thiserror::Error;

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractError {
    /// MongoDB driver error (connection, cursor, command)
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// PostgreSQL error (pool, DDL, insert)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Collection name is not a safe SQL identifier
    #[error("Invalid collection name: {0}")]
    InvalidCollectionName(String),

    /// Source document has no `_id` field
    #[error("Document without _id in collection: {collection}")]
    MissingDocumentId { collection: String },
}
