//! Staging Schema Provisioning
//!
//! Derives staging table names from source collection names and creates
//! the schema and tables on demand. Collection names are interpolated
//! into DDL, so they are validated against a strict identifier allow-list
//! before any SQL is built from them.

use sqlx::{Postgres, Transaction};

use crate::error::{ExtractError, Result};

/// Schema that holds the raw staging tables
pub const STAGING_SCHEMA: &str = "bronze";

/// Prefix applied to every staging table name
pub const TABLE_PREFIX: &str = "raw_";

// PostgreSQL truncates identifiers at 63 bytes; leave room for the prefix.
const MAX_COLLECTION_NAME_LEN: usize = 59;

/// Validate that a collection name is safe to use as an SQL identifier
///
/// Accepts ASCII letters, digits, and underscores, with a leading letter
/// or underscore. Anything else is rejected before it reaches DDL.
pub fn validate_collection_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ExtractError::InvalidCollectionName(
            "empty collection name".to_string(),
        ));
    }

    if name.len() > MAX_COLLECTION_NAME_LEN {
        return Err(ExtractError::InvalidCollectionName(format!(
            "{} (longer than {} characters)",
            name, MAX_COLLECTION_NAME_LEN
        )));
    }

    // Check for valid characters
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ExtractError::InvalidCollectionName(name.to_string()));
    }

    // Check leading character
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ExtractError::InvalidCollectionName(name.to_string()));
    }

    Ok(())
}

/// Derive the schema-qualified staging table name for a collection
pub fn table_name(collection: &str) -> Result<String> {
    validate_collection_name(collection)?;
    Ok(format!(
        "{}.{}{}",
        STAGING_SCHEMA, TABLE_PREFIX, collection
    ))
}

/// Ensure the staging schema and table for `collection` exist
///
/// Runs idempotent DDL inside the caller's transaction and returns the
/// qualified table name. Re-running against an existing table is a no-op.
pub async fn ensure_table(
    tx: &mut Transaction<'_, Postgres>,
    collection: &str,
) -> Result<String> {
    let table = table_name(collection)?;

    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", STAGING_SCHEMA))
        .execute(&mut **tx)
        .await?;

    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id BIGSERIAL PRIMARY KEY,
            data JSONB,
            _extraction_date TIMESTAMPTZ,
            _source_file_or_id TEXT
        )
        "#,
        table
    );
    sqlx::query(&ddl).execute(&mut **tx).await?;

    Ok(table)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_collection_names() {
        assert!(validate_collection_name("users").is_ok());
        assert!(validate_collection_name("order_items").is_ok());
        assert!(validate_collection_name("_internal").is_ok());
        assert!(validate_collection_name("v2_events").is_ok());
    }

    #[test]
    fn test_invalid_collection_names() {
        assert!(validate_collection_name("").is_err());
        assert!(validate_collection_name("user-profiles").is_err());
        assert!(validate_collection_name("users; DROP TABLE x").is_err());
        assert!(validate_collection_name("2fast").is_err());
        assert!(validate_collection_name("sérvice").is_err());
        assert!(validate_collection_name("a b").is_err());
    }

    #[test]
    fn test_length_cap() {
        let at_limit = "a".repeat(MAX_COLLECTION_NAME_LEN);
        assert!(validate_collection_name(&at_limit).is_ok());

        let over_limit = "a".repeat(MAX_COLLECTION_NAME_LEN + 1);
        assert!(validate_collection_name(&over_limit).is_err());
    }

    #[test]
    fn test_table_name_derivation() {
        assert_eq!(table_name("users").unwrap(), "bronze.raw_users");
        assert_eq!(table_name("order_items").unwrap(), "bronze.raw_order_items");
    }

    #[test]
    fn test_table_name_rejects_invalid() {
        assert!(matches!(
            table_name("no-dashes"),
            Err(ExtractError::InvalidCollectionName(_))
        ));
    }
}
