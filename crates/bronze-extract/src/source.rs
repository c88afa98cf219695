//! Source MongoDB Connector
//!
//! Builds a typed client from configuration and verifies the server is
//! reachable with a ping before any extraction starts. Credentials go
//! through the driver's option types rather than a connection string, so
//! special characters in passwords never need escaping.

use mongodb::bson::doc;
use mongodb::options::{ClientOptions, Credential, ServerAddress};
use mongodb::Client;
use std::time::Duration;
use tracing::info;

use crate::config::MongoConfig;
use crate::error::Result;

/// Connect to the source MongoDB instance and verify liveness
pub async fn connect(config: &MongoConfig) -> Result<Client> {
    let mut options = ClientOptions::builder()
        .hosts(vec![ServerAddress::Tcp {
            host: config.host.clone(),
            port: Some(config.port),
        }])
        .build();

    options.app_name = Some("bronze-extract".to_string());
    options.server_selection_timeout =
        Some(Duration::from_millis(config.server_selection_timeout_ms));

    // Local test instances run without auth; only attach credentials
    // when a user is configured.
    if !config.user.is_empty() {
        options.credential = Some(
            Credential::builder()
                .username(config.user.clone())
                .password(config.password.clone())
                .source("admin".to_string())
                .build(),
        );
    }

    let client = Client::with_options(options)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;

    info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        "Connected to source MongoDB"
    );

    Ok(client)
}
