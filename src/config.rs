use anyhow::Result;
use persistence::{DatabaseConfig, DatabaseSession};

use crate::schemas::AppState;

/// Initialize application state for an explicit database URL.
///
/// The pool size still comes from `DATABASE_MAX_CONNECTIONS`. Pending
/// migrations are applied before the state is handed out.
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    let config = DatabaseConfig {
        url: database_url.to_string(),
        ..DatabaseConfig::from_env()
    };

    tracing::info!("Connecting to database: {}", config.url);
    let session = DatabaseSession::connect_with_config(&config).await?;
    session.migrate().await?;

    Ok(AppState {
        db: session.into_connection(),
    })
}
