use anyhow::{Context, Result};
use persistence::DatabaseSession;
use tracing::{debug, info, trace};

/// Applies migrations and runs the fixture script against `database_url`.
pub async fn load_fixture(fixture: &str, database_url: &str) -> Result<usize> {
    trace!("Entering load_fixture function");
    debug!("Database URL: {}", database_url);

    let session = DatabaseSession::connect(database_url)
        .await
        .with_context(|| format!("connecting to {database_url}"))?;
    session.migrate().await?;

    let executed = session
        .run_sql_file(fixture)
        .await
        .with_context(|| format!("loading fixture {fixture}"))?;

    info!("Fixture {} applied ({} statements)", fixture, executed);
    Ok(executed)
}
