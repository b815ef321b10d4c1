use anyhow::Result;
use persistence::DatabaseSession;
use tracing::{debug, error, info, trace};

pub async fn init_database(database_url: &str) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");
    debug!("Database URL: {}", database_url);

    let session = match DatabaseSession::connect(database_url).await {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    session.migrate().await?;

    info!("Database initialization completed successfully!");
    trace!("init_database function completed");

    Ok(())
}
