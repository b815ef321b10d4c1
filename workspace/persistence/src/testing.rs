//! Shared helpers for tests that need a database in a known state.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::session::DatabaseSession;

/// The standard fixture: 2 users, 3 roles, 3 patients, 7 procedures.
pub const CLEAN_PATIENT_DB: &str = include_str!("../fixtures/cleanpatientdb.sql");

/// Path of a script in this crate's `fixtures/` directory.
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// Opens a fresh in-memory database, applies the schema and loads
/// [`CLEAN_PATIENT_DB`].
pub async fn setup_fixture_db() -> Result<DatabaseSession> {
    let session = DatabaseSession::connect("sqlite::memory:").await?;
    session.migrate().await?;
    session.run_sql(CLEAN_PATIENT_DB).await?;
    debug!("Fixture database ready");
    Ok(session)
}
