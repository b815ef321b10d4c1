//! Database session provider.
//!
//! A [`DatabaseSession`] is opened explicitly (per command, per test) and
//! handed to the DAOs that need it. Dropping it releases the pool.

use std::path::Path;

use migration::{Migrator, MigratorTrait};
use model::entities::prelude::{Patient, PatientProcedure, Role, User};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, EntityName,
};
use tracing::{debug, error, info, trace};

use crate::config::DatabaseConfig;
use crate::dao::GenericDao;
use crate::error::{DaoError, Result};
use crate::mapping::MappedEntity;

/// Owns the connection pool shared by every DAO built from it.
#[derive(Debug, Clone)]
pub struct DatabaseSession {
    db: DatabaseConnection,
}

impl DatabaseSession {
    /// Connects to `url`, switching on foreign keys for SQLite.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_config(&DatabaseConfig::new(url)).await
    }

    pub async fn connect_with_config(config: &DatabaseConfig) -> Result<Self> {
        trace!("Entering DatabaseSession::connect_with_config");
        debug!("Database URL: {}", config.url);

        let mut options = ConnectOptions::new(config.url.clone());
        if let Some(max) = config.max_connections {
            debug!("Limiting pool to {} connections", max);
            options.max_connections(max);
        }

        let db = match Database::connect(options).await {
            Ok(db) => {
                info!("Successfully connected to database");
                db
            }
            Err(e) => {
                error!("Failed to connect to database '{}': {}", config.url, e);
                return Err(e.into());
            }
        };

        if db.get_database_backend() == DbBackend::Sqlite {
            trace!("Enabling SQLite foreign key enforcement");
            db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
        }

        Ok(Self { db })
    }

    /// Wraps an already open connection.
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Applies every pending migration.
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations");
        match Migrator::up(&self.db, None).await {
            Ok(()) => {
                debug!("All pending migrations have been applied");
                Ok(())
            }
            Err(e) => {
                error!("Failed to run database migrations: {}", e);
                Err(e.into())
            }
        }
    }

    /// Runs a SQL script one statement at a time and returns how many
    /// statements were executed.
    ///
    /// Lines starting with `--` are comments. Statements are separated by
    /// `;`, so string literals must not contain semicolons.
    pub async fn run_sql(&self, script: &str) -> Result<usize> {
        let statements = split_statements(script);
        debug!("Executing SQL script with {} statements", statements.len());

        for (index, statement) in statements.iter().enumerate() {
            trace!("Statement {}: {}", index + 1, statement);
            if let Err(e) = self.db.execute_unprepared(statement).await {
                error!("Statement {} failed: {}", index + 1, e);
                return Err(DaoError::Fixture(format!(
                    "statement {} failed: {} ({})",
                    index + 1,
                    e,
                    statement
                )));
            }
        }

        self.reset_sequences().await?;
        Ok(statements.len())
    }

    /// Moves every id sequence past the highest stored id.
    ///
    /// Scripts insert rows with explicit ids, which Postgres sequences do
    /// not see. SQLite derives the next id from the table itself.
    async fn reset_sequences(&self) -> Result<()> {
        for statement in sequence_reset_statements(self.db.get_database_backend()) {
            trace!("Resetting sequence: {}", statement);
            self.db.execute_unprepared(&statement).await.map_err(|e| {
                error!("Sequence reset failed: {}", e);
                DaoError::Fixture(format!("sequence reset failed: {} ({})", e, statement))
            })?;
        }
        Ok(())
    }

    /// Reads a SQL script from disk and runs it, see [`Self::run_sql`].
    pub async fn run_sql_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        info!("Running SQL script {}", path.display());
        let script = std::fs::read_to_string(path).inspect_err(|e| {
            error!("Failed to read SQL script {}: {}", path.display(), e);
        })?;
        self.run_sql(&script).await
    }

    /// Builds a DAO for `E` on this session's connection.
    pub fn dao<E>(&self) -> GenericDao<E>
    where
        E: MappedEntity,
    {
        GenericDao::new(self.db.clone())
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn into_connection(self) -> DatabaseConnection {
        self.db
    }

    /// Checks that the store is reachable.
    pub async fn ping(&self) -> Result<()> {
        self.db.ping().await?;
        Ok(())
    }
}

fn sequence_reset_statements(backend: DbBackend) -> Vec<String> {
    if backend != DbBackend::Postgres {
        return Vec::new();
    }

    [
        User.table_name().to_string(),
        Role.table_name().to_string(),
        Patient.table_name().to_string(),
        PatientProcedure.table_name().to_string(),
    ]
    .iter()
    .map(|table| {
        format!(
            "SELECT setval(pg_get_serial_sequence('\"{table}\"', 'id'), \
             COALESCE(MAX(id), 1), MAX(id) IS NOT NULL) FROM \"{table}\""
        )
    })
    .collect()
}

fn split_statements(script: &str) -> Vec<String> {
    let without_comments: String = script
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    without_comments
        .split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .map(str::to_string)
        .collect()
}
