use tracing::warn;

/// Database URL used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://clinicrecords.db?mode=rwc";

/// Connection settings for a [`crate::DatabaseSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    /// Pool size; left to the driver default when unset.
    pub max_connections: Option<u32>,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: None,
        }
    }

    /// Reads `DATABASE_URL` and `DATABASE_MAX_CONNECTIONS`, loading `.env` first.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let max_connections = lookup("DATABASE_MAX_CONNECTIONS").and_then(|raw| {
            match raw.trim().parse::<u32>() {
                Ok(0) | Err(_) => {
                    warn!("Ignoring invalid DATABASE_MAX_CONNECTIONS value: {}", raw);
                    None
                }
                Ok(n) => Some(n),
            }
        });

        Self {
            url,
            max_connections,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL)
    }
}
