//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::filter::SpatialRelation;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// How long a request may wait for a pool slot (default: 5s).
    pub database_acquire_timeout: Duration,

    /// Optional TOML file replacing the built-in category table.
    pub categories_file: Option<PathBuf>,

    /// Spatial relation scoping POIs to a region (default: intersects).
    pub spatial_relation: SpatialRelation,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let database_acquire_timeout = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map(Duration::from_secs)
            .context("DATABASE_ACQUIRE_TIMEOUT_SECS must be a valid u64")?;

        let categories_file = env::var("CATEGORIES_FILE").map(PathBuf::from).ok();

        let spatial_relation = match env::var("SPATIAL_RELATION") {
            Ok(value) => value
                .parse()
                .map_err(anyhow::Error::msg)
                .context("SPATIAL_RELATION must be 'contains' or 'intersects'")?,
            Err(_) => SpatialRelation::default(),
        };

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            database_acquire_timeout,
            categories_file,
            spatial_relation,
            cors_allowed_origins,
        })
    }
}
