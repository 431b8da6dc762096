//! Database and media storage settings.

use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::env;
use thiserror::Error;

/// Environment variable naming the `PostgreSQL` connection string.
const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Environment variable sizing the connection pool.
const DATABASE_POOL_SIZE_VAR: &str = "DATABASE_POOL_SIZE";
/// Environment variable naming the attachment storage directory.
const MEDIA_ROOT_VAR: &str = "MEDIA_ROOT";
/// Pool size applied when `DATABASE_POOL_SIZE` is unset.
const DEFAULT_POOL_SIZE: u32 = 10;

/// `PostgreSQL` connection pool shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Errors returned while building the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is unset.
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),

    /// An environment variable holds an unusable value.
    #[error("invalid value for {name}: {reason}")]
    InvalidVar {
        /// Variable name.
        name: &'static str,
        /// Parse failure detail.
        reason: String,
    },

    /// Pool construction failed.
    #[error("could not build connection pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    /// Media directory could not be opened.
    #[error("could not open media root: {0}")]
    Media(#[from] std::io::Error),
}

/// `PostgreSQL` connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    url: String,
    pool_size: u32,
}

impl DatabaseConfig {
    /// Builds the configuration from `DATABASE_URL` and, optionally,
    /// `DATABASE_POOL_SIZE`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] when `DATABASE_URL` is unset
    /// and [`ConfigError::InvalidVar`] when the pool size does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url =
            env::var(DATABASE_URL_VAR).map_err(|_| ConfigError::MissingVar(DATABASE_URL_VAR))?;
        let pool_size = match env::var(DATABASE_POOL_SIZE_VAR) {
            Ok(raw) => raw.parse().map_err(|err: std::num::ParseIntError| {
                ConfigError::InvalidVar {
                    name: DATABASE_POOL_SIZE_VAR,
                    reason: err.to_string(),
                }
            })?,
            Err(_) => DEFAULT_POOL_SIZE,
        };
        Ok(Self { url, pool_size })
    }

    /// Creates a configuration from explicit values.
    #[must_use]
    pub const fn new(url: String, pool_size: u32) -> Self {
        Self { url, pool_size }
    }

    /// Returns the connection string.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the pool size.
    #[must_use]
    pub const fn pool_size(&self) -> u32 {
        self.pool_size
    }

    /// Builds the shared connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pool`] when the pool cannot be constructed.
    pub fn build_pool(&self) -> Result<PgPool, ConfigError> {
        let manager = ConnectionManager::<PgConnection>::new(&self.url);
        Ok(Pool::builder().max_size(self.pool_size).build(manager)?)
    }
}

/// Attachment storage settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaConfig {
    root: String,
}

impl MediaConfig {
    /// Builds the configuration from `MEDIA_ROOT`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] when `MEDIA_ROOT` is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let root =
            env::var(MEDIA_ROOT_VAR).map_err(|_| ConfigError::MissingVar(MEDIA_ROOT_VAR))?;
        Ok(Self { root })
    }

    /// Creates a configuration from an explicit path.
    #[must_use]
    pub const fn new(root: String) -> Self {
        Self { root }
    }

    /// Returns the storage directory path.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Opens the storage directory as a capability-scoped handle.
    ///
    /// The directory must already exist; attachment adapters receive the
    /// handle and can never reach outside it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Media`] when the directory cannot be opened.
    pub fn open_root(&self) -> Result<Dir, ConfigError> {
        Ok(Dir::open_ambient_dir(&self.root, ambient_authority())?)
    }
}
