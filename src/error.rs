//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`CatalogError`], [`ConfigError`]), while the CLI uses `anyhow` at
//! the outermost boundary.
//!
//! # Example
//!
//! ```ignore
//! use artist_explorer::error::{Result, ResultExt};
//!
//! fn open(path: &Path) -> Result<Config> {
//!     let config = config::load_from(path)?; // ConfigError auto-converts
//!     Ok(config)
//! }
//! ```

use crate::catalog::CatalogError;
use crate::config::ConfigError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog, authentication or transport failure
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Config file could not be read or written
    #[error("Config file error: {0}")]
    ConfigFile(#[from] ConfigError),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// Whether the error comes from missing or rejected credentials
    pub fn is_credentials(&self) -> bool {
        match self {
            Self::Catalog(e) => matches!(
                e,
                CatalogError::MissingCredentials(_) | CatalogError::Authentication { .. }
            ),
            Self::WithContext { source, .. } => source.is_credentials(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, CatalogError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Catalog(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, ConfigError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::ConfigFile(e).context(ctx))
    }
}
