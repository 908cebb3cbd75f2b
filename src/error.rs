use std::path::PathBuf;

use thiserror::Error;

use crate::models::ItemId;

/// Error type for catalog browser operations.
///
/// - `Transport`: network/connectivity failures (from `reqwest::Error`)
/// - `Service`: any non-2xx status from the catalog service
/// - `NotFound`: single-item lookup with no matching identifier
/// - `Decode`: a response body that does not match the expected shape
/// - `PersistenceRead` / `PersistenceWrite`: preference storage failures
/// - `Config`: unreadable or invalid configuration
///
/// Cancellation of a superseded fetch is not an error and has no variant.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Request failed: {message}")]
    Transport { message: String },

    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("Product not found")]
    NotFound { id: ItemId },

    #[error("Malformed response: {details}")]
    Decode { details: String },

    #[error("Preferences unreadable at {}: {details}", path.display())]
    PersistenceRead { path: PathBuf, details: String },

    #[error("Preferences not written to {}: {details}", path.display())]
    PersistenceWrite { path: PathBuf, details: String },

    #[error("Invalid configuration: {details}")]
    Config { details: String },
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Transport {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_reads_as_product_not_found() {
        let err = CatalogError::NotFound { id: 42 };
        assert_eq!(err.to_string(), "Product not found");
    }

    #[test]
    fn service_error_displays_its_message() {
        let err = CatalogError::Service {
            status: 503,
            message: "Failed to fetch products (HTTP 503)".into(),
        };
        assert_eq!(err.to_string(), "Failed to fetch products (HTTP 503)");
    }

    #[test]
    fn transport_error_is_prefixed() {
        let err = CatalogError::Transport {
            message: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "Request failed: connection refused");
    }
}
