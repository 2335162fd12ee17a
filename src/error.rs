use std::fmt;
use thiserror::Error;

/// Which upgrade table a selection referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKind {
    Ai,
    Storage,
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierKind::Ai => write!(f, "AI detection"),
            TierKind::Storage => write!(f, "storage"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
    #[error("Unknown {kind} tier: {tier}")]
    UnknownTier { kind: TierKind, tier: String },
    #[error("Unknown addon: {0}")]
    UnknownAddon(String),
    #[error("Package not found: {0}")]
    PackageNotFound(String),
    #[error("Invalid discount predicate: {0}")]
    InvalidPredicate(String),
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PricingError {
    /// True for errors caused by the caller's input rather than by the catalog
    /// or the environment. These are answered, never retried or logged as faults.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PricingError::InvalidSelection(_)
                | PricingError::UnknownTier { .. }
                | PricingError::UnknownAddon(_)
                | PricingError::PackageNotFound(_)
                | PricingError::JsonError(_)
        )
    }

    /// HTTP status the error maps to at a request boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            PricingError::PackageNotFound(_) => 404,
            e if e.is_client_error() => 400,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, PricingError>;
