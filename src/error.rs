//! Error types for the card renderer

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which image a failed fetch was resolving.
///
/// The primary author has no fallback image, while the original author of a
/// reshare only falls back to a placeholder when no reference exists at all.
/// Keeping the role on the error lets callers tell those cases apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRole {
    PrimaryAvatar,
    PrimaryMedia(usize),
    OriginalAvatar,
    OriginalMedia,
}

impl fmt::Display for FetchRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchRole::PrimaryAvatar => write!(f, "author avatar"),
            FetchRole::PrimaryMedia(i) => write!(f, "media image #{}", i + 1),
            FetchRole::OriginalAvatar => write!(f, "original author avatar"),
            FetchRole::OriginalMedia => write!(f, "original post media"),
        }
    }
}

/// Mutable template regions that a gallery write depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    GalleryContainer,
    SlotRules,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::GalleryContainer => write!(f, "empty gallery-container element"),
            Region::SlotRules => write!(f, ".img-N style rules"),
        }
    }
}

/// Errors that can occur while rendering a card
#[derive(Error, Debug)]
pub enum Error {
    /// The post record is missing data every card needs
    #[error("Invalid post record: {0}")]
    InvalidPost(String),

    /// No template exists for the variant/theme pair
    #[error("Template not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    /// A template lacks a region the renderer has to rewrite
    #[error("Template {} has no {region}", path.display())]
    MissingRegion { path: PathBuf, region: Region },

    /// An image could not be fetched
    #[error("Failed to fetch {role} from '{url}': {reason}")]
    FetchError {
        role: FetchRole,
        url: String,
        reason: String,
    },

    /// Failed to write a rendered card
    #[error("Failed to write card: {0}")]
    WriteError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Attach a role to a collaborator failure.
    pub(crate) fn fetch(role: FetchRole, url: &str, err: Error) -> Self {
        let reason = match err {
            Error::FetchError { reason, .. } => reason,
            Error::NetworkError(msg) => msg,
            other => other.to_string(),
        };
        Error::FetchError {
            role,
            url: url.to_string(),
            reason,
        }
    }
}
