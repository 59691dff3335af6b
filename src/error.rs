//! Error handling module for deskprov
//!
//! Provides centralized error handling with proper error types using thiserror.
//! All errors in the application should use these types for consistency.

use thiserror::Error;

/// Main error type for deskprov
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// IO errors (file operations, directory creation, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Package index refresh failure. The one fatal condition: every
    /// subsequent install would be unreliable against a stale index.
    #[error("Package index refresh failed: {0}")]
    IndexRefresh(String),

    /// Single package query/install failure
    #[error("Package operation failed: {0}")]
    Package(String),

    /// Download failure (wallpaper or extension archive)
    #[error("Download failed: {0}")]
    Download(String),

    /// Archive extraction failure
    #[error("Extraction failed: {0}")]
    Extract(String),

    /// Extension enable failure
    #[error("Extension enable failed: {0}")]
    Enable(String),

    /// Preferences store write failure
    #[error("Settings write failed: {0}")]
    Settings(String),

    /// Catalog validation errors (duplicate uuid, bad URL, relative path)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General errors (catch-all for edge cases)
    #[error("{0}")]
    General(String),
}

/// Result type alias for provisioning operations
pub type Result<T> = std::result::Result<T, ProvisionError>;

// Convenient error constructors
impl ProvisionError {
    /// Create an index-refresh error
    pub fn index_refresh(msg: impl Into<String>) -> Self {
        Self::IndexRefresh(msg.into())
    }

    /// Create a package operation error
    pub fn package(msg: impl Into<String>) -> Self {
        Self::Package(msg.into())
    }

    /// Create a download error
    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download(msg.into())
    }

    /// Create an extraction error
    pub fn extract(msg: impl Into<String>) -> Self {
        Self::Extract(msg.into())
    }

    /// Create an enable error
    pub fn enable(msg: impl Into<String>) -> Self {
        Self::Enable(msg.into())
    }

    /// Create a settings error
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a general error
    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }

    /// Whether this error aborts the entire run. Everything except a
    /// failed index refresh degrades to a warning.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::IndexRefresh(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProvisionError::package("install of wget failed");
        assert_eq!(
            err.to_string(),
            "Package operation failed: install of wget failed"
        );

        let err = ProvisionError::download("404 from extensions.gnome.org");
        assert_eq!(
            err.to_string(),
            "Download failed: 404 from extensions.gnome.org"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ProvisionError = io_err.into();
        assert!(matches!(err, ProvisionError::Io(_)));
    }

    #[test]
    fn test_only_index_refresh_is_fatal() {
        assert!(ProvisionError::index_refresh("apt-get update failed").is_fatal());
        assert!(!ProvisionError::package("x").is_fatal());
        assert!(!ProvisionError::download("x").is_fatal());
        assert!(!ProvisionError::enable("x").is_fatal());
        assert!(!ProvisionError::settings("x").is_fatal());
    }
}
