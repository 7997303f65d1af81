//! # Error Handling for Menagerie
//!
//! This module defines the error type shared by every stage of Menagerie:
//! configuration, page composition, asset resolution, HTML generation and
//! the static server. The `thiserror` crate derives the `Display` and
//! `Error` implementations so each variant reads the same way in logs.

use std::path::PathBuf;
use thiserror::Error;

/// A unified result type for the Menagerie library.
///
/// Every fallible operation in the crate returns this alias, with
/// `MenagerieError` as the error variant.
pub type Result<T> = std::result::Result<T, MenagerieError>;

/// The main error type for Menagerie, encompassing all potential error cases.
#[derive(Error, Debug)]
pub enum MenagerieError {
    /// Error related to configuration loading or validation.
    ///
    /// Raised for unreadable or malformed configuration files, unknown
    /// override keys and values that fail validation.
    #[error("Configuration error: {message}.")]
    ConfigError {
        /// Detailed description of the configuration error.
        message: String,
        /// Optional path of the file or directory that caused the error.
        path: Option<PathBuf>,
    },

    /// The document has no root to append to.
    ///
    /// This is the "element not found" condition a component hits when the
    /// page body is absent. Composition stops at the first occurrence.
    #[error("Element not found: no `{selector}` root in document")]
    RootNotFound {
        /// Selector of the missing root element.
        selector: String,
    },

    /// An event was dispatched to a node that does not exist.
    #[error("Unknown node {id}: document root has {len} children")]
    UnknownNode {
        /// The node id that was targeted.
        id: usize,
        /// Number of top-level children present at dispatch time.
        len: usize,
    },

    /// A referenced asset could not be found in the asset directory.
    #[error("Asset `{reference}` not found at {path:?}")]
    AssetNotFound {
        /// The asset reference as written by the component.
        reference: String,
        /// The path that was looked up.
        path: PathBuf,
    },

    /// Error related to template rendering.
    ///
    /// Used when a page template fails to register or render.
    #[error(
        "Template rendering error: {message} in template `{template}`."
    )]
    TemplateRenderingError {
        /// Description of the template rendering error.
        message: String,
        /// The template name associated with the error.
        template: String,
        /// Optional source error providing additional context, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error in HTML output generation.
    #[error("Output generation error: {message} at {path:?}.")]
    OutputGenerationError {
        /// Description of the output generation error.
        message: String,
        /// Path associated with the error.
        path: PathBuf,
        /// Optional source error providing additional context, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// IO error encountered during file operations.
    #[error("File IO error at `{path:?}`: {source}")]
    IOError {
        /// Path associated with the IO error.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The static server failed to bind or to answer a request.
    #[error("Server error: {message}")]
    ServerError {
        /// Description of the server failure.
        message: String,
        /// Optional source error providing additional context, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// General internal error.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<std::io::Error> for MenagerieError {
    /// Converts a standard IO error into a `MenagerieError::IOError`
    /// with an empty path.
    fn from(source: std::io::Error) -> Self {
        MenagerieError::IOError {
            path: PathBuf::new(),
            source,
        }
    }
}

impl MenagerieError {
    /// Creates a `ConfigError` with a specific message.
    ///
    /// # Parameters
    /// - `message`: A description of the configuration error.
    /// - `path`: Optional path of the file causing the error.
    pub fn config_error<S: Into<String>>(
        message: S,
        path: Option<PathBuf>,
    ) -> Self {
        MenagerieError::ConfigError {
            message: message.into(),
            path,
        }
    }

    /// Creates a `RootNotFound` error for the given selector.
    pub fn root_not_found<S: Into<String>>(selector: S) -> Self {
        MenagerieError::RootNotFound {
            selector: selector.into(),
        }
    }

    /// Creates an `AssetNotFound` error.
    pub fn asset_not_found<S: Into<String>>(
        reference: S,
        path: PathBuf,
    ) -> Self {
        MenagerieError::AssetNotFound {
            reference: reference.into(),
            path,
        }
    }

    /// Creates a `TemplateRenderingError` with a message, template name, and optional source.
    pub fn template_rendering_error<S: Into<String>>(
        message: S,
        template: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        MenagerieError::TemplateRenderingError {
            message: message.into(),
            template,
            source,
        }
    }

    /// Creates an `OutputGenerationError` with a specific message, path, and optional source.
    pub fn output_generation_error<S: Into<String>>(
        message: S,
        path: PathBuf,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        MenagerieError::OutputGenerationError {
            message: message.into(),
            path,
            source,
        }
    }

    /// Wraps an IO error as an `IOError` variant with the specified path.
    pub fn io_error(path: PathBuf, source: std::io::Error) -> Self {
        MenagerieError::IOError { path, source }
    }

    /// Creates a `ServerError` with a message and optional source.
    pub fn server_error<S: Into<String>>(
        message: S,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        MenagerieError::ServerError {
            message: message.into(),
            source,
        }
    }

    /// Creates a general internal error with a custom message.
    pub fn internal_error<S: Into<String>>(message: S) -> Self {
        MenagerieError::InternalError(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_not_found_message() {
        let err = MenagerieError::root_not_found("body");
        assert_eq!(
            err.to_string(),
            "Element not found: no `body` root in document"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        );
        let err: MenagerieError = io.into();
        assert!(matches!(
            err,
            MenagerieError::IOError { ref path, .. } if path.as_os_str().is_empty()
        ));
    }

    #[test]
    fn test_asset_not_found_names_reference() {
        let err = MenagerieError::asset_not_found(
            "imgs/pig.jpg",
            PathBuf::from("assets/imgs/pig.jpg"),
        );
        assert!(err.to_string().contains("imgs/pig.jpg"));
    }
}
