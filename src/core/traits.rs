//! # Core Traits Module
//!
//! Traits shared across the build pipeline.
//!
//! - [`Generator`]: turns a composed page into files in an output directory
//! - [`IntoContext`]: converts a value into a template context

use std::path::{Path, PathBuf};

use crate::composer::ComposedPage;
use crate::core::error::Result;
use serde_json::Value as JsonValue;

/// Files written for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    /// The page's HTML file.
    pub html: PathBuf,
    /// The page's stylesheet, if the page has any styled component.
    pub stylesheet: Option<PathBuf>,
    /// The page's event script, if the page has any event binding.
    pub script: Option<PathBuf>,
}

/// Trait for implementing output generation.
///
/// Implementations write a composed page, and whatever files it needs,
/// into an output directory.
pub trait Generator: Send + Sync + std::fmt::Debug {
    /// Generates output for `page` inside `output_dir`.
    ///
    /// # Returns
    ///
    /// The paths of the files written.
    fn generate(
        &self,
        page: &ComposedPage,
        output_dir: &Path,
    ) -> Result<GeneratedPage>;

    /// Validates the generation parameters without writing anything.
    fn validate(&self, page: &ComposedPage, output_dir: &Path)
        -> Result<()>;
}

/// Trait for types that can be converted into a template context.
pub trait IntoContext {
    /// Converts the type into a context object.
    fn into_context(self) -> Result<JsonValue>;
}

impl IntoContext for JsonValue {
    fn into_context(self) -> Result<JsonValue> {
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_into_context_is_identity() -> Result<()> {
        let value = json!({ "title": "Pig Page" });
        assert_eq!(value.clone().into_context()?, value);
        Ok(())
    }
}
