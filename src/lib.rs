// Copyright © 2024 Menagerie. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Menagerie Library
//!
//! Menagerie builds two static pages, one for a pig and one for a rabbit,
//! out of small renderable components, and serves them over HTTP.
//!
//! The build pipeline runs in four steps for every [`pages::Page`]:
//!
//! 1. the page's [`composer::PageDescriptor`] lists its components in order,
//!    with image references resolved by the [`assets::AssetPipeline`]
//! 2. the [`composer::PageComposer`] renders each component and appends the
//!    result to a [`dom::Document`], wiring click handlers into an
//!    [`events::EventRegistry`]
//! 3. the [`generators::HtmlGenerator`] writes the page, its stylesheet and
//!    its event script
//! 4. the asset pipeline copies every referenced image into the output
//!    directory
//!
//! [`server::StaticServer`] then serves the output directory.

#![doc = include_str!("../README.md")]
#![doc(html_root_url = "https://docs.rs/menagerie")]
#![crate_name = "menagerie"]
#![crate_type = "lib"]

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::assets::AssetPipeline;
use crate::composer::{ComposedPage, PageComposer};
use crate::core::config::Config;
use crate::core::traits::{GeneratedPage, Generator};
use crate::generators::HtmlGenerator;
use crate::pages::Page;
use crate::template::PageTemplates;

pub use crate::core::error::{MenagerieError, Result};

/// Image resolution, content hashing and emission.
pub mod assets;

/// Command-line interface.
pub mod cli;

/// Renderable components and the fragments they produce.
pub mod components;

/// Page descriptors and composition into a document.
pub mod composer;

/// Configuration, errors and shared traits.
pub mod core;

/// The document tree components are appended to.
pub mod dom;

/// Event bindings and their dispatch.
pub mod events;

/// Output generation.
pub mod generators;

/// The pig and rabbit pages.
pub mod pages;

/// Static HTTP server for the build output.
pub mod server;

/// Page shell templates.
pub mod template;

/// Files written by a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Files written for each page, in build order.
    pub pages: Vec<GeneratedPage>,
    /// Images copied into the output directory.
    pub images: Vec<PathBuf>,
}

/// The build pipeline.
#[derive(Debug, Clone)]
pub struct Menagerie {
    config: Config,
}

impl Menagerie {
    /// Creates a pipeline for `config`.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The pipeline's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Composes one page, resolving its images through `assets`.
    pub fn compose(
        &self,
        page: Page,
        assets: &AssetPipeline,
    ) -> Result<ComposedPage> {
        PageComposer::compose(&page.descriptor(assets)?)
    }

    /// Builds every page into the output directory.
    ///
    /// With `output.clean` set, the output directory is emptied first.
    /// Stops at the first page that fails; files written for earlier pages
    /// are left in place.
    pub fn build(&self) -> Result<BuildReport> {
        self.config.validate()?;
        self.config.validate_sources()?;
        if self.config.output.clean {
            self.clean_output_dir()?;
        }

        let assets = AssetPipeline::from_config(&self.config);
        let mut templates = PageTemplates::new()?;
        if let Some(dir) = &self.config.template_dir {
            templates = templates.with_template_dir(dir)?;
        }
        let generator = HtmlGenerator::new(
            templates,
            self.config.profile,
            &self.config.public_path,
        )
        .with_minification(self.config.minify());

        info!(
            "Building {} pages into {}",
            self.config.profile,
            self.config.output_dir.display()
        );

        let mut report = BuildReport::default();
        for page in Page::ALL {
            let composed = self.compose(page, &assets)?;
            let generated =
                generator.generate(&composed, &self.config.output_dir)?;
            report.pages.push(generated);
        }
        report.images = assets.emit()?;

        info!(
            "Built {} pages and {} images",
            report.pages.len(),
            report.images.len()
        );
        Ok(report)
    }

    /// Removes everything inside the output directory, keeping the
    /// directory itself.
    ///
    /// Refuses when the output directory holds the asset or template
    /// directory.
    fn clean_output_dir(&self) -> Result<()> {
        let output_dir = &self.config.output_dir;
        if !output_dir.is_dir() {
            return Ok(());
        }
        let output = canonical(output_dir)?;
        let sources = std::iter::once(&self.config.asset_dir)
            .chain(self.config.template_dir.as_ref());
        for source in sources {
            if canonical(source)?.starts_with(&output) {
                return Err(MenagerieError::config_error(
                    format!(
                        "Refusing to clean {}: it contains {}",
                        output_dir.display(),
                        source.display()
                    ),
                    Some(output_dir.clone()),
                ));
            }
        }

        info!("Cleaning {}", output_dir.display());
        let entries = fs::read_dir(output_dir)
            .map_err(|e| MenagerieError::io_error(output_dir.clone(), e))?;
        for entry in entries {
            let path = entry
                .map_err(|e| MenagerieError::io_error(output_dir.clone(), e))?
                .path();
            let removed = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            removed.map_err(|e| MenagerieError::io_error(path.clone(), e))?;
            debug!("Removed {}", path.display());
        }
        Ok(())
    }
}

fn canonical(path: &Path) -> Result<PathBuf> {
    path.canonicalize()
        .map_err(|e| MenagerieError::io_error(path.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::image::{PIG_ASSET, RABBIT_ASSET};
    use crate::core::config::Profile;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let assets = dir.path().join("assets");
        fs::create_dir_all(assets.join("imgs")).unwrap();
        fs::write(assets.join(PIG_ASSET), b"oink").unwrap();
        fs::write(assets.join(RABBIT_ASSET), b"hop").unwrap();
        dir
    }

    fn config(dir: &TempDir, profile: Profile) -> Config {
        Config {
            asset_dir: dir.path().join("assets"),
            output_dir: dir.path().join("dist"),
            profile,
            ..Default::default()
        }
    }

    #[test]
    fn test_development_build() -> Result<()> {
        let dir = project();
        let report =
            Menagerie::new(config(&dir, Profile::Development)).build()?;

        let dist = dir.path().join("dist");
        assert_eq!(report.pages.len(), 2);
        assert!(dist.join("pig.html").is_file());
        assert!(dist.join("rabbit.html").is_file());
        assert!(dist.join("pig.js").is_file());
        assert_eq!(
            fs::read(dist.join("images").join(PIG_ASSET))?,
            b"oink"
        );

        let pig = fs::read_to_string(dist.join("pig.html"))?;
        assert!(pig.contains(r#"src="/static/images/imgs/pig.jpg""#));
        Ok(())
    }

    #[test]
    fn test_production_build_hashes_images() -> Result<()> {
        let dir = project();
        let report =
            Menagerie::new(config(&dir, Profile::Production)).build()?;

        assert_eq!(report.images.len(), 2);
        for image in &report.images {
            let name = image.file_name().unwrap().to_str().unwrap();
            assert!(name.ends_with(".jpg"));
            assert_ne!(name, "pig.jpg");
        }
        let pig = fs::read_to_string(dir.path().join("dist/pig.html"))?;
        assert!(!pig.contains("imgs/pig.jpg"));
        Ok(())
    }

    fn image_names(dir: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    #[test]
    fn test_rebuild_removes_stale_outputs() -> Result<()> {
        let dir = project();
        let menagerie = Menagerie::new(config(&dir, Profile::Production));
        let _ = menagerie.build()?;

        fs::write(dir.path().join("assets").join(PIG_ASSET), b"snort")?;
        fs::write(dir.path().join("dist/stray.txt"), "old")?;
        let report = menagerie.build()?;

        let dist = dir.path().join("dist");
        assert_eq!(image_names(&dist.join("images"))?.len(), 2);
        let css = image_names(&dist)?
            .into_iter()
            .filter(|name| name.starts_with("pig.") && name.ends_with(".css"))
            .count();
        assert_eq!(css, 1);
        assert!(!dist.join("stray.txt").exists());
        assert_eq!(report.images.len(), 2);
        Ok(())
    }

    #[test]
    fn test_clean_disabled_keeps_old_files() -> Result<()> {
        let dir = project();
        let mut config = config(&dir, Profile::Development);
        config.output.clean = false;
        fs::create_dir_all(&config.output_dir)?;
        fs::write(config.output_dir.join("stray.txt"), "old")?;

        let _ = Menagerie::new(config).build()?;
        assert!(dir.path().join("dist/stray.txt").is_file());
        Ok(())
    }

    #[test]
    fn test_clean_refuses_output_containing_assets() {
        let dir = project();
        let mut config = config(&dir, Profile::Development);
        config.output_dir = dir.path().to_path_buf();

        let result = Menagerie::new(config).build();
        assert!(matches!(result, Err(MenagerieError::ConfigError { .. })));
        assert!(dir.path().join("assets").join(PIG_ASSET).is_file());
    }

    #[test]
    fn test_missing_asset_dir_fails() {
        let dir = TempDir::new().unwrap();
        let result =
            Menagerie::new(config(&dir, Profile::Development)).build();
        assert!(matches!(result, Err(MenagerieError::ConfigError { .. })));
    }

    #[test]
    fn test_compose_pig_page() -> Result<()> {
        let dir = project();
        let menagerie = Menagerie::new(config(&dir, Profile::Development));
        let assets = AssetPipeline::from_config(menagerie.config());
        let page = menagerie.compose(Page::Pig, &assets)?;

        assert_eq!(page.document.len(), 3);
        assert_eq!(page.events.bindings().len(), 1);
        Ok(())
    }
}
