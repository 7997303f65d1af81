//! # Asset Pipeline
//!
//! Resolves asset references (such as `imgs/pig.jpg`) to the URLs pages
//! use, and copies the referenced files into the output directory.
//!
//! File naming depends on the build profile:
//!
//! | Profile       | Images                        | Page stylesheets/scripts |
//! |---------------|-------------------------------|--------------------------|
//! | `development` | `images/<path>/<name>.<ext>`  | `<name>.<ext>`           |
//! | `production`  | `images/<contenthash>.<ext>`  | `<name>.<contenthash>.<ext>` |
//!
//! The content hash is the first [`HASH_LEN`] hex digits of the SHA-256
//! of the file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use parking_lot::RwLock;
use sha2::{Digest, Sha256};

use crate::core::config::{Config, Profile};
use crate::core::error::{MenagerieError, Result};

/// Number of hex digits of the content hash used in file names.
pub const HASH_LEN: usize = 20;

/// Subdirectory of the output directory that receives images.
pub const IMAGE_DIR: &str = "images";

/// Returns the leading [`HASH_LEN`] hex digits of the SHA-256 of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut hash = hex::encode(digest);
    hash.truncate(HASH_LEN);
    hash
}

/// Names an emitted file: `[name].[ext]` in development,
/// `[name].[contenthash].[ext]` in production.
pub fn output_name(
    profile: Profile,
    name: &str,
    ext: &str,
    bytes: &[u8],
) -> String {
    match profile {
        Profile::Development => format!("{}.{}", name, ext),
        Profile::Production => {
            format!("{}.{}.{}", name, content_hash(bytes), ext)
        }
    }
}

/// An asset that has been resolved and is waiting to be emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    /// Where the file was read from.
    pub source: PathBuf,
    /// Path relative to the output directory.
    pub output: PathBuf,
    /// URL under which the page references it.
    pub url: String,
    bytes: Vec<u8>,
}

/// Resolves and emits image assets.
#[derive(Clone)]
pub struct AssetPipeline {
    asset_dir: PathBuf,
    output_dir: PathBuf,
    public_path: String,
    profile: Profile,
    cache: Arc<RwLock<HashMap<String, ResolvedAsset>>>,
}

impl AssetPipeline {
    /// Creates a pipeline reading from `asset_dir` and writing into
    /// `output_dir`.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        asset_dir: P,
        output_dir: Q,
        public_path: &str,
        profile: Profile,
    ) -> Self {
        Self {
            asset_dir: asset_dir.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            public_path: public_path.to_string(),
            profile,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates a pipeline from the directories and profile in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.asset_dir,
            &config.output_dir,
            &config.public_path,
            config.profile,
        )
    }

    /// The profile used for naming.
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// The URL of a file written at `relative` inside the output directory.
    pub fn url_for(&self, relative: &Path) -> String {
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}{}", self.public_path, relative)
    }

    /// Resolves `reference` to the URL the page should use.
    ///
    /// Fails with [`MenagerieError::AssetNotFound`] if the file does not
    /// exist in the asset directory. Repeated lookups hit the cache.
    pub fn resolve(&self, reference: &str) -> Result<String> {
        if let Some(asset) = self.cache.read().get(reference) {
            return Ok(asset.url.clone());
        }

        let source = self.asset_dir.join(reference);
        if !source.is_file() {
            return Err(MenagerieError::asset_not_found(reference, source));
        }
        let bytes = fs::read(&source)
            .map_err(|e| MenagerieError::io_error(source.clone(), e))?;

        let output = Path::new(IMAGE_DIR).join(match self.profile {
            Profile::Development => PathBuf::from(reference),
            Profile::Production => {
                let ext = Path::new(reference)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("bin");
                PathBuf::from(format!("{}.{}", content_hash(&bytes), ext))
            }
        });
        let url = self.url_for(&output);
        debug!("Resolved asset {} -> {}", reference, url);

        _ = self.cache.write().insert(
            reference.to_string(),
            ResolvedAsset {
                source,
                output,
                url: url.clone(),
                bytes,
            },
        );
        Ok(url)
    }

    /// Writes every resolved asset into the output directory and returns
    /// the written paths.
    pub fn emit(&self) -> Result<Vec<PathBuf>> {
        let cache = self.cache.read();
        let mut written = Vec::with_capacity(cache.len());
        for asset in cache.values() {
            let path = self.output_dir.join(&asset.output);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    MenagerieError::io_error(parent.to_path_buf(), e)
                })?;
            }
            fs::write(&path, &asset.bytes)
                .map_err(|e| MenagerieError::io_error(path.clone(), e))?;
            info!("Emitted asset {}", path.display());
            written.push(path);
        }
        written.sort();
        Ok(written)
    }

    /// The assets resolved so far.
    pub fn resolved(&self) -> Vec<ResolvedAsset> {
        self.cache.read().values().cloned().collect()
    }

    /// Checks if a reference has been resolved.
    pub fn is_resolved(&self, reference: &str) -> bool {
        self.cache.read().contains_key(reference)
    }
}

impl std::fmt::Debug for AssetPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetPipeline")
            .field("asset_dir", &self.asset_dir)
            .field("output_dir", &self.output_dir)
            .field("public_path", &self.public_path)
            .field("profile", &self.profile)
            .field("resolved", &self.cache.read().len())
            .finish()
    }
}
