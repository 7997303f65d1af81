//! # Configuration Module
//!
//! Provides configuration management for Menagerie. Settings can come from
//! a TOML file, from environment variables and from code, and are validated
//! before use.
//!
//! ## Features
//!
//! - Multiple configuration sources (TOML, environment variables, code)
//! - Two build profiles, `development` and `production`
//! - Validation of directories, the public path and server settings
//!
//! ## Example
//!
//! ```rust,no_run
//! use menagerie::core::config::{ConfigBuilder, Profile};
//!
//! let config = ConfigBuilder::new()
//!     .with_file("menagerie.toml")
//!     .with_env_prefix("MENAGERIE_")
//!     .with_profile(Profile::Production)
//!     .build()
//!     .unwrap();
//!
//! let config_read = config.read();
//! assert_eq!(config_read.profile, Profile::Production);
//! ```

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use toml::Value as TomlValue;

use crate::core::error::{MenagerieError, Result};

/// Build profile selected on the command line.
///
/// The profile decides how emitted files are named and whether output is
/// minified. It has no effect on what the pages contain.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Readable file names, unminified output.
    #[default]
    Development,
    /// Content-hashed file names, minified output.
    Production,
}

impl Profile {
    /// The profile's lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Development => "development",
            Profile::Production => "production",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = MenagerieError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            other => Err(MenagerieError::config_error(
                format!("Unknown profile '{}'", other),
                None,
            )),
        }
    }
}

/// Represents the main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_asset_dir")]
    /// Directory the image references are resolved against.
    pub asset_dir: PathBuf,

    #[serde(default = "default_output_dir")]
    /// Directory the built pages and assets are written to.
    pub output_dir: PathBuf,

    #[serde(default)]
    /// Optional directory of `<page>.hbs` templates overriding the
    /// built-in page shell.
    pub template_dir: Option<PathBuf>,

    #[serde(default)]
    /// The build profile.
    pub profile: Profile,

    #[serde(default = "default_public_path")]
    /// URL prefix under which the output directory is served.
    pub public_path: String,

    #[serde(default)]
    /// Output generation settings.
    pub output: OutputConfig,

    #[serde(default)]
    /// Static server settings.
    pub server: ServerConfig,
}

/// Configuration settings for output generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    /// Minify generated HTML, CSS and scripts even in the development
    /// profile.
    pub minify: bool,

    #[serde(default = "default_clean")]
    /// Empty the output directory before every build.
    pub clean: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            minify: false,
            clean: default_clean(),
        }
    }
}

/// Configuration settings for the static server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    /// Interface to bind.
    pub host: String,

    #[serde(default = "default_port")]
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Builds a `Config` instance from files, environment and overrides.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_file: Option<PathBuf>,
    env_prefix: Option<String>,
    profile: Option<Profile>,
    overrides: HashMap<String, TomlValue>,
}

impl ConfigBuilder {
    /// Initialises a new `ConfigBuilder` instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a TOML configuration file to the builder.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Adds a prefix for environment variables to override configuration
    /// values (e.g., `MENAGERIE_`).
    pub fn with_env_prefix<S: Into<String>>(
        mut self,
        prefix: S,
    ) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Sets the build profile.
    pub fn with_profile<P: Into<Profile>>(
        mut self,
        profile: P,
    ) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Adds a key-value pair to override configuration values.
    ///
    /// Keys are top-level field names or `section.field`, for example
    /// `server.port`.
    pub fn with_override<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<TomlValue>,
    {
        _ = self.overrides.insert(key.into(), value.into());
        self
    }

    /// Builds the final configuration.
    ///
    /// Sources apply in order: file, profile, environment, overrides. The
    /// result is validated before it is returned.
    pub fn build(self) -> Result<Arc<RwLock<Config>>> {
        let mut config = if let Some(path) = self.config_file {
            load_from_file(&path)?
        } else {
            Config::default()
        };

        if let Some(profile) = self.profile {
            config.profile = profile;
        }

        if let Some(prefix) = self.env_prefix {
            apply_env_overrides(&mut config, &prefix)?;
        }

        apply_overrides(&mut config, &self.overrides)?;
        validate_config(&config)?;

        Ok(Arc::new(RwLock::new(config)))
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        validate_config(self)
    }

    /// Checks that the directories a build reads from exist.
    pub fn validate_sources(&self) -> Result<()> {
        validate_dir(&self.asset_dir, "asset")?;
        if let Some(template_dir) = &self.template_dir {
            validate_dir(template_dir, "template")?;
        }
        Ok(())
    }

    /// Whether generated HTML is minified: always in production, and in
    /// development when `output.minify` is set.
    pub fn minify(&self) -> bool {
        self.output.minify || self.profile == Profile::Production
    }

    /// The `host:port` the server binds to.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_dir: default_asset_dir(),
            output_dir: default_output_dir(),
            template_dir: None,
            profile: Profile::default(),
            public_path: default_public_path(),
            output: OutputConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

// Internal helper functions

fn load_from_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        MenagerieError::config_error(
            format!("Failed to read config file: {}", e),
            Some(path.to_path_buf()),
        )
    })?;

    toml::from_str(&content).map_err(|e| {
        MenagerieError::config_error(
            format!("Failed to parse config file: {}", e),
            Some(path.to_path_buf()),
        )
    })
}

fn apply_env_overrides(
    config: &mut Config,
    prefix: &str,
) -> Result<()> {
    for (key, value) in env::vars_os() {
        let lossy = key.to_string_lossy();
        if !lossy.starts_with(prefix) {
            continue;
        }
        let (Some(key), Some(value)) = (key.to_str(), value.to_str()) else {
            return Err(MenagerieError::config_error(
                format!("environment variable {} is not valid UTF-8", lossy),
                None,
            ));
        };

        // MENAGERIE_SERVER__PORT -> server.port
        let config_key = key[prefix.len()..]
            .trim_start_matches('_')
            .to_lowercase()
            .replace("__", ".");
        apply_config_value(config, &config_key, &value)?;
    }
    Ok(())
}

fn apply_overrides(
    config: &mut Config,
    overrides: &HashMap<String, TomlValue>,
) -> Result<()> {
    for (key, value) in overrides {
        match value {
            TomlValue::String(s) => apply_config_value(config, key, s)?,
            other => apply_config_value(config, key, other)?,
        }
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    if config.output_dir.exists() && !config.output_dir.is_dir() {
        return Err(MenagerieError::config_error(
            format!(
                "output path is not a directory: {}",
                config.output_dir.display()
            ),
            Some(config.output_dir.clone()),
        ));
    }

    if !config.public_path.starts_with('/')
        || !config.public_path.ends_with('/')
    {
        return Err(MenagerieError::config_error(
            format!(
                "public_path must start and end with '/': {}",
                config.public_path
            ),
            None,
        ));
    }

    if config.server.host.is_empty() {
        return Err(MenagerieError::config_error(
            "server.host cannot be empty",
            None,
        ));
    }

    Ok(())
}

fn apply_config_value<T: ToString>(
    config: &mut Config,
    key: &str,
    value: &T,
) -> Result<()> {
    let value_str = value.to_string().trim_matches('"').to_string();
    match key {
        "asset_dir" => config.asset_dir = PathBuf::from(value_str),
        "output_dir" => config.output_dir = PathBuf::from(value_str),
        "template_dir" => {
            config.template_dir = Some(PathBuf::from(value_str))
        }
        "public_path" => config.public_path = value_str,
        "profile" => config.profile = value_str.parse()?,
        "output.minify" => {
            config.output.minify = parse_value(key, &value_str)?
        }
        "output.clean" => {
            config.output.clean = parse_value(key, &value_str)?
        }
        "server.host" => config.server.host = value_str,
        "server.port" => {
            config.server.port = parse_value(key, &value_str)?
        }
        _ => {
            return Err(MenagerieError::config_error(
                format!("Unknown configuration key: {}", key),
                None,
            ));
        }
    }
    Ok(())
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.parse().map_err(|e: T::Err| {
        MenagerieError::config_error(
            format!("Invalid {} value '{}': {}", key, value, e),
            None,
        )
    })
}

fn validate_dir(path: &Path, name: &str) -> Result<()> {
    if !path.exists() {
        return Err(MenagerieError::config_error(
            format!(
                "{} directory does not exist: {}",
                name,
                path.display()
            ),
            Some(path.to_path_buf()),
        ));
    }

    if !path.is_dir() {
        return Err(MenagerieError::config_error(
            format!(
                "{} path is not a directory: {}",
                name,
                path.display()
            ),
            Some(path.to_path_buf()),
        ));
    }

    Ok(())
}

// Default value functions
fn default_asset_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_public_path() -> String {
    "/static/".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_clean() -> bool {
    true
}

/// Tests for the configuration module.
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_profile() {
        assert_eq!(Profile::default(), Profile::Development);
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!(
            "production".parse::<Profile>().unwrap(),
            Profile::Production
        );
        assert_eq!(
            "DEV".parse::<Profile>().unwrap(),
            Profile::Development
        );
        assert!("staging".parse::<Profile>().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("menagerie.toml");
        fs::write(
            &config_file,
            "profile = 'production'\n[server]\nport = 8080\n",
        )
        .unwrap();

        let config = load_from_file(&config_file).unwrap();
        assert_eq!(config.profile, Profile::Production);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.public_path, "/static/");
        assert!(config.output.clean);
    }

    #[test]
    fn test_missing_asset_dir_validation() {
        let config = Config {
            asset_dir: PathBuf::from("missing_assets"),
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
        assert!(config.validate_sources().is_err());
    }

    #[test]
    fn test_public_path_validation() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            asset_dir: temp_dir.path().to_path_buf(),
            public_path: "static".to_string(),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        let mut overrides = HashMap::new();
        _ = overrides.insert(
            "server.port".to_string(),
            TomlValue::Integer(9000),
        );
        _ = overrides.insert(
            "output_dir".to_string(),
            TomlValue::String("build".to_string()),
        );

        apply_overrides(&mut config, &overrides).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.output_dir, PathBuf::from("build"));
    }

    #[test]
    fn test_unknown_override_key() {
        let mut config = Config::default();
        assert!(apply_config_value(&mut config, "nope", &"1").is_err());
    }

    #[test]
    fn test_env_overrides() {
        env::set_var("MENAGERIETEST_SERVER__PORT", "4000");
        let mut config = Config::default();

        apply_env_overrides(&mut config, "MENAGERIETEST").unwrap();
        assert_eq!(config.server.port, 4000);
        env::remove_var("MENAGERIETEST_SERVER__PORT");
    }

    #[test]
    fn test_production_always_minifies() {
        let config = Config {
            profile: Profile::Production,
            ..Default::default()
        };
        assert!(config.minify());
        assert!(!Config::default().minify());
    }

    #[test]
    fn test_builder_with_profile_and_override() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigBuilder::new()
            .with_profile(Profile::Production)
            .with_override(
                "asset_dir",
                temp_dir.path().display().to_string(),
            )
            .build()
            .unwrap();

        let config = config.read();
        assert_eq!(config.profile, Profile::Production);
        assert_eq!(config.asset_dir, temp_dir.path());
    }

    #[test]
    fn test_image_width_is_not_configurable() {
        let mut config = Config::default();
        assert!(
            apply_config_value(&mut config, "images.width", &"600").is_err()
        );
    }

    #[test]
    fn test_clean_override() {
        let mut config = Config::default();
        assert!(config.output.clean);
        apply_config_value(&mut config, "output.clean", &"false").unwrap();
        assert!(!config.output.clean);
    }

    #[cfg(unix)]
    #[test]
    fn test_env_ignores_unrelated_non_utf8_variables() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        env::set_var("MENAGERIEJUNK_BYTES", OsStr::from_bytes(b"\xff\xfe"));
        env::set_var("MENAGERIEOK_SERVER__PORT", "4100");
        let mut config = Config::default();
        let result = apply_env_overrides(&mut config, "MENAGERIEOK_");
        env::remove_var("MENAGERIEJUNK_BYTES");
        env::remove_var("MENAGERIEOK_SERVER__PORT");

        result.unwrap();
        assert_eq!(config.server.port, 4100);
    }

    #[cfg(unix)]
    #[test]
    fn test_env_rejects_non_utf8_prefixed_value() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        env::set_var("MENAGERIEBAD_PROFILE", OsStr::from_bytes(b"\xff"));
        let mut config = Config::default();
        let result = apply_env_overrides(&mut config, "MENAGERIEBAD_");
        env::remove_var("MENAGERIEBAD_PROFILE");

        assert!(matches!(result, Err(MenagerieError::ConfigError { .. })));
    }
}
