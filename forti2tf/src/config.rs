//! Run configuration: optional TOML file layered under CLI flags.
//!
//! ```toml
//! input = "fgt-policies.txt"
//! output_dir = "terraform/firewall"
//! import_style = "block"
//! overwrite_existing = false
//! collision = "reject"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::emit::ImportStyle;
use crate::registry::CollisionPolicy;

/// Default file name for resource declarations.
pub const DEFAULT_RESOURCE_FILE: &str = "policy.tf";

/// One configuration layer. Every key is optional so layers can be merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub import_file: Option<PathBuf>,
    pub resource_file: Option<PathBuf>,
    pub overwrite_existing: Option<bool>,
    pub import_style: Option<ImportStyle>,
    pub collision: Option<CollisionPolicy>,
    pub strict: Option<bool>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input: PathBuf,
    pub import_path: PathBuf,
    pub resource_path: PathBuf,
    /// Truncate existing artifacts (`true`) or append to them (`false`).
    pub overwrite_existing: bool,
    pub import_style: ImportStyle,
    pub collision: CollisionPolicy,
    /// Treat per-record failures as fatal.
    pub strict: bool,
}

/// Errors returned when loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("no input file given; pass INPUT or set `input` in the config file")]
    MissingInput,
}

/// Load a configuration layer from a TOML file.
pub fn load_config(path: &Path) -> Result<ConfigLayer, ConfigLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&raw, path.display().to_string())
}

fn parse_config(raw: &str, path: String) -> Result<ConfigLayer, ConfigLoadError> {
    toml::from_str(raw).map_err(|source| ConfigLoadError::Parse { path, source })
}

impl ConfigLayer {
    /// Overlay `top` on `self`; keys set in `top` win.
    pub fn merge(self, top: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            input: top.input.or(self.input),
            output_dir: top.output_dir.or(self.output_dir),
            import_file: top.import_file.or(self.import_file),
            resource_file: top.resource_file.or(self.resource_file),
            overwrite_existing: top.overwrite_existing.or(self.overwrite_existing),
            import_style: top.import_style.or(self.import_style),
            collision: top.collision.or(self.collision),
            strict: top.strict.or(self.strict),
        }
    }

    /// Fill defaults and resolve output paths.
    pub fn resolve(self) -> Result<Settings, ConfigLoadError> {
        let input = self.input.ok_or(ConfigLoadError::MissingInput)?;
        let import_style = self.import_style.unwrap_or_default();
        let output_dir = self.output_dir.unwrap_or_else(|| PathBuf::from("."));
        let import_file = self
            .import_file
            .unwrap_or_else(|| PathBuf::from(import_style.default_file_name()));
        let resource_file = self
            .resource_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCE_FILE));

        Ok(Settings {
            input,
            import_path: output_dir.join(import_file),
            resource_path: output_dir.join(resource_file),
            overwrite_existing: self.overwrite_existing.unwrap_or(true),
            import_style,
            collision: self.collision.unwrap_or_default(),
            strict: self.strict.unwrap_or(false),
        })
    }
}
