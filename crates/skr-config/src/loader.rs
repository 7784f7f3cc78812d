use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::schema::{CONFIG_FILE_NAME, Config, LEGACY_CONFIG_NAME};
use skr_core::{SkrError, find_upward};

/// Locates and loads the global and project-local configuration documents.
///
/// Only [`ConfigLoader::resolve_config_root`] consults the environment; loading
/// and merging work from the root passed to [`ConfigLoader::new`].
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_root: PathBuf,
}

impl ConfigLoader {
    /// Resolve the per-user config root: explicit path > SKR_CONFIG_HOME env >
    /// platform config dir > ~/.config
    pub fn resolve_config_root(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("SKR_CONFIG_HOME") {
            return PathBuf::from(p);
        }
        dirs::config_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        })
    }

    pub fn new(config_root: impl Into<PathBuf>) -> Self {
        Self {
            config_root: config_root.into(),
        }
    }

    /// `<config root>/skr/config.yaml`
    pub fn global_path(&self) -> PathBuf {
        self.config_root.join("skr").join(CONFIG_FILE_NAME)
    }

    /// Walk up from `start_dir` looking for a local config document.
    ///
    /// In each directory the legacy `.skr.yaml` is preferred over
    /// `config.yaml`; the nearest directory with either one wins.
    pub fn find_local(start_dir: &Path) -> Option<PathBuf> {
        find_upward(start_dir, |dir| {
            [LEGACY_CONFIG_NAME, CONFIG_FILE_NAME]
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    /// Read a single document. A missing file is the empty configuration; a
    /// file that exists but cannot be read or parsed is an error.
    pub fn load(path: &Path) -> skr_core::Result<Config> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(?path, "config file not found");
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(SkrError::ConfigRead {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        // An empty document deserializes as YAML null.
        if raw.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_yaml::from_str::<Config>(&raw).map_err(|e| SkrError::ConfigRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load the global document and merge the nearest local document over it.
    pub fn load_merged(&self, start_dir: &Path) -> skr_core::Result<Config> {
        let global_path = self.global_path();
        let global = Self::load(&global_path)?;

        let merged = match Self::find_local(start_dir) {
            Some(local_path) if same_file(&local_path, &global_path) => {
                debug!(?local_path, "local config is the global document, merging once");
                global
            }
            Some(local_path) => {
                info!(?local_path, "loading local configuration");
                let local = Self::load(&local_path)?;
                global.merge(local)
            }
            None => {
                debug!(?start_dir, "no local config found in hierarchy");
                global
            }
        };

        for agent in merged.unknown_agents() {
            debug!(agent, "unknown agent in configuration, ignoring");
        }

        Ok(merged)
    }

    pub fn config_root(&self) -> &Path {
        &self.config_root
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
