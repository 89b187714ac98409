//! Configuration file support.
//!
//! Settings are read from a `trexolists.toml` file. Every section is optional
//! and falls back to defaults, so an empty file is a valid configuration.
//!
//! ```toml
//! [paths]
//! work_dir = "/data/trexolists"
//! reference_csv = "data/trexolists_extended.csv"
//!
//! [selection]
//! program_ids = [2734, 2084]
//! target_name = "WASP-96"
//! planet_letter = "b"
//!
//! [compare]
//! skip_prefixes = ["sy_", "pl_", "st_"]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::domain::TargetFilter;
use crate::core::error::ConfigError;
use crate::io::reference::ReferenceKeys;
use crate::services::compare::{CompareOptions, DEFAULT_SKIP_PREFIXES};

/// Environment variable overriding `paths.work_dir`.
pub const WORK_DIR_ENV: &str = "TREXOLISTS_WORK_DIR";

/// Environment variable overriding `paths.reference_csv`.
pub const REFERENCE_CSV_ENV: &str = "TREXOLISTS_REFERENCE_CSV";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrexolistsConfig {
    #[serde(default)]
    pub paths: PathSettings,
    #[serde(default)]
    pub selection: SelectionSettings,
    #[serde(default)]
    pub compare: CompareSettings,
    #[serde(default)]
    pub reference: ReferenceSettings,
}

/// Where documents and the reference table live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    #[serde(default)]
    pub reference_csv: Option<PathBuf>,
}

/// Which programs and target to process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionSettings {
    #[serde(default)]
    pub program_ids: Vec<u32>,
    #[serde(default)]
    pub target_name: Option<String>,
    #[serde(default)]
    pub planet_letter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareSettings {
    #[serde(default = "default_skip_prefixes")]
    pub skip_prefixes: Vec<String>,
}

/// Reference table columns used to find the row for a summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSettings {
    #[serde(default = "default_host_column")]
    pub host_column: String,
    #[serde(default = "default_letter_column")]
    pub letter_column: String,
    #[serde(default = "default_program_column")]
    pub program_column: String,
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_skip_prefixes() -> Vec<String> {
    DEFAULT_SKIP_PREFIXES.iter().map(|p| p.to_string()).collect()
}

fn default_host_column() -> String {
    "star_name".to_string()
}

fn default_letter_column() -> String {
    "planet_letter".to_string()
}

fn default_program_column() -> String {
    "program".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            reference_csv: None,
        }
    }
}

impl Default for CompareSettings {
    fn default() -> Self {
        Self {
            skip_prefixes: default_skip_prefixes(),
        }
    }
}

impl Default for ReferenceSettings {
    fn default() -> Self {
        Self {
            host_column: default_host_column(),
            letter_column: default_letter_column(),
            program_column: default_program_column(),
        }
    }
}

impl TrexolistsConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `trexolists.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("trexolists.toml"),
            PathBuf::from("rust_backend/trexolists.toml"),
            PathBuf::from("../trexolists.toml"),
        ];

        for path in &search_paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Err(ConfigError::NotFound(
            search_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        ))
    }

    /// Apply `TREXOLISTS_WORK_DIR` / `TREXOLISTS_REFERENCE_CSV` if set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var_os(WORK_DIR_ENV).map(PathBuf::from),
            std::env::var_os(REFERENCE_CSV_ENV).map(PathBuf::from),
        );
    }

    fn apply_overrides(&mut self, work_dir: Option<PathBuf>, reference_csv: Option<PathBuf>) {
        if let Some(dir) = work_dir.filter(|d| !d.as_os_str().is_empty()) {
            self.paths.work_dir = dir;
        }
        if let Some(csv) = reference_csv.filter(|p| !p.as_os_str().is_empty()) {
            self.paths.reference_csv = Some(csv);
        }
    }

    /// Target filter from the selection, if a target name is configured.
    pub fn target_filter(&self) -> Option<TargetFilter> {
        let name = self.selection.target_name.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }
        let filter = TargetFilter::new(name);
        Some(match self.selection.planet_letter.as_deref() {
            Some(letter) if !letter.trim().is_empty() => filter.with_planet(letter.trim()),
            _ => filter,
        })
    }

    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            skip_prefixes: self.compare.skip_prefixes.clone(),
        }
    }

    pub fn reference_keys(&self) -> ReferenceKeys {
        ReferenceKeys {
            host: self.reference.host_column.clone(),
            planet_letter: self.reference.letter_column.clone(),
            program: self.reference.program_column.clone(),
        }
    }
}
