//! # Settings File
//!
//! The CLI keeps its settings in a TOML file, `~/.dspy_tool.toml` unless
//! `--config` points elsewhere. Each settings struct owns one table named
//! after the struct:
//!
//! ```toml
//! [FileManagerConfig]
//! dsp_dirs = ["C:/Users/me/AppData/LocalLow/DJI/RoboMaster/dsp_projects"]
//! ```
//!
//! Saving rewrites only that table; any other table already in the file is
//! kept as is. A missing file or a missing table yields the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings file name under the home directory.
pub const CONFIG_FILE_NAME: &str = ".dspy_tool.toml";

/// Table holding [`FileManagerConfig`].
pub const FILE_MANAGER_SECTION: &str = "FileManagerConfig";

/// Settings-file failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot determine the home directory")]
    NoHomeDir,

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to encode settings: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// `~/.dspy_tool.toml`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoHomeDir)
}

/// Directories scanned for `.dsp` files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileManagerConfig {
    #[serde(default = "default_dsp_dirs")]
    pub dsp_dirs: Vec<String>,
}

impl Default for FileManagerConfig {
    fn default() -> Self {
        Self {
            dsp_dirs: default_dsp_dirs(),
        }
    }
}

impl FileManagerConfig {
    /// Load from `path`, falling back to defaults when the file or the
    /// `[FileManagerConfig]` table is absent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let Some(table) = read_table(path)? else {
            tracing::debug!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Self::default());
        };
        match table.get(FILE_MANAGER_SECTION) {
            Some(section) => section
                .clone()
                .try_into::<Self>()
                .map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                }),
            None => Ok(Self::default()),
        }
    }

    /// Write the `[FileManagerConfig]` table, keeping every other table.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let mut table = read_table(path)?.unwrap_or_default();
        table.insert(FILE_MANAGER_SECTION.to_string(), toml::Value::try_from(self)?);
        let text = toml::to_string(&table)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "saved {FILE_MANAGER_SECTION}");
        Ok(())
    }

    /// Add a directory. A path naming an existing file is replaced by its
    /// parent. Returns `false` if it was already listed.
    pub fn add_dir(&mut self, path: &Path) -> bool {
        let dir = normalize_dir(path);
        if self.dsp_dirs.contains(&dir) {
            return false;
        }
        self.dsp_dirs.push(dir);
        true
    }

    /// Remove a directory, normalized as in [`add_dir`](Self::add_dir).
    /// Returns `false` if it was not listed.
    pub fn remove_dir(&mut self, path: &Path) -> bool {
        let dir = normalize_dir(path);
        let before = self.dsp_dirs.len();
        self.dsp_dirs.retain(|d| d != &dir);
        self.dsp_dirs.len() != before
    }
}

/// The RoboMaster project folder, then the desktop and download folders.
pub fn default_dsp_dirs() -> Vec<String> {
    let home = dirs::home_dir().unwrap_or_default();
    let desktop = dirs::desktop_dir().unwrap_or_else(|| home.join("Desktop"));
    let download = dirs::download_dir().unwrap_or_else(|| home.join("Downloads"));
    [
        home.join("AppData")
            .join("LocalLow")
            .join("DJI")
            .join("RoboMaster")
            .join("dsp_projects"),
        desktop,
        download,
    ]
    .iter()
    .map(|p| to_posix(p))
    .collect()
}

/// Replace an existing file path by its parent and render with `/`.
pub fn normalize_dir(path: &Path) -> String {
    let dir = match path.parent() {
        Some(parent) if path.is_file() => parent,
        _ => path,
    };
    to_posix(dir)
}

fn to_posix(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn read_table(path: &Path) -> Result<Option<toml::Table>, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    text.parse::<toml::Table>()
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = FileManagerConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, FileManagerConfig::default());
        assert_eq!(cfg.dsp_dirs.len(), 3);
        assert!(cfg.dsp_dirs[0].ends_with("AppData/LocalLow/DJI/RoboMaster/dsp_projects"));
    }

    #[test]
    fn missing_table_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        std::fs::write(&path, "[Other]\nkey = 1\n").unwrap();
        assert_eq!(
            FileManagerConfig::load(&path).unwrap(),
            FileManagerConfig::default()
        );
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        let cfg = FileManagerConfig {
            dsp_dirs: vec!["a/b".into(), "C:/dsp".into()],
        };
        cfg.save(&path).unwrap();
        assert_eq!(FileManagerConfig::load(&path).unwrap(), cfg);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[FileManagerConfig]"));
    }

    #[test]
    fn save_preserves_other_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        std::fs::write(&path, "[Other]\nkey = \"value\"\n").unwrap();

        FileManagerConfig { dsp_dirs: vec![] }.save(&path).unwrap();

        let table: toml::Table = std::fs::read_to_string(&path).unwrap().parse().unwrap();
        assert_eq!(table["Other"]["key"].as_str(), Some("value"));
        assert_eq!(table[FILE_MANAGER_SECTION]["dsp_dirs"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn table_without_dirs_uses_default_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        std::fs::write(&path, "[FileManagerConfig]\n").unwrap();
        assert_eq!(FileManagerConfig::load(&path).unwrap().dsp_dirs, default_dsp_dirs());
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        std::fs::write(&path, "[FileManagerConfig\n").unwrap();
        assert!(matches!(
            FileManagerConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn add_and_remove_dirs() {
        let mut cfg = FileManagerConfig { dsp_dirs: vec![] };
        assert!(cfg.add_dir(Path::new("projects/dsp")));
        assert!(!cfg.add_dir(Path::new("projects/dsp")));
        assert_eq!(cfg.dsp_dirs, vec!["projects/dsp".to_string()]);
        assert!(cfg.remove_dir(Path::new("projects/dsp")));
        assert!(!cfg.remove_dir(Path::new("projects/dsp")));
        assert!(cfg.dsp_dirs.is_empty());
    }

    #[test]
    fn file_path_is_replaced_by_parent() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("demo.dsp");
        std::fs::write(&file, "").unwrap();
        assert_eq!(normalize_dir(&file), to_posix(dir.path()));
        assert_eq!(normalize_dir(dir.path()), to_posix(dir.path()));
    }

    #[test]
    fn backslashes_become_forward_slashes() {
        assert_eq!(to_posix(Path::new(r"C:\Users\me\Desktop")), "C:/Users/me/Desktop");
    }
}
