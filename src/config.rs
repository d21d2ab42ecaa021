use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ReviewError};
use crate::grid::assets::{PLACEHOLDER_SRC, THUMBNAIL_MOUNT, UPLOADS_MOUNT};
use crate::grid::{ViewMode, VirtualScrollConfig};

const APP_DIR: &str = "media-review";
const SETTINGS_FILE: &str = "settings.toml";

/// Smallest and largest tile edge the zoom slider allows
pub const MIN_TILE_SIZE: f32 = 64.0;
pub const MAX_TILE_SIZE: f32 = 512.0;

/// User settings, stored as TOML in the user config directory
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Edge length of a grid tile in pixels
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    /// Space between tiles in pixels
    #[serde(default = "default_gap")]
    pub gap: f32,
    /// Rows kept alive above and below the visible ones
    #[serde(default = "default_overscan_rows")]
    pub overscan_rows: usize,
    /// Mode the lightbox opens in
    #[serde(default)]
    pub default_view_mode: ViewMode,
    /// Disk folder behind `/uploads/*`
    #[serde(default)]
    pub uploads_dir: Option<PathBuf>,
    /// Disk folder behind `/storage/thumbnails/*`
    #[serde(default)]
    pub thumbnails_dir: Option<PathBuf>,
    /// Export or folder opened last time
    #[serde(default)]
    pub last_source: Option<PathBuf>,
}

fn default_tile_size() -> f32 {
    VirtualScrollConfig::default().tile_size
}

fn default_gap() -> f32 {
    VirtualScrollConfig::default().gap
}

fn default_overscan_rows() -> usize {
    VirtualScrollConfig::default().overscan_rows
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tile_size: default_tile_size(),
            gap: default_gap(),
            overscan_rows: default_overscan_rows(),
            default_view_mode: ViewMode::default(),
            uploads_dir: None,
            thumbnails_dir: None,
            last_source: None,
        }
    }
}

/// What a mount path points at on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAsset {
    /// The bundled placeholder
    Placeholder,
    File(PathBuf),
    /// Remote URL or a mount without a configured folder
    Unavailable,
}

impl Settings {
    /// Settings file location:
    /// - Linux: ~/.config/media-review/settings.toml
    /// - macOS: ~/Library/Application Support/media-review/settings.toml
    /// - Windows: %APPDATA%\media-review\settings.toml
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
    }

    /// Directory for log files
    pub fn log_dir() -> Option<PathBuf> {
        let dir = dirs::config_dir()?.join(APP_DIR);
        fs::create_dir_all(&dir).ok()?;
        Some(dir)
    }

    /// Load the settings file, falling back to defaults on any problem
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            log::warn!("No config directory, using default settings");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("Error reading settings: {}", err);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ReviewError::io(path, e))?;
        let settings: Settings = toml::from_str(&text)?;
        Ok(settings.sanitized())
    }

    pub fn store(&self) -> Result<()> {
        match Self::settings_path() {
            Some(path) => self.store_to(&path),
            None => Ok(()),
        }
    }

    pub fn store_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ReviewError::io(parent, e))?;
        }
        let text = toml::to_string(self)?;
        fs::write(path, text).map_err(|e| ReviewError::io(path, e))
    }

    /// Clamp values a hand-edited file may have broken
    fn sanitized(mut self) -> Self {
        self.tile_size = self.tile_size.clamp(MIN_TILE_SIZE, MAX_TILE_SIZE);
        self.gap = self.gap.max(0.0);
        self
    }

    pub fn scroll_config(&self) -> VirtualScrollConfig {
        VirtualScrollConfig {
            tile_size: self.tile_size,
            gap: self.gap,
            overscan_rows: self.overscan_rows,
        }
    }

    /// Map a mount path (`/uploads/...`, `/storage/thumbnails/...`) to disk
    pub fn resolve_asset(&self, src: &str) -> ResolvedAsset {
        if src == PLACEHOLDER_SRC {
            return ResolvedAsset::Placeholder;
        }
        let mounts = [
            (UPLOADS_MOUNT, &self.uploads_dir),
            (THUMBNAIL_MOUNT, &self.thumbnails_dir),
        ];
        for (mount, dir) in mounts {
            if let Some(rest) = src.strip_prefix(mount) {
                return match dir {
                    Some(dir) => ResolvedAsset::File(dir.join(rest)),
                    None => ResolvedAsset::Unavailable,
                };
            }
        }
        ResolvedAsset::Unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = toml::from_str("tile_size = 120.0\ndefault_view_mode = \"compare\"").unwrap();
        assert_eq!(settings.tile_size, 120.0);
        assert_eq!(settings.gap, 8.0);
        assert_eq!(settings.overscan_rows, 2);
        assert_eq!(settings.default_view_mode, ViewMode::Compare);
    }

    #[test]
    fn test_store_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media-review").join("settings.toml");

        let settings = Settings {
            tile_size: 1000.0,
            uploads_dir: Some(PathBuf::from("/srv/uploads")),
            ..Settings::default()
        };
        settings.store_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.tile_size, MAX_TILE_SIZE);
        assert_eq!(loaded.uploads_dir, settings.uploads_dir);
    }

    #[test]
    fn test_resolve_asset() {
        let settings = Settings {
            uploads_dir: Some(PathBuf::from("/srv/uploads")),
            ..Settings::default()
        };

        assert_eq!(settings.resolve_asset(PLACEHOLDER_SRC), ResolvedAsset::Placeholder);
        assert_eq!(
            settings.resolve_asset("/uploads/job/a.jpg"),
            ResolvedAsset::File(PathBuf::from("/srv/uploads/job/a.jpg"))
        );
        assert_eq!(
            settings.resolve_asset("/storage/thumbnails/a.jpg"),
            ResolvedAsset::Unavailable
        );
        assert_eq!(settings.resolve_asset("https://x/a.jpg"), ResolvedAsset::Unavailable);
    }
}
