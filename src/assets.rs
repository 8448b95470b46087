//! Asset loading with embedded fallbacks
//!
//! The config file and the named-color reference set are compiled into the
//! binary. Each can be overridden from the filesystem:
//!
//! - `CONFIG_FILE`: path to a config.yaml
//! - `COLORS_FILE`: path to a named-color JSON file
//! - `FONTS_DIR`: directory of extra fonts for card text
//!
//! If an override path is set but missing, the embedded copy is used.

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

/// Embedded named-color reference sets
#[derive(RustEmbed)]
#[folder = "palettes/"]
#[include = "*.json"]
struct EmbeddedPalettes;

/// File name of the default named-color set inside `palettes/`
pub const DEFAULT_COLORS: &str = "colors.json";

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Asset loader with optional filesystem overrides
pub struct AssetLoader {
    config_file: Option<PathBuf>,
    colors_file: Option<PathBuf>,
    fonts_dir: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader
    ///
    /// Paths should be `Some` only if the corresponding env var was set.
    pub fn new(
        config_file: Option<PathBuf>,
        colors_file: Option<PathBuf>,
        fonts_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            config_file,
            colors_file,
            fonts_dir,
        }
    }

    /// Build a loader from `CONFIG_FILE`, `COLORS_FILE` and `FONTS_DIR`
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("CONFIG_FILE").ok().map(PathBuf::from),
            std::env::var("COLORS_FILE").ok().map(PathBuf::from),
            std::env::var("FONTS_DIR").ok().map(PathBuf::from),
        )
    }

    /// Read the config file, falling back to the embedded default
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        EmbeddedConfig::get("config.yaml")
            .map(|f| {
                tracing::trace!("Loading config from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Embedded config.yaml not found")
            })
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Read the named-color reference set
    ///
    /// `explicit` (from config) wins over `COLORS_FILE`; an explicit path
    /// that does not exist is an error rather than a silent fallback.
    pub fn read_colors(&self, explicit: Option<&Path>) -> io::Result<Cow<'static, [u8]>> {
        if let Some(path) = explicit {
            tracing::trace!(path = %path.display(), "Loading colors from configured path");
            return Ok(Cow::Owned(fs::read(path)?));
        }
        if let Some(ref path) = self.colors_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading colors from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        EmbeddedPalettes::get(DEFAULT_COLORS)
            .map(|f| {
                tracing::trace!("Loading colors from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Embedded {DEFAULT_COLORS} not found"),
                )
            })
    }

    /// Font files from `FONTS_DIR`, for loading into the font database
    pub fn get_fonts(&self) -> Vec<(String, Vec<u8>)> {
        let mut fonts = Vec::new();
        let Some(ref dir) = self.fonts_dir else {
            return fonts;
        };
        let Ok(entries) = fs::read_dir(dir) else {
            tracing::warn!(dir = %dir.display(), "Fonts directory not readable");
            return fonts;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let is_font = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| matches!(ext, "ttf" | "otf" | "ttc"));
            if !is_font {
                continue;
            }
            match fs::read(&path) {
                Ok(data) => {
                    let name = entry.file_name().to_string_lossy().to_string();
                    tracing::trace!(font = %name, "Loading font from filesystem");
                    fonts.push((name, data));
                }
                Err(e) => tracing::warn!(path = %path.display(), %e, "Failed to read font"),
            }
        }
        fonts.sort_by(|a, b| a.0.cmp(&b.0));
        fonts
    }

    /// Write the embedded config and color set to the filesystem (init command)
    ///
    /// Targets the configured paths, or `./config.yaml` and `./colors.json`.
    pub fn init(&self, force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();

        let targets = [
            (
                self.config_file
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("./config.yaml")),
                EmbeddedConfig::get("config.yaml").map(|f| f.data),
            ),
            (
                self.colors_file
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(format!("./{DEFAULT_COLORS}"))),
                EmbeddedPalettes::get(DEFAULT_COLORS).map(|f| f.data),
            ),
        ];

        for (path, data) in targets {
            if !force && path.exists() {
                report.skipped.push(path.display().to_string());
                continue;
            }
            let Some(data) = data else {
                continue;
            };
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &*data)?;
            report.written.push(path.display().to_string());
        }

        Ok(report)
    }

    /// Names of all embedded assets
    pub fn list_embedded() -> Vec<String> {
        let mut names: Vec<String> = EmbeddedConfig::iter().map(|s| s.to_string()).collect();
        names.extend(EmbeddedPalettes::iter().map(|s| format!("palettes/{s}")));
        names
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    pub fn colors_file(&self) -> Option<&Path> {
        self.colors_file.as_deref()
    }

    pub fn fonts_dir(&self) -> Option<&Path> {
        self.fonts_dir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let loader = AssetLoader::new(None, None, None);
        let content = loader.read_config_string().unwrap();
        let config: crate::models::AppConfig = serde_yaml::from_str(&content).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_embedded_colors_present() {
        let loader = AssetLoader::new(None, None, None);
        let data = loader.read_colors(None).unwrap();
        assert!(!data.is_empty());
        assert!(AssetLoader::list_embedded().contains(&"palettes/colors.json".to_string()));
    }

    #[test]
    fn test_missing_override_falls_back_to_embedded() {
        let loader = AssetLoader::new(
            Some(PathBuf::from("/nonexistent/config.yaml")),
            Some(PathBuf::from("/nonexistent/colors.json")),
            None,
        );
        assert!(loader.read_config().is_ok());
        assert!(loader.read_colors(None).is_ok());
    }

    #[test]
    fn test_explicit_colors_path_must_exist() {
        let loader = AssetLoader::new(None, None, None);
        assert!(loader
            .read_colors(Some(Path::new("/nonexistent/colors.json")))
            .is_err());
    }

    #[test]
    fn test_external_config_overrides_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "colors:\n  count: 3\n").unwrap();

        let loader = AssetLoader::new(Some(path), None, None);
        assert_eq!(loader.read_config_string().unwrap(), "colors:\n  count: 3\n");
    }

    #[test]
    fn test_init_writes_then_skips() {
        let dir = tempfile::tempdir().unwrap();
        let loader = AssetLoader::new(
            Some(dir.path().join("config.yaml")),
            Some(dir.path().join("colors.json")),
            None,
        );

        let report = loader.init(false).unwrap();
        assert_eq!(report.written.len(), 2);
        assert!(report.skipped.is_empty());

        let report = loader.init(false).unwrap();
        assert!(report.written.is_empty());
        assert_eq!(report.skipped.len(), 2);

        let report = loader.init(true).unwrap();
        assert_eq!(report.written.len(), 2);
    }

    #[test]
    fn test_fonts_only_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.ttf"), b"not really a font").unwrap();
        fs::write(dir.path().join("readme.txt"), b"skip me").unwrap();

        let loader = AssetLoader::new(None, None, Some(dir.path().to_path_buf()));
        let fonts = loader.get_fonts();
        assert_eq!(fonts.len(), 1);
        assert_eq!(fonts[0].0, "a.ttf");

        assert!(AssetLoader::new(None, None, None).get_fonts().is_empty());
    }
}
