//! Site and album configuration.
//!
//! ## Site config
//!
//! `diapositive.toml` lives in the photo directory (or is passed with
//! `--config`):
//!
//! ```toml
//! base_url = "https://photos.example.org"   # required
//! title = "diapositive"                       # site title
//! thumb_size = 512                            # max thumbnail edge (px)
//! image_size = 2500                           # max full-size edge (px)
//!
//! [copyright]                                 # required
//! artist = "Jo Doe"                           # required
//! years = "2019-2024"                         # default: current year
//! licence = "CC BY-SA 4.0"                    # default: "all rights reserved"
//!
//! [processing]
//! max_processes = 4                           # omit for auto = CPU cores
//! ```
//!
//! ## Album config
//!
//! An optional `album.toml` inside an album directory:
//!
//! ```toml
//! title = "Summer in Lisbon"   # default: the album slug
//! cover = 3                    # 1-based photo index, default 1
//! ```
//!
//! Unknown keys are rejected in both files to catch typos early.

use chrono::Datelike;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const SITE_CONFIG_FILE: &str = "diapositive.toml";
pub const ALBUM_CONFIG_FILE: &str = "album.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("missing copyright info")]
    MissingCopyright,
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `diapositive.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    pub base_url: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_thumb_size")]
    pub thumb_size: u32,
    #[serde(default = "default_image_size")]
    pub image_size: u32,
    /// Optional at the parse level so its absence is reported as
    /// [`ConfigError::MissingCopyright`] rather than a generic TOML error.
    #[serde(default)]
    pub copyright: Option<Copyright>,
    #[serde(default)]
    pub processing: ProcessingConfig,
}

fn default_title() -> String {
    "diapositive".to_string()
}

fn default_thumb_size() -> u32 {
    512
}

fn default_image_size() -> u32 {
    2500
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.copyright.is_none() {
            return Err(ConfigError::MissingCopyright);
        }
        if self.thumb_size == 0 {
            return Err(ConfigError::Validation(
                "thumb_size must be non-zero".into(),
            ));
        }
        if self.image_size == 0 {
            return Err(ConfigError::Validation(
                "image_size must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Copyright notice embedded into every generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Copyright {
    pub artist: String,
    #[serde(default = "current_year", deserialize_with = "years_from_toml")]
    pub years: String,
    #[serde(default = "default_licence")]
    pub licence: String,
}

impl Copyright {
    /// The line written into the EXIF `Copyright` tag.
    pub fn notice(&self) -> String {
        format!("{}, {}", self.artist, self.licence)
    }
}

fn current_year() -> String {
    chrono::Local::now().year().to_string()
}

fn default_licence() -> String {
    "all rights reserved".to_string()
}

/// `years = 2024` and `years = "2019-2024"` are both accepted.
fn years_from_toml<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Years {
        Text(String),
        Number(i64),
    }

    Ok(match Years::deserialize(deserializer)? {
        Years::Text(s) => s,
        Years::Number(n) => n.to_string(),
    })
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Per-album settings from `album.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlbumConfig {
    pub title: Option<String>,
    /// Signed so that `0` or negative values reach cover validation
    /// instead of failing the parse.
    pub cover: Option<i64>,
}

/// Load and validate the site config at `path`.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: SiteConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load `album.toml` from an album directory. `None` when the file is absent.
pub fn load_album_config(album_dir: &Path) -> Result<Option<AlbumConfig>, ConfigError> {
    let path = album_dir.join(ALBUM_CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    Ok(Some(toml::from_str(&content)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"
base_url = "https://example.org/"

[copyright]
artist = "Jo Doe"
"#;

    fn write_config(content: &str) -> (TempDir, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(SITE_CONFIG_FILE);
        fs::write(&path, content).unwrap();
        (tmp, path)
    }

    // =========================================================================
    // Site config
    // =========================================================================

    #[test]
    fn minimal_config_gets_defaults() {
        let (_tmp, path) = write_config(MINIMAL);
        let config = load_config(&path).unwrap();

        assert_eq!(config.base_url, "https://example.org/");
        assert_eq!(config.title, "diapositive");
        assert_eq!(config.thumb_size, 512);
        assert_eq!(config.image_size, 2500);
        assert_eq!(config.processing.max_processes, None);

        let copyright = config.copyright.unwrap();
        assert_eq!(copyright.artist, "Jo Doe");
        assert_eq!(copyright.licence, "all rights reserved");
        assert_eq!(copyright.years, chrono::Local::now().year().to_string());
    }

    #[test]
    fn full_config_overrides_defaults() {
        let (_tmp, path) = write_config(
            r#"
base_url = ""
title = "Holidays"
thumb_size = 300
image_size = 1600

[copyright]
artist = "Jo Doe"
years = "2019-2024"
licence = "CC BY-SA 4.0"

[processing]
max_processes = 2
"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.title, "Holidays");
        assert_eq!(config.thumb_size, 300);
        assert_eq!(config.image_size, 1600);
        assert_eq!(config.processing.max_processes, Some(2));
        let copyright = config.copyright.unwrap();
        assert_eq!(copyright.years, "2019-2024");
        assert_eq!(copyright.notice(), "Jo Doe, CC BY-SA 4.0");
    }

    #[test]
    fn integer_years_accepted() {
        let (_tmp, path) = write_config(
            "base_url = \"\"\n[copyright]\nartist = \"A\"\nyears = 2021\n",
        );
        assert_eq!(load_config(&path).unwrap().copyright.unwrap().years, "2021");
    }

    #[test]
    fn missing_copyright_is_rejected() {
        let (_tmp, path) = write_config("base_url = \"https://example.org\"\n");
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::MissingCopyright)
        ));
    }

    #[test]
    fn missing_artist_is_a_parse_error() {
        let (_tmp, path) = write_config("base_url = \"\"\n[copyright]\nlicence = \"x\"\n");
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn missing_base_url_is_a_parse_error() {
        let (_tmp, path) = write_config("[copyright]\nartist = \"A\"\n");
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_keys_rejected() {
        let (_tmp, path) = write_config(&format!("{MINIMAL}\n[extra]\nkey = 1\n"));
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn zero_sizes_rejected() {
        let (_tmp, path) = write_config(&format!("thumb_size = 0\n{MINIMAL}"));
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));

        let (_tmp, path) = write_config(&format!("image_size = 0\n{MINIMAL}"));
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(&tmp.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    // =========================================================================
    // Processing
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_clamped() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(100_000),
        };
        assert_eq!(effective_threads(&config), cores);

        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // Album config
    // =========================================================================

    #[test]
    fn album_config_absent() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(load_album_config(tmp.path()).unwrap(), None);
    }

    #[test]
    fn album_config_parsed() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(ALBUM_CONFIG_FILE),
            "title = \"Lisbon\"\ncover = 3\n",
        )
        .unwrap();
        let config = load_album_config(tmp.path()).unwrap().unwrap();
        assert_eq!(config.title.as_deref(), Some("Lisbon"));
        assert_eq!(config.cover, Some(3));
    }

    #[test]
    fn album_config_partial() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(ALBUM_CONFIG_FILE), "cover = -1\n").unwrap();
        let config = load_album_config(tmp.path()).unwrap().unwrap();
        assert_eq!(config.title, None);
        assert_eq!(config.cover, Some(-1));
    }

    #[test]
    fn album_config_unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(ALBUM_CONFIG_FILE), "titel = \"typo\"\n").unwrap();
        assert!(matches!(
            load_album_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }
}
