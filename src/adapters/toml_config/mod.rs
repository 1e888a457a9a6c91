//! TOML configuration file support
//!
//! Every field is optional; missing fields fall back to the built-in
//! defaults so an empty or absent file is always valid.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{WebpcutError, WebpcutResult};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Explicit path to the encode engine binary.
    pub ffmpeg_path: Option<PathBuf>,
    /// Explicit path to the probe binary.
    pub ffprobe_path: Option<PathBuf>,
    #[serde(default)]
    pub defaults: Defaults,
}

/// Parameter defaults applied when the command line leaves them unset.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_quality")]
    pub quality: u32,
    #[serde(default = "default_speed")]
    pub speed: f64,
}

fn default_fps() -> u32 {
    30
}

fn default_quality() -> u32 {
    80
}

fn default_speed() -> f64 {
    1.0
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            quality: default_quality(),
            speed: default_speed(),
        }
    }
}

impl Config {
    /// Load from `path` when given, else from `webpcut.toml` next to the
    /// working directory when present, else the defaults.
    pub fn load(path: Option<&Path>) -> WebpcutResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let implicit = Path::new("webpcut.toml");
                if implicit.is_file() {
                    Self::from_file(implicit)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> WebpcutResult<Self> {
        debug!(path = %path.display(), "loading configuration");
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| {
            WebpcutError::validation(format!("invalid config {}: {e}", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.defaults.fps, 30);
        assert_eq!(config.defaults.quality, 80);
        assert!((config.defaults.speed - 1.0).abs() < 1e-9);
    }

    #[test]
    fn partial_defaults_keep_the_rest() {
        let config: Config = toml::from_str("[defaults]\nfps = 12\n").unwrap();
        assert_eq!(config.defaults.fps, 12);
        assert_eq!(config.defaults.quality, 80);
    }

    #[test]
    fn binary_paths_parse() {
        let config: Config =
            toml::from_str("ffmpeg_path = \"/opt/ffmpeg\"\nffprobe_path = \"/opt/ffprobe\"\n")
                .unwrap();
        assert_eq!(config.ffmpeg_path, Some(PathBuf::from("/opt/ffmpeg")));
        assert_eq!(config.ffprobe_path, Some(PathBuf::from("/opt/ffprobe")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("fps_cap = 90\n").is_err());
    }

    #[test]
    fn load_reads_an_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("webpcut.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[defaults]\nquality = 55").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.defaults.quality, 55);
    }

    #[test]
    fn load_with_missing_explicit_file_fails() {
        assert!(Config::load(Some(Path::new("/no/such/webpcut.toml"))).is_err());
    }
}
