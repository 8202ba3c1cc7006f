//! Viewer configuration (config.toml)
//!
//! Settings are stored in TOML format in the platform-specific config
//! directory, or loaded from an explicit `--config` path.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Failure to load an explicitly requested config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ViewerConfig {
    /// Window settings
    #[serde(default)]
    pub window: WindowConfig,
    /// Debug overlay settings
    #[serde(default)]
    pub debug: DebugConfig,
    /// Initial pose selection
    #[serde(default)]
    pub blend: BlendConfig,
    /// Render settings
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Inner width in logical pixels (default: 1280)
    #[serde(default = "default_width")]
    pub width: u32,
    /// Inner height in logical pixels (default: 720)
    #[serde(default = "default_height")]
    pub height: u32,
    /// Whether to enable vertical sync (default: true)
    #[serde(default = "default_true")]
    pub vsync: bool,
    #[serde(default = "default_title")]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Draw bones and joint markers over the mesh (default: true)
    #[serde(default = "default_true")]
    pub draw_bones: bool,
    /// Draw the host-skinned triangle wireframe (default: false)
    #[serde(default)]
    pub draw_wireframe: bool,
}

/// Which named poses the pointer blends between.
///
/// `None` picks the first two authored poses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BlendConfig {
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub right: Option<String>,
    /// Blend factor before the pointer first moves (default: 0.0)
    #[serde(default)]
    pub factor: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Linear RGBA clear color
    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 4],
}

fn default_width() -> u32 {
    1280
}
fn default_height() -> u32 {
    720
}
fn default_true() -> bool {
    true
}
fn default_title() -> String {
    "Skinning Demo".to_string()
}
fn default_clear_color() -> [f32; 4] {
    [0.05, 0.05, 0.07, 1.0]
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            vsync: default_true(),
            title: default_title(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            draw_bones: default_true(),
            draw_wireframe: false,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: default_clear_color(),
        }
    }
}

/// Returns the platform-specific configuration directory.
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.nethercore", "", "SkinningDemo")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default location of `config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Load a config file that must exist and parse.
pub fn load_from(path: &Path) -> Result<ViewerConfig, ConfigLoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the configuration.
///
/// An explicit path must exist and parse. Without one, `config.toml` is read
/// from the platform config directory; a missing or unreadable file there
/// yields the defaults.
pub fn load(explicit: Option<&Path>) -> Result<ViewerConfig, ConfigLoadError> {
    if let Some(path) = explicit {
        let config = load_from(path)?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }

    let Some(path) = default_config_path() else {
        return Ok(ViewerConfig::default());
    };
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ViewerConfig::default());
    }

    match load_from(&path) {
        Ok(config) => {
            tracing::info!("Loaded config from {}", path.display());
            Ok(config)
        }
        Err(e) => {
            tracing::warn!("{}; using defaults", e);
            Ok(ViewerConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = ViewerConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 720);
        assert!(config.window.vsync);
        assert!(config.debug.draw_bones);
        assert!(!config.debug.draw_wireframe);
        assert_eq!(config.blend.left, None);
        assert_eq!(config.blend.factor, 0.0);
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: ViewerConfig = toml::from_str("").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml_str = r#"
[window]
width = 800

[blend]
left = "wave"
factor = 0.25
"#;
        let config: ViewerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 720); // default
        assert_eq!(config.blend.left.as_deref(), Some("wave"));
        assert_eq!(config.blend.right, None);
        assert_eq!(config.blend.factor, 0.25);
        assert!(config.debug.draw_bones); // default
    }

    #[test]
    fn test_config_serialize_roundtrip() {
        let mut config = ViewerConfig::default();
        config.debug.draw_wireframe = true;
        config.blend.right = Some("shrug".into());
        config.render.clear_color = [0.1, 0.2, 0.3, 1.0];

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: ViewerConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[debug]\ndraw_wireframe = true").unwrap();

        let config = load(Some(file.path())).unwrap();
        assert!(config.debug.draw_wireframe);
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(matches!(
            load(Some(&path)),
            Err(ConfigLoadError::Read { .. })
        ));
    }

    #[test]
    fn test_load_explicit_invalid_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[window]\nwidth = \"wide\"").unwrap();
        assert!(matches!(
            load(Some(file.path())),
            Err(ConfigLoadError::Parse { .. })
        ));
    }
}
