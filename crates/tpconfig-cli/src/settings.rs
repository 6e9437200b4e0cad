//! User settings for the `tpconfig` tool.
//!
//! Settings live at `~/.config/tpconfig/config.json` and supply defaults for
//! options that are tedious to pass on every call, such as the tp_config
//! path.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tpconfig_tree::SUMMARY_GROUP_LIMIT;
use tracing::{debug, info};

/// Placeholder printed for attributes that are not set.
pub const DEFAULT_MISSING: &str = "N/A";

/// User settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// tp_config file to read when neither `--file` nor `TPCONFIG_FILE` is given.
    pub config_file: Option<PathBuf>,
    /// How many server groups the summary lists.
    pub summary_group_limit: usize,
    /// Placeholder for missing attributes.
    pub missing: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_file: None,
            summary_group_limit: SUMMARY_GROUP_LIMIT,
            missing: DEFAULT_MISSING.to_string(),
        }
    }
}

impl Settings {
    /// Pick the tp_config file: an explicit path first, then the settings file.
    pub fn resolve_config_file(&self, explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit.or_else(|| self.config_file.clone())
    }
}

/// Get the path to the settings file.
///
/// Returns `~/.config/tpconfig/config.json` on Unix, or the equivalent
/// platform-specific config directory elsewhere.
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tpconfig").join("config.json"))
}

/// Load settings from the default location.
///
/// Returns defaults if there is no config directory or no settings file.
pub fn load_settings() -> Result<Settings, LoadSettingsError> {
    let Some(path) = settings_path() else {
        debug!("No config directory available");
        return Ok(Settings::default());
    };
    load_settings_from(&path)
}

/// Load settings from `path`, falling back to defaults if it does not exist.
pub fn load_settings_from(path: &Path) -> Result<Settings, LoadSettingsError> {
    if !path.exists() {
        debug!(?path, "Settings file does not exist");
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| LoadSettingsError::Io {
        path: path.to_path_buf(),
        error: e,
    })?;

    let settings: Settings =
        serde_json::from_str(&content).map_err(|e| LoadSettingsError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

    info!(?path, "Loaded settings");
    Ok(settings)
}

/// Error loading the settings file.
#[derive(Debug)]
pub enum LoadSettingsError {
    Io { path: PathBuf, error: std::io::Error },
    Parse { path: PathBuf, error: String },
}

impl std::fmt::Display for LoadSettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadSettingsError::Io { path, error } => {
                write!(f, "Failed to read settings at {}: {}", path.display(), error)
            }
            LoadSettingsError::Parse { path, error } => {
                write!(f, "Failed to parse settings at {}: {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for LoadSettingsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.summary_group_limit, 20);
        assert_eq!(settings.missing, "N/A");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "config_file": "/opt/tmax/config/tp_config" }"#).unwrap();

        let settings = load_settings_from(&path).unwrap();
        assert_eq!(
            settings.config_file.as_deref(),
            Some(Path::new("/opt/tmax/config/tp_config"))
        );
        assert_eq!(settings.missing, DEFAULT_MISSING);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "summary_group_limit": "lots" }"#).unwrap();

        let error = load_settings_from(&path).unwrap_err();
        assert!(matches!(error, LoadSettingsError::Parse { .. }));
        assert!(error.to_string().starts_with("Failed to parse settings at"));
    }

    #[test]
    fn explicit_path_wins() {
        let settings = Settings {
            config_file: Some(PathBuf::from("from-settings")),
            ..Settings::default()
        };
        assert_eq!(
            settings.resolve_config_file(Some(PathBuf::from("explicit"))),
            Some(PathBuf::from("explicit"))
        );
        assert_eq!(
            settings.resolve_config_file(None),
            Some(PathBuf::from("from-settings"))
        );
        assert_eq!(Settings::default().resolve_config_file(None), None);
    }
}
