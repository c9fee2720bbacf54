use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default break length in seconds
pub const DEFAULT_BREAK_TIME: u64 = 300;

/// User settings stored in settings.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Break length in seconds
    #[serde(default = "default_break_time")]
    pub break_time: u64,
    #[serde(default = "default_notifications")]
    pub notifications_enabled: bool,
}

fn default_break_time() -> u64 {
    DEFAULT_BREAK_TIME
}

fn default_notifications() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            break_time: DEFAULT_BREAK_TIME,
            notifications_enabled: true,
        }
    }
}

/// Load settings, falling back to defaults when the file is absent
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<AppSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(AppSettings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings: {}", path.display()))?;
    let settings: AppSettings = serde_json::from_str(&content)
        .with_context(|| format!("Invalid settings file: {}", path.display()))?;
    Ok(settings)
}

pub fn save_settings<P: AsRef<Path>>(path: P, settings: &AppSettings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_settings() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.break_time, 300);
        assert!(settings.notifications_enabled);
    }

    #[test]
    fn test_save_and_load_settings() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let settings = AppSettings {
            break_time: 600,
            notifications_enabled: false,
        };
        save_settings(&path, &settings).unwrap();

        assert_eq!(load_settings(&path).unwrap(), settings);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("breakTime"));
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{"breakTime": 120}"#).unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.break_time, 120);
        assert!(settings.notifications_enabled);
    }
}
