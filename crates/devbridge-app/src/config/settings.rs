//! Settings parser for .devbridge/config.toml

use super::types::Settings;
use devbridge_core::prelude::*;
use devbridge_core::ScreenNode;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.toml";
const DEVBRIDGE_DIR: &str = ".devbridge";

/// Location of the config file under `project_path`
pub fn config_path(project_path: &Path) -> PathBuf {
    project_path.join(DEVBRIDGE_DIR).join(CONFIG_FILENAME)
}

/// Load settings from `.devbridge/config.toml`.
///
/// Never fails: a missing, unreadable or invalid file yields defaults.
pub fn load_settings(project_path: &Path) -> Settings {
    load_settings_file(&config_path(project_path))
}

/// Load settings from an explicit file, falling back to defaults
pub fn load_settings_file(path: &Path) -> Settings {
    match read_settings(path) {
        Ok(Some(settings)) => {
            debug!("Loaded settings from {:?}", path);
            settings
        }
        Ok(None) => {
            debug!("No config file at {:?}, using defaults", path);
            Settings::default()
        }
        Err(e) => {
            warn!("Ignoring {:?}: {}", path, e);
            Settings::default()
        }
    }
}

/// Load settings from `.devbridge/config.toml`, surfacing invalid content.
///
/// A missing file still yields defaults.
pub fn load_settings_strict(project_path: &Path) -> Result<Settings> {
    load_settings_file_strict(&config_path(project_path))
}

/// Strict variant of [`load_settings_file`]
pub fn load_settings_file_strict(path: &Path) -> Result<Settings> {
    Ok(read_settings(path)?.unwrap_or_default())
}

fn read_settings(path: &Path) -> Result<Option<Settings>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config_invalid(format!("Failed to read {:?}: {}", path, e)))?;
    let settings: Settings = toml::from_str(&content)
        .map_err(|e| Error::config_invalid(format!("Failed to parse {:?}: {}", path, e)))?;
    settings.validate()?;
    Ok(Some(settings))
}

/// Load a foreground screen tree from a JSON fixture.
///
/// Relative paths resolve against `base`.
pub fn load_screen_fixture(base: &Path, fixture: &Path) -> Result<ScreenNode> {
    let path = if fixture.is_absolute() {
        fixture.to_path_buf()
    } else {
        base.join(fixture)
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::config(format!("Failed to read screen fixture {:?}: {}", path, e)))?;
    let root = serde_json::from_str(&content).map_err(|e| {
        Error::config_invalid(format!("Invalid screen fixture {:?}: {}", path, e))
    })?;
    Ok(root)
}

/// Create a default config file in .devbridge/
pub fn init_config_dir(project_path: &Path) -> Result<()> {
    let devbridge_dir = project_path.join(DEVBRIDGE_DIR);

    if !devbridge_dir.exists() {
        std::fs::create_dir_all(&devbridge_dir)
            .map_err(|e| Error::config(format!("Failed to create .devbridge dir: {}", e)))?;
    }

    let config_path = devbridge_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        let default_content = r#"# devbridge configuration

[brightness]
curve = "gamma"         # "gamma" or "calibrated"
gamma = 2.2
max_level = 255
# Calibrated curve breakpoints: [upper_bound_percent, level]
# calibration = [[10, 4], [50, 52], [100, 255]]

[device]
sdk_level = 34
package_name = "dev.devbridge"
write_settings_granted = true
secure_settings_granted = false
max_volume = 15
installed_packages = []
unavailable_surfaces = []
display_reachable = true

[accessibility]
enabled = false
# screen_fixture = "screen.json"
"#;
        std::fs::write(&config_path, default_content)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::CurveKind;
    use tempfile::tempdir;

    fn write_config(project: &Path, content: &str) {
        let dir = project.join(DEVBRIDGE_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(CONFIG_FILENAME), content).unwrap();
    }

    #[test]
    fn test_load_settings_defaults() {
        let temp = tempdir().unwrap();
        let settings = load_settings(temp.path());

        assert_eq!(settings.brightness.curve, CurveKind::Gamma);
        assert_eq!(settings.brightness.gamma, 2.2);
        assert_eq!(settings.device.sdk_level, 34);
        assert!(!settings.accessibility.enabled);
    }

    #[test]
    fn test_load_settings_custom() {
        let temp = tempdir().unwrap();
        write_config(
            temp.path(),
            r#"
[brightness]
curve = "calibrated"
max_level = 100
calibration = [[25, 5], [75, 40], [100, 100]]

[device]
sdk_level = 22
write_settings_granted = false
installed_packages = ["com.google.android.gm"]

[accessibility]
enabled = true
screen_fixture = "screen.json"
"#,
        );

        let settings = load_settings(temp.path());

        assert_eq!(settings.brightness.curve, CurveKind::Calibrated);
        assert_eq!(
            settings.brightness.calibration,
            Some(vec![(25, 5), (75, 40), (100, 100)])
        );
        assert_eq!(settings.device.sdk_level, 22);
        assert!(!settings.device.write_settings_granted);
        assert_eq!(settings.device.max_volume, 15);
        assert_eq!(
            settings.accessibility.screen_fixture,
            Some(PathBuf::from("screen.json"))
        );
    }

    #[test]
    fn test_load_settings_invalid_toml() {
        let temp = tempdir().unwrap();
        write_config(temp.path(), "this is not [valid toml");

        let settings = load_settings(temp.path());
        assert_eq!(settings.brightness.max_level, 255);

        let err = load_settings_strict(temp.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }

    #[test]
    fn test_strict_rejects_bad_calibration() {
        let temp = tempdir().unwrap();
        write_config(
            temp.path(),
            r#"
[brightness]
curve = "calibrated"
calibration = [[50, 100], [40, 120]]
"#,
        );

        assert!(load_settings_strict(temp.path()).is_err());
        assert!(load_settings(temp.path()).brightness.calibration.is_none());
    }

    #[test]
    fn test_strict_missing_file_is_default() {
        let temp = tempdir().unwrap();
        let settings = load_settings_strict(temp.path()).unwrap();
        assert_eq!(settings.device.package_name, "dev.devbridge");
    }

    #[test]
    fn test_init_config_dir_writes_loadable_default() {
        let temp = tempdir().unwrap();
        init_config_dir(temp.path()).unwrap();

        assert!(config_path(temp.path()).exists());
        let settings = load_settings_strict(temp.path()).unwrap();
        assert_eq!(settings.brightness.max_level, 255);
        assert!(settings.device.write_settings_granted);
    }

    #[test]
    fn test_init_config_dir_keeps_existing_file() {
        let temp = tempdir().unwrap();
        write_config(temp.path(), "[device]\nsdk_level = 21\n");

        init_config_dir(temp.path()).unwrap();

        assert_eq!(load_settings(temp.path()).device.sdk_level, 21);
    }

    #[test]
    fn test_load_screen_fixture_relative() {
        let temp = tempdir().unwrap();
        std::fs::write(
            temp.path().join("screen.json"),
            r#"{"text": "Inbox", "children": [{"contentDescription": "Compose"}]}"#,
        )
        .unwrap();

        let root = load_screen_fixture(temp.path(), Path::new("screen.json")).unwrap();
        assert_eq!(root.text.as_deref(), Some("Inbox"));
        assert_eq!(root.children[0].description.as_deref(), Some("Compose"));
    }

    #[test]
    fn test_load_screen_fixture_errors() {
        let temp = tempdir().unwrap();
        assert!(load_screen_fixture(temp.path(), Path::new("missing.json")).is_err());

        std::fs::write(temp.path().join("bad.json"), "[1, 2").unwrap();
        let err = load_screen_fixture(temp.path(), Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }
}
