//! Viewer configuration
//!
//! Loaded once at startup from a JSON file in the platform config directory:
//! - macOS: ~/Library/Application Support/solarview/config.json
//! - Linux: ~/.config/solarview/config.json
//! - Windows: %APPDATA%\solarview\config\config.json
//!
//! `SOLARVIEW_CONFIG` points at a different file. A missing file means defaults.

use anyhow::Context;
use bevy::prelude::*;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::star_systems::{PlanetRecord, SystemRecord};
use crate::view::ViewMode;

pub const CONFIG_ENV_VAR: &str = "SOLARVIEW_CONFIG";

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub api_base_url: String,
    pub systems_path: String,
    pub fetch_on_startup: bool,
    /// Upper bound on one `/api/systems/` request, connect to last byte.
    pub fetch_timeout_secs: u64,
    pub bloom: bool,
    /// Inbound view configuration; overrides the static catalog when present.
    pub initial: Option<InitialView>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            systems_path: "/api/systems/".to_string(),
            fetch_on_startup: true,
            fetch_timeout_secs: 15,
            bloom: true,
            initial: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialView {
    pub mode: Option<ViewMode>,
    pub planet_key: Option<usize>,
    pub planet_info: Option<HashMap<usize, PlanetRecord>>,
    pub system: Option<SystemRecord>,
}

impl ViewerConfig {
    /// Reads the config file, falling back to defaults on any error.
    ///
    /// Runs before the app's log plugin exists, so it prints directly.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            eprintln!("[CONFIG] no config directory, using defaults");
            return Self::default();
        };
        match Self::load_from_path(&path) {
            Ok(Some(config)) => {
                println!("[CONFIG] loaded {}", path.display());
                config
            }
            Ok(None) => {
                println!("[CONFIG] {} not found, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                eprintln!("[CONFIG] {:#}, using defaults", err);
                Self::default()
            }
        }
    }

    /// Returns `Ok(None)` if the file does not exist.
    pub fn load_from_path(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(config))
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    ProjectDirs::from("", "", "solarview").map(|dirs| dirs.config_dir().join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_file(test_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "solarview-config-{}-{}-{}",
            test_name,
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir.join("config.json")
    }

    #[test]
    fn missing_file_is_none() {
        let path = unique_temp_file("missing");
        assert!(ViewerConfig::load_from_path(&path).unwrap().is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let path = unique_temp_file("partial");
        fs::write(&path, r#"{"apiBaseUrl": "https://example.test", "bloom": false}"#).unwrap();

        let config = ViewerConfig::load_from_path(&path).unwrap().unwrap();

        assert_eq!(config.api_base_url, "https://example.test");
        assert!(!config.bloom);
        assert_eq!(config.systems_path, "/api/systems/");
        assert!(config.fetch_on_startup);
        assert_eq!(config.fetch_timeout_secs, 15);
        assert!(config.initial.is_none());
    }

    #[test]
    fn initial_view_is_parsed() {
        let path = unique_temp_file("initial");
        fs::write(
            &path,
            r#"{
                "initial": {
                    "mode": "singlePlanetView",
                    "planetKey": 0,
                    "planetInfo": {"0": {"name": "Earth"}}
                }
            }"#,
        )
        .unwrap();

        let config = ViewerConfig::load_from_path(&path).unwrap().unwrap();
        let initial = config.initial.expect("initial view");

        assert_eq!(initial.mode, Some(ViewMode::SinglePlanetView));
        assert_eq!(initial.planet_key, Some(0));
        assert_eq!(initial.planet_info.unwrap()[&0].name, "Earth");
        assert!(initial.system.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = unique_temp_file("malformed");
        fs::write(&path, "{ not json").unwrap();
        assert!(ViewerConfig::load_from_path(&path).is_err());
    }
}
