use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "WALLHAVEN_API_KEY";

/// Which command-line tool drives the desktop background on Linux.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinuxBackend {
    #[default]
    Gnome,
    Swww,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub wallhaven_api_key: String,
    #[serde(default = "default_purity")]
    pub wallhaven_purity: String,
    #[serde(default = "default_wallhaven_url")]
    pub wallhaven_url: String,
    #[serde(default = "default_download_path")]
    pub download_path: PathBuf,
    #[serde(default)]
    pub copy_to_tmp: bool,
    #[serde(default)]
    pub linux_backend: LinuxBackend,
}

fn default_purity() -> String {
    String::from("100")
}

fn default_wallhaven_url() -> String {
    String::from(crate::wallhaven::SEARCH_URL)
}

fn default_download_path() -> PathBuf {
    std::env::temp_dir().join("wallpaper.jpg")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wallhaven_api_key: String::new(),
            wallhaven_purity: default_purity(),
            wallhaven_url: default_wallhaven_url(),
            download_path: default_download_path(),
            copy_to_tmp: false,
            linux_backend: LinuxBackend::default(),
        }
    }
}

pub fn config_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| String::from("."));

    Path::new(&home)
        .join(".config")
        .join("wallchanger")
}

pub fn config_file_path() -> PathBuf {
    config_dir().join("config.json")
}

pub fn load_or_create_config() -> Config {
    let cf = config_file_path();

    let mut cfg = if cf.exists() {
        load_config(&cf)
    } else {
        let cfg = Config::default();
        if let Err(e) = save_config(&cfg, &cf) {
            tracing::warn!(path = %cf.display(), "could not write default config: {e}");
        }
        cfg
    };

    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            cfg.wallhaven_api_key = key;
        }
    }

    cfg
}

pub fn load_config(path: &Path) -> Config {
    let data = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(path = %path.display(), "could not read config, using defaults: {e}");
            return Config::default();
        }
    };

    match serde_json::from_str::<Config>(&data) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(path = %path.display(), "invalid config, using defaults: {e}");
            Config::default()
        }
    }
}

pub fn save_config(cfg: &Config, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let data = serde_json::to_string_pretty(cfg).map_err(std::io::Error::other)?;
    fs::write(path, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: Config = serde_json::from_str(r#"{ "wallhaven_api_key": "abc" }"#).unwrap();

        assert_eq!(cfg.wallhaven_api_key, "abc");
        assert_eq!(cfg.wallhaven_purity, "100");
        assert_eq!(cfg.wallhaven_url, crate::wallhaven::SEARCH_URL);
        assert_eq!(cfg.linux_backend, LinuxBackend::Gnome);
        assert!(!cfg.copy_to_tmp);
    }

    #[test]
    fn backend_is_lowercase_in_json() {
        let cfg: Config = serde_json::from_str(r#"{ "linux_backend": "swww" }"#).unwrap();
        assert_eq!(cfg.linux_backend, LinuxBackend::Swww);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let cfg = Config {
            wallhaven_api_key: String::from("key"),
            copy_to_tmp: true,
            ..Config::default()
        };
        save_config(&cfg, &path).unwrap();

        assert_eq!(load_config(&path), cfg);
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(load_config(&path), Config::default());
    }
}
