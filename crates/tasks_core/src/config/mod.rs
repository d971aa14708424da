use crate::error::AppError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKS_CONFIG_PATH";

#[derive(Debug, Clone)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn accentize(&self, text: &str) -> String {
        if self.accent.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.accent, text, self.reset)
        }
    }

    pub fn mutedize(&self, text: &str) -> String {
        if self.muted.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.muted, text, self.reset)
        }
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.map(canonical_theme_name).as_deref() {
        Some("noir") => Palette {
            accent: "\x1b[38;5;208m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        Some("solarized") => Palette {
            accent: "\x1b[38;5;108m",
            muted: "\x1b[38;5;250m",
            reset: "\x1b[0m",
        },
        _ => Palette {
            accent: "",
            muted: "",
            reset: "",
        },
    }
}

pub fn canonical_theme_name(raw: &str) -> String {
    let cleaned = canonicalize_key(raw);
    match cleaned.as_str() {
        "" | "vanilla" | "light" => "default".to_string(),
        "dark" | "dark_mode" | "darkmode" => "noir".to_string(),
        _ => cleaned,
    }
}

/// Lowercases `raw` and collapses every run of non-alphanumerics into a
/// single underscore, trimming underscores at both ends.
pub fn canonicalize_key(raw: &str) -> String {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    cleaned.trim_matches('_').to_string()
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub store_path: Option<PathBuf>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("tasks").join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tasks")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let mut config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    config.theme = config.theme.map(|name| canonical_theme_name(&name));
    Ok(config)
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(theme) = overrides.theme.as_deref() {
        merged.theme = Some(canonical_theme_name(theme));
    }

    if let Some(store_path) = overrides.store_path.as_ref() {
        merged.store_path = Some(store_path.clone());
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::{
        Config, ConfigOverrides, canonical_theme_name, canonicalize_key, load_config_from_path,
        load_config_with_fallback_from_path, merge_overrides, palette_for_theme,
    };
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("tasks-{nanos}-{file_name}"))
    }

    #[test]
    fn missing_config_yields_defaults_without_error() {
        let path = temp_path("missing-config.json");
        let result = load_config_with_fallback_from_path(&path);

        assert_eq!(result.config, Config::default());
        assert!(result.error.is_none());
    }

    #[test]
    fn invalid_config_yields_defaults_and_error() {
        let path = temp_path("invalid-config.json");
        fs::write(&path, "{ invalid json ").unwrap();

        let result = load_config_with_fallback_from_path(&path);
        fs::remove_file(&path).ok();

        assert_eq!(result.config, Config::default());
        assert_eq!(result.error.map(|err| err.code()), Some("invalid_data"));
    }

    #[test]
    fn valid_config_is_read_and_theme_normalized() {
        let path = temp_path("valid-config.json");
        let content = serde_json::json!({
            "theme": "Dark Mode",
            "store_path": "/tmp/elsewhere/Tasks.json"
        });
        fs::write(&path, serde_json::to_string(&content).unwrap()).unwrap();

        let loaded = load_config_from_path(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.theme.as_deref(), Some("noir"));
        assert_eq!(
            loaded.store_path,
            Some(PathBuf::from("/tmp/elsewhere/Tasks.json"))
        );
    }

    #[test]
    fn overrides_replace_file_values() {
        let base = Config {
            theme: Some("default".into()),
            store_path: Some(PathBuf::from("a.json")),
        };
        let overrides = ConfigOverrides {
            theme: Some("Solarized".into()),
            store_path: Some(PathBuf::from("b.json")),
        };

        let merged = merge_overrides(&base, &overrides);

        assert_eq!(merged.theme.as_deref(), Some("solarized"));
        assert_eq!(merged.store_path, Some(PathBuf::from("b.json")));
        assert_eq!(base.store_path, Some(PathBuf::from("a.json")));
    }

    #[test]
    fn empty_overrides_return_clone() {
        let base = Config {
            theme: Some("noir".into()),
            store_path: None,
        };

        assert_eq!(merge_overrides(&base, &ConfigOverrides::default()), base);
    }

    #[test]
    fn theme_names_are_canonicalized() {
        assert_eq!(canonical_theme_name("Vanilla"), "default");
        assert_eq!(canonical_theme_name("dark-mode"), "noir");
        assert_eq!(canonical_theme_name("  "), "default");
        assert_eq!(canonical_theme_name("Solarized"), "solarized");
        assert_eq!(canonicalize_key("--Store Path--"), "store_path");
    }

    #[test]
    fn palette_depends_on_theme() {
        assert!(palette_for_theme(Some("vanilla")).accent.is_empty());
        assert_eq!(palette_for_theme(Some("noir")).accent, "\x1b[38;5;208m");
        assert!(palette_for_theme(Some("oceanic")).muted.is_empty());
        assert!(palette_for_theme(None).accent.is_empty());
    }
}
