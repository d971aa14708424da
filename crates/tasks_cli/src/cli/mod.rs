use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tasks_core::config::{ConfigOverrides, canonicalize_key};
use tasks_core::error::AppError;

#[derive(Parser, Debug)]
#[command(name = "tasks", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a task to the end of the pending list (surrounding whitespace is
    /// trimmed; blank text is rejected)
    ///
    /// Example: tasks add "Buy milk"
    Add { text: String },
    /// Delete a pending task by position (0-based)
    ///
    /// Example: tasks delete 0
    Delete {
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    /// Move a pending task to the completed list
    ///
    /// Example: tasks done 0
    /// Example: tasks done 0 "Buy milk"
    Done {
        #[arg(allow_negative_numbers = true)]
        index: i64,
        /// Text to file under completed; defaults to the task at INDEX
        text: Option<String>,
    },
    /// Delete a completed task by position (0-based)
    ///
    /// Example: tasks delete-completed 0
    DeleteCompleted {
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    /// Show both lists
    ///
    /// Example: tasks list
    List,
    /// Write both lists to the task store now
    ///
    /// Example: tasks save
    Save,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    StorePath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let key = canonicalize_key(key_raw);
    if key.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    let target = match key.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "store_path" | "store" => {
            if value.is_empty() {
                return Err("store_path override requires a path".to_string());
            }
            ConfigOverrideTarget::StorePath
        }
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

/// Fold every `--config-override` value into one set; later values win.
pub fn collect_config_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry).map_err(AppError::invalid_input)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::StorePath => {
                overrides.store_path = Some(PathBuf::from(parsed.value))
            }
        }
    }
    Ok(overrides)
}
