use crate::config::Config;
use crate::error::AppError;
use crate::model::{Task, TaskState};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const STORE_FILE_NAME: &str = "Tasks.json";
const STORE_ENV_VAR: &str = "TASKS_STORE_PATH";
const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTasks {
    tasks: Vec<Task>,
    completed_tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredTasksRef<'a> {
    tasks: &'a [Task],
    completed_tasks: &'a [Task],
}

/// Result of reading the store at startup. Only `Loaded` carries data; the
/// other two are recoverable and leave both lists empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(TaskState),
    NotFound,
    Invalid { reason: String },
}

impl LoadOutcome {
    pub fn into_state(self) -> TaskState {
        match self {
            Self::Loaded(state) => state,
            Self::NotFound | Self::Invalid { .. } => TaskState::default(),
        }
    }

    pub fn notice(&self, path: &Path) -> Option<String> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match self {
            Self::Loaded(_) => None,
            Self::NotFound => Some(format!(
                "{name} not found, JSON file will be created when app closes."
            )),
            Self::Invalid { .. } => Some(format!(
                "Invalid JSON in {name}, JSON file will be updated when app closes."
            )),
        }
    }
}

pub fn store_path(config: &Config) -> PathBuf {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }

    config
        .store_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(STORE_FILE_NAME))
}

pub fn load_state(path: &Path) -> Result<LoadOutcome, AppError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "task store not found");
            return Ok(LoadOutcome::NotFound);
        }
        Err(err) if err.kind() == ErrorKind::InvalidData => {
            warn!(path = %path.display(), error = %err, "task store is not valid UTF-8");
            return Ok(LoadOutcome::Invalid {
                reason: err.to_string(),
            });
        }
        Err(err) => return Err(AppError::io(format!("{}: {}", path.display(), err))),
    };

    let body = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&content);
    match serde_json::from_str::<StoredTasks>(body) {
        Ok(stored) => {
            info!(
                path = %path.display(),
                pending = stored.tasks.len(),
                completed = stored.completed_tasks.len(),
                "loaded task store"
            );
            Ok(LoadOutcome::Loaded(TaskState::new(
                stored.tasks,
                stored.completed_tasks,
            )))
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "task store is not valid");
            Ok(LoadOutcome::Invalid {
                reason: err.to_string(),
            })
        }
    }
}

pub fn save_state(path: &Path, state: &TaskState) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let stored = StoredTasksRef {
        tasks: &state.pending,
        completed_tasks: &state.completed,
    };
    let mut content = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
    stored
        .serialize(&mut serializer)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    info!(
        path = %path.display(),
        pending = state.pending.len(),
        completed = state.completed.len(),
        "saved task store"
    );
    Ok(())
}
