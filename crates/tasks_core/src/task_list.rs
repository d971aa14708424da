use crate::error::AppError;
use crate::model::{ListKind, Task, TaskState};
use crate::render::Renderer;
use crate::storage::json_store::{self, LoadOutcome};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Commands a front end may send. Every mutation pushes the affected list(s)
/// to the renderer; state is never returned.
pub trait TaskCommands {
    fn add_task(&mut self, text: &str);

    fn delete_task(&mut self, index: usize) -> Result<(), AppError>;

    /// Files `text` under completed and removes `pending[index]`. The index
    /// is checked before either list changes.
    fn complete_task(&mut self, text: &str, index: usize) -> Result<(), AppError>;

    fn delete_completed_task(&mut self, index: usize) -> Result<(), AppError>;

    fn refresh(&self);

    fn save(&self) -> Result<(), AppError>;
}

/// Owns both lists, the store they persist to, and the renderer they are
/// pushed through.
pub struct TaskList<R: Renderer> {
    state: TaskState,
    store_path: PathBuf,
    renderer: R,
}

pub struct Opened<R: Renderer> {
    pub tasks: TaskList<R>,
    /// Set when the store was missing or unreadable and the lists start empty.
    pub notice: Option<String>,
}

impl<R: Renderer> TaskList<R> {
    pub fn new(store_path: PathBuf, renderer: R) -> Self {
        Self::with_state(store_path, renderer, TaskState::default())
    }

    pub fn with_state(store_path: PathBuf, renderer: R, state: TaskState) -> Self {
        Self {
            state,
            store_path,
            renderer,
        }
    }

    /// Startup: hydrate from the store and render what was loaded.
    pub fn open(store_path: PathBuf, renderer: R) -> Result<Opened<R>, AppError> {
        let outcome = json_store::load_state(&store_path)?;
        let notice = outcome.notice(&store_path);
        let loaded = matches!(outcome, LoadOutcome::Loaded(_));

        let tasks = Self::with_state(store_path, renderer, outcome.into_state());
        if loaded {
            tasks.refresh();
        }

        Ok(Opened { tasks, notice })
    }

    /// Shutdown: persist whatever is in memory.
    pub fn close(self) -> Result<(), AppError> {
        self.save()
    }

    pub fn pending(&self) -> &[Task] {
        &self.state.pending
    }

    pub fn completed(&self) -> &[Task] {
        &self.state.completed
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Completes `pending[index]` using the text currently stored there.
    pub fn complete_task_at(&mut self, index: usize) -> Result<(), AppError> {
        let text = self.checked(ListKind::Pending, index)?.text.clone();
        self.complete_task(&text, index)
    }

    fn checked(&self, kind: ListKind, index: usize) -> Result<&Task, AppError> {
        let list = self.state.list(kind);
        list.get(index)
            .ok_or_else(|| AppError::index_out_of_range(kind, index, list.len()))
    }
}

impl<R: Renderer> TaskCommands for TaskList<R> {
    fn add_task(&mut self, text: &str) {
        self.state.pending.push(Task::new(text));
        debug!(len = self.state.pending.len(), "added task");
        self.renderer.render_tasks(&self.state.pending);
    }

    fn delete_task(&mut self, index: usize) -> Result<(), AppError> {
        self.checked(ListKind::Pending, index)?;
        let removed = self.state.pending.remove(index);
        debug!(index, task = %removed, "deleted task");
        self.renderer.render_tasks(&self.state.pending);
        Ok(())
    }

    fn complete_task(&mut self, text: &str, index: usize) -> Result<(), AppError> {
        let current = self.checked(ListKind::Pending, index)?;
        if current.text != text {
            warn!(index, expected = %current, given = text, "completing with a different label");
        }

        self.state.completed.push(Task::new(text));
        self.state.pending.remove(index);
        debug!(index, task = text, "completed task");
        self.renderer.render_tasks(&self.state.pending);
        self.renderer.render_completed_tasks(&self.state.completed);
        Ok(())
    }

    fn delete_completed_task(&mut self, index: usize) -> Result<(), AppError> {
        self.checked(ListKind::Completed, index)?;
        let removed = self.state.completed.remove(index);
        debug!(index, task = %removed, "deleted completed task");
        self.renderer.render_completed_tasks(&self.state.completed);
        Ok(())
    }

    fn refresh(&self) {
        self.renderer.render_tasks(&self.state.pending);
        self.renderer.render_completed_tasks(&self.state.completed);
    }

    fn save(&self) -> Result<(), AppError> {
        json_store::save_state(&self.store_path, &self.state)
    }
}
