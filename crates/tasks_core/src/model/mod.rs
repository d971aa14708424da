mod task;

pub use task::{ListKind, Task, TaskState};
