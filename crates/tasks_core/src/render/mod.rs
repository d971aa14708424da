use crate::model::Task;

/// Push interface to whatever is displaying the lists. Called after every
/// mutation with the full, current contents of the affected list.
pub trait Renderer {
    fn render_tasks(&self, tasks: &[Task]);

    fn render_completed_tasks(&self, completed: &[Task]);
}

pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn render_tasks(&self, _tasks: &[Task]) {}

    fn render_completed_tasks(&self, _completed: &[Task]) {}
}
