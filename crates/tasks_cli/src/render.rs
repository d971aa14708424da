use tabled::settings::Style;
use tabled::{Table, Tabled};
use tasks_core::config::Palette;
use tasks_core::model::Task;
use tasks_core::render::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Json,
}

/// Prints each pushed list to stdout, either as a table or as a one-line
/// JSON object keyed like the task store.
pub struct TerminalRenderer {
    palette: Palette,
    format: OutputFormat,
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Task")]
    text: String,
}

impl TerminalRenderer {
    pub fn new(palette: Palette, format: OutputFormat) -> Self {
        Self { palette, format }
    }

    fn format_list(&self, heading: &str, key: &str, tasks: &[Task]) -> String {
        match self.format {
            OutputFormat::Json => {
                let mut payload = serde_json::Map::new();
                payload.insert(key.to_string(), serde_json::json!(tasks));
                serde_json::Value::Object(payload).to_string()
            }
            OutputFormat::Plain => {
                let title = self
                    .palette
                    .accentize(&format!("{heading} ({})", tasks.len()));
                if tasks.is_empty() {
                    return format!("{title}\n{}", self.palette.mutedize("  (empty)"));
                }

                let rows = tasks.iter().enumerate().map(|(index, task)| TaskRow {
                    index,
                    text: task.text.clone(),
                });
                let mut table = Table::new(rows);
                table.with(Style::ascii());
                format!("{title}\n{table}")
            }
        }
    }
}

impl Renderer for TerminalRenderer {
    fn render_tasks(&self, tasks: &[Task]) {
        println!("{}", self.format_list("Tasks", "tasks", tasks));
    }

    fn render_completed_tasks(&self, completed: &[Task]) {
        println!(
            "{}",
            self.format_list("Completed", "completedTasks", completed)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{OutputFormat, TerminalRenderer};
    use tasks_core::config::palette_for_theme;
    use tasks_core::model::Task;

    fn renderer(format: OutputFormat) -> TerminalRenderer {
        TerminalRenderer::new(palette_for_theme(None), format)
    }

    #[test]
    fn json_output_uses_store_field_names() {
        let rendered = renderer(OutputFormat::Json).format_list(
            "Completed",
            "completedTasks",
            &[Task::from("Buy milk")],
        );

        assert_eq!(rendered, "{\"completedTasks\":[\"Buy milk\"]}");
    }

    #[test]
    fn plain_output_lists_positions_and_text() {
        let rendered = renderer(OutputFormat::Plain).format_list(
            "Tasks",
            "tasks",
            &[Task::from("Buy milk"), Task::from("Write report")],
        );

        assert!(rendered.starts_with("Tasks (2)\n"));
        assert!(rendered.contains("Buy milk"));
        assert!(rendered.contains("Write report"));
        assert!(rendered.contains("| 1 "));
    }

    #[test]
    fn plain_output_marks_empty_lists() {
        let rendered = renderer(OutputFormat::Plain).format_list("Tasks", "tasks", &[]);
        assert_eq!(rendered, "Tasks (0)\n  (empty)");
    }

    #[test]
    fn themed_heading_is_colored() {
        let themed = TerminalRenderer::new(palette_for_theme(Some("noir")), OutputFormat::Plain);
        let rendered = themed.format_list("Tasks", "tasks", &[]);
        assert!(rendered.starts_with("\x1b[38;5;208mTasks (0)\x1b[0m"));
    }
}
