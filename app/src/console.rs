//! A line-oriented presenter for terminals.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use todo_sync_core::presenter::Presenter;
use todo_sync_core::todo::Todo;
use todo_sync_core::view::{GroupedView, Highlight, Scope};

/// Presenter that prints frames as plain text
///
/// Write errors are logged and otherwise ignored; a broken terminal must not
/// take the reconciler down with it.
pub struct ConsolePresenter<W> {
    out: Mutex<W>,
}

impl ConsolePresenter<io::Stdout> {
    /// Print to standard output
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsolePresenter<W> {
    /// Print to `out`
    pub const fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!(%error, "Could not write to console");
        }
    }
}

fn todo_line(todo: &Todo) -> String {
    let mark = if todo.completed { 'x' } else { ' ' };
    let mut line = format!("  [{mark}] #{:<4} {}", todo.id.as_str(), todo.title);
    if let Some(due) = todo.due_date() {
        line.push_str(&format!("  ({}/{})", due.month, due.year));
    }
    line
}

fn sidebar_line(label: &str, grouped: &GroupedView, scope: Scope, highlight: Highlight) -> String {
    let marker = |selected: bool| if selected { "*" } else { "" };
    let scope_selected = highlight.scope == scope && highlight.bucket.is_none();

    let buckets: Vec<String> = grouped
        .groups()
        .iter()
        .map(|group| {
            let selected = highlight.scope == scope && highlight.bucket == Some(group.bucket);
            format!("{}{} ({})", marker(selected), group.bucket, group.todos.len())
        })
        .collect();

    format!(
        "{}{label} ({}): {}",
        marker(scope_selected),
        grouped.todo_count(),
        if buckets.is_empty() {
            "-".to_string()
        } else {
            buckets.join(", ")
        }
    )
}

impl<W: Write + Send> Presenter for ConsolePresenter<W> {
    fn render_list(&self, todos: &[Todo], header: &str, count: usize) {
        let mut frame = format!("\n== {header} ({count}) ==\n");
        if todos.is_empty() {
            frame.push_str("  (nothing here)\n");
        }
        for todo in todos {
            frame.push_str(&todo_line(todo));
            frame.push('\n');
        }
        self.emit(&frame);
    }

    fn render_sidebar(&self, all: &GroupedView, completed: &GroupedView, highlight: Highlight) {
        let frame = format!(
            "-- {}\n-- {}\n",
            sidebar_line(Scope::All.label(), all, Scope::All, highlight),
            sidebar_line(Scope::Completed.label(), completed, Scope::Completed, highlight),
        );
        self.emit(&frame);
    }

    fn open_modal(&self) {
        self.emit("[form open] save <title> [| description [| month/year]] or cancel\n");
    }

    fn close_modal(&self) {
        self.emit("[form closed]\n");
    }

    fn populate_form(&self, todo: Option<&Todo>) {
        let text = match todo {
            Some(todo) => {
                let description = todo.description.as_deref().unwrap_or("");
                let due = todo
                    .due_date()
                    .map(|due| format!("{}/{}", due.month, due.year))
                    .unwrap_or_default();
                format!("editing #{}: {} | {} | {}\n", todo.id, todo.title, description, due)
            },
            None => "new todo\n".to_string(),
        };
        self.emit(&text);
    }

    fn notify(&self, message: &str) {
        self.emit(&format!("! {message}\n"));
    }
}
