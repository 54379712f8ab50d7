//! The presentation layer as seen by the reconciler.
//!
//! Markup, templates and input wiring live behind this trait. The reconciler
//! only ever calls it from effects, never from inside a reducer.

use crate::todo::Todo;
use crate::view::{GroupedView, Highlight};

/// Drawing and modal control for the todo UI
///
/// Implementations must be cheap to call from any task; the reconciler wraps
/// each call in its own effect.
pub trait Presenter: Send + Sync {
    /// Draw the main list with its header and count
    fn render_list(&self, todos: &[Todo], header: &str, count: usize);

    /// Draw the sidebar groupings and highlight the selected entry
    fn render_sidebar(&self, all: &GroupedView, completed: &GroupedView, highlight: Highlight);

    /// Show the edit/create modal
    fn open_modal(&self);

    /// Hide the edit/create modal
    fn close_modal(&self);

    /// Fill the form with `todo`, or clear it for a new todo
    fn populate_form(&self, todo: Option<&Todo>);

    /// Show a transient notification
    fn notify(&self, message: &str);
}
