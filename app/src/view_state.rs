//! What the user is currently looking at.
//!
//! Every transition is total: calling one twice leaves the same state as
//! calling it once.

use todo_sync_core::todo::TodoId;
use todo_sync_core::view::{DueBucket, Highlight, Scope};

/// The modal's edit session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EditSession {
    /// No form open
    #[default]
    Closed,
    /// The form is open for a new todo
    Adding,
    /// The form is open for an existing todo
    Editing(TodoId),
}

/// Scope, bucket drill-down and edit session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    scope: Scope,
    active_bucket: Option<DueBucket>,
    session: EditSession,
}

impl ViewState {
    /// All todos, no bucket, no session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scope
    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    /// Bucket the list is restricted to, if any
    #[must_use]
    pub const fn active_bucket(&self) -> Option<DueBucket> {
        self.active_bucket
    }

    /// Current edit session
    #[must_use]
    pub const fn session(&self) -> &EditSession {
        &self.session
    }

    /// Id of the todo being edited
    #[must_use]
    pub const fn editing_id(&self) -> Option<&TodoId> {
        match &self.session {
            EditSession::Editing(id) => Some(id),
            EditSession::Closed | EditSession::Adding => None,
        }
    }

    /// True while the form is open for a new todo
    #[must_use]
    pub const fn is_adding(&self) -> bool {
        matches!(self.session, EditSession::Adding)
    }

    /// Sidebar entry to highlight
    #[must_use]
    pub const fn highlight(&self) -> Highlight {
        Highlight {
            scope: self.scope,
            bucket: self.active_bucket,
        }
    }

    /// Switch scope; the bucket drill-down is dropped
    pub const fn set_scope(&mut self, scope: Scope) {
        self.scope = scope;
        self.active_bucket = None;
    }

    /// Restrict the list to `bucket` under the current scope
    pub const fn set_active_bucket(&mut self, bucket: DueBucket) {
        self.active_bucket = Some(bucket);
    }

    /// Show the whole scope again
    pub const fn clear_active_bucket(&mut self) {
        self.active_bucket = None;
    }

    /// Open a session for a new todo
    pub fn begin_add(&mut self) {
        self.session = EditSession::Adding;
    }

    /// Open a session for the todo with `id`
    pub fn begin_edit(&mut self, id: TodoId) {
        self.session = EditSession::Editing(id);
    }

    /// Close whatever session is open
    pub fn end_session(&mut self) {
        self.session = EditSession::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_sync_core::todo::DueDate;

    #[test]
    fn scope_change_clears_bucket() {
        let mut view = ViewState::new();
        view.set_active_bucket(DueBucket::for_date(DueDate::new(3, 2024)));
        assert!(view.active_bucket().is_some());

        view.set_scope(Scope::Completed);
        assert_eq!(view.scope(), Scope::Completed);
        assert_eq!(view.active_bucket(), None);
    }

    #[test]
    fn bucket_keeps_scope() {
        let mut view = ViewState::new();
        view.set_scope(Scope::Completed);
        view.set_active_bucket(DueBucket::NoDueDate);

        assert_eq!(
            view.highlight(),
            Highlight {
                scope: Scope::Completed,
                bucket: Some(DueBucket::NoDueDate),
            }
        );
    }

    #[test]
    fn sessions() {
        let mut view = ViewState::new();
        view.begin_edit(TodoId::new("7"));
        assert_eq!(view.editing_id(), Some(&TodoId::new("7")));

        view.begin_add();
        assert!(view.is_adding());
        assert_eq!(view.editing_id(), None);

        view.end_session();
        view.end_session();
        assert_eq!(view.session(), &EditSession::Closed);
    }
}
