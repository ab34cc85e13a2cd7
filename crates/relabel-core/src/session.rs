//! The single in-progress edit session.
//!
//! At most one row is edited at a time. The session holds a full draft copy
//! of the row, so background snapshot replacements never touch in-progress
//! edits; the draft shadows the store until it is committed or cancelled.

use crate::row::{Row, RowId};

/// Outcome of [`Editor::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginOutcome {
    /// No session was active; editing started.
    Started,
    /// A session for this row was already active; nothing changed.
    AlreadyEditing,
    /// A session for a different row was active; its unsaved edits were
    /// discarded and editing of the new row started.
    ReplacedPrevious,
}

/// A draft copy of one row, keyed by the row's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    draft: Row,
}

impl EditSession {
    fn new(row: &Row) -> Self {
        Self { draft: row.clone() }
    }

    /// Id of the row being edited.
    pub fn row_id(&self) -> RowId {
        self.draft.id
    }

    /// The draft row, including any in-progress edits.
    pub fn draft(&self) -> &Row {
        &self.draft
    }
}

/// Holder of the at-most-one active [`EditSession`].
#[derive(Debug, Clone, Default)]
pub struct Editor {
    session: Option<EditSession>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing `row`.
    ///
    /// Beginning an edit on the row already being edited is a no-op;
    /// beginning on a different row discards the previous session's unsaved
    /// edits.
    pub fn begin(&mut self, row: &Row) -> BeginOutcome {
        match &self.session {
            Some(session) if session.row_id() == row.id => BeginOutcome::AlreadyEditing,
            Some(_) => {
                self.session = Some(EditSession::new(row));
                BeginOutcome::ReplacedPrevious
            }
            None => {
                self.session = Some(EditSession::new(row));
                BeginOutcome::Started
            }
        }
    }

    /// Update a field of the draft. Only the local copy changes; the row
    /// store is untouched.
    ///
    /// `name` must be a schema field: unknown names are a programming error
    /// (fatal in debug builds, ignored in release). Returns `true` when the
    /// draft was updated.
    pub fn update_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        debug_assert!(Row::is_field(name), "unknown row field: {name}");
        match &mut self.session {
            Some(session) => session.draft.set_field(name, value),
            None => false,
        }
    }

    /// Discard the session. The store's value for the row becomes visible
    /// again.
    pub fn cancel(&mut self) -> Option<EditSession> {
        self.session.take()
    }

    /// Clear the session after a successful commit.
    pub fn clear(&mut self) {
        self.session = None;
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    /// The draft row of the active session, if any.
    pub fn draft(&self) -> Option<&Row> {
        self.session.as_ref().map(EditSession::draft)
    }

    /// Whether the active session (if any) is editing `id`.
    pub fn matches(&self, id: RowId) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.row_id() == id)
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::sample_row;

    #[test]
    fn test_begin_starts_session() {
        let mut editor = Editor::new();
        assert!(!editor.is_editing());

        assert_eq!(editor.begin(&sample_row(1)), BeginOutcome::Started);
        assert!(editor.matches(1));
        assert!(!editor.matches(2));
    }

    #[test]
    fn test_begin_same_row_is_noop() {
        let mut editor = Editor::new();
        editor.begin(&sample_row(1));
        editor.update_field("human_output", "draft text");

        assert_eq!(editor.begin(&sample_row(1)), BeginOutcome::AlreadyEditing);
        // The in-progress edit survives.
        assert_eq!(editor.draft().unwrap().human_output, "draft text");
    }

    #[test]
    fn test_begin_other_row_discards_previous_edits() {
        let mut editor = Editor::new();
        editor.begin(&sample_row(1));
        editor.update_field("human_output", "will be lost");
        editor.update_field("cdng", "CDNG-9");

        assert_eq!(editor.begin(&sample_row(2)), BeginOutcome::ReplacedPrevious);
        let draft = editor.draft().unwrap();
        assert_eq!(draft.id, 2);
        // No carry-over from the discarded session.
        assert_eq!(*draft, sample_row(2));
    }

    #[test]
    fn test_update_field_without_session() {
        let mut editor = Editor::new();
        assert!(!editor.update_field("human_output", "nobody home"));
    }

    #[test]
    fn test_cancel_discards_session() {
        let mut editor = Editor::new();
        editor.begin(&sample_row(1));
        editor.update_field("human_output", "unsaved");

        let discarded = editor.cancel().unwrap();
        assert_eq!(discarded.draft().human_output, "unsaved");
        assert!(!editor.is_editing());
        assert!(editor.cancel().is_none());
    }

    #[test]
    fn test_clear_after_commit() {
        let mut editor = Editor::new();
        editor.begin(&sample_row(1));
        editor.clear();
        assert!(!editor.is_editing());
    }
}
