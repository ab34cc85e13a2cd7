//! Effective-row merge of store and edit session.
//!
//! For the row being edited, the draft shadows the store; every other row
//! renders live from the latest snapshot. The merge is pure: it owns no
//! state of its own.

use crate::row::{Row, RowId};
use crate::session::Editor;
use crate::store::RowStore;

/// The row presentation should display for `id`: the edit draft when a
/// session for `id` is active, the store row otherwise.
pub fn effective_row<'a>(store: &'a RowStore, editor: &'a Editor, id: RowId) -> Option<&'a Row> {
    if editor.matches(id) {
        editor.draft()
    } else {
        store.find(id)
    }
}

/// The full display listing in store order, with the edit draft shadowing
/// its row.
///
/// A draft whose row vanished from the snapshot is not appended; the session
/// itself stays alive, so the draft reappears if the row does.
pub fn effective_rows(store: &RowStore, editor: &Editor) -> Vec<Row> {
    store
        .current()
        .iter()
        .map(|row| match effective_row(store, editor, row.id) {
            Some(effective) => effective.clone(),
            None => row.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::sample_row;

    #[test]
    fn test_store_row_when_not_editing() {
        let mut store = RowStore::new();
        store.replace(vec![sample_row(1)]);
        let editor = Editor::new();

        assert_eq!(effective_row(&store, &editor, 1), store.find(1));
        assert!(effective_row(&store, &editor, 99).is_none());
    }

    #[test]
    fn test_draft_shadows_store_for_edited_row() {
        let mut store = RowStore::new();
        store.replace(vec![sample_row(1), sample_row(2)]);

        let mut editor = Editor::new();
        editor.begin(store.find(1).unwrap());
        editor.update_field("human_output", "my correction");

        let shadowed = effective_row(&store, &editor, 1).unwrap();
        assert_eq!(shadowed.human_output, "my correction");

        // Other rows come straight from the store.
        assert_eq!(effective_row(&store, &editor, 2), store.find(2));
    }

    #[test]
    fn test_repeated_refreshes_never_touch_edited_row() {
        let mut store = RowStore::new();
        store.replace(vec![sample_row(1), sample_row(2)]);

        let mut editor = Editor::new();
        editor.begin(store.find(1).unwrap());
        editor.update_field("human_output", "draft survives");

        for generation in 0..5 {
            let mut row1 = sample_row(1);
            row1.human_output = format!("server overwrite {generation}");
            let mut row2 = sample_row(2);
            row2.cdng = format!("CDNG-{generation}");
            store.replace(vec![row1, row2]);

            let displayed = effective_rows(&store, &editor);
            // Edited row keeps showing the draft through every refresh.
            assert_eq!(displayed[0].human_output, "draft survives");
            // Unedited rows live-update.
            assert_eq!(displayed[1].cdng, format!("CDNG-{generation}"));
        }
    }

    #[test]
    fn test_cancel_makes_store_value_visible_again() {
        let mut store = RowStore::new();
        store.replace(vec![sample_row(1)]);

        let mut editor = Editor::new();
        editor.begin(store.find(1).unwrap());
        editor.update_field("human_output", "draft");
        editor.cancel();

        let visible = effective_row(&store, &editor, 1).unwrap();
        assert_eq!(visible.human_output, sample_row(1).human_output);
    }

    #[test]
    fn test_effective_rows_follow_store_order() {
        let mut store = RowStore::new();
        store.replace(vec![sample_row(3), sample_row(1), sample_row(2)]);
        let editor = Editor::new();

        let ids: Vec<_> = effective_rows(&store, &editor).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
