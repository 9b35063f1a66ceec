//! Multi-row selection for list views.
//!
//! Selection survives filter changes: "select all" only ever adds the ids
//! currently displayed, and "deselect all" only removes those same ids.
//! Rows selected under a different filter stay selected.

use std::collections::BTreeSet;

/// Header checkbox state for the currently displayed rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheckbox {
    Unchecked,
    Indeterminate,
    Checked,
}

/// A set of selected row ids.
///
/// Ordered, so callers that hand the selection to a callback get ids in a
/// stable order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet<K: Ord> {
    ids: BTreeSet<K>,
}

impl<K: Ord> Default for SelectionSet<K> {
    fn default() -> Self {
        Self {
            ids: BTreeSet::new(),
        }
    }
}

impl<K: Ord + Clone> SelectionSet<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of one row. Ids need not be currently displayed.
    pub fn toggle_row(&mut self, id: K) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Header checkbox action.
    ///
    /// If every displayed id is already selected, removes exactly the
    /// displayed ids; otherwise adds all of them. An empty display is a
    /// no-op.
    pub fn toggle_select_all<'a, I>(&mut self, displayed: I)
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let displayed: Vec<&K> = displayed.into_iter().collect();
        if displayed.is_empty() {
            return;
        }
        if displayed.iter().all(|id| self.ids.contains(*id)) {
            for id in displayed {
                self.ids.remove(id);
            }
        } else {
            self.ids.extend(displayed.into_iter().cloned());
        }
    }

    /// True iff `displayed` is non-empty and every id in it is selected.
    pub fn is_all_selected<'a, I>(&self, displayed: I) -> bool
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let mut any = false;
        for id in displayed {
            if !self.ids.contains(id) {
                return false;
            }
            any = true;
        }
        any
    }

    /// Tri-state header checkbox for the displayed rows.
    pub fn header_state<'a, I>(&self, displayed: I) -> HeaderCheckbox
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let (mut shown, mut picked) = (0usize, 0usize);
        for id in displayed {
            shown += 1;
            if self.ids.contains(id) {
                picked += 1;
            }
        }
        match picked {
            0 => HeaderCheckbox::Unchecked,
            n if n == shown => HeaderCheckbox::Checked,
            _ => HeaderCheckbox::Indeterminate,
        }
    }

    #[must_use]
    pub fn contains(&self, id: &K) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in order.
    #[must_use]
    pub fn ids(&self) -> Vec<K> {
        self.ids.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.ids.iter()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

impl<K: Ord> FromIterator<K> for SelectionSet<K> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> SelectionSet<String> {
        ids.iter().map(ToString::to_string).collect()
    }

    fn owned(ids: &[&str]) -> Vec<String> {
        ids.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_toggle_row_flips_membership() {
        let mut selection = SelectionSet::new();
        selection.toggle_row("a".to_string());
        assert!(selection.contains(&"a".to_string()));
        selection.toggle_row("a".to_string());
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_unions_with_existing() {
        let mut selection = set(&["x"]);
        let displayed = owned(&["a", "b"]);
        selection.toggle_select_all(&displayed);
        assert_eq!(selection.ids(), owned(&["a", "b", "x"]));
        assert!(selection.is_all_selected(&displayed));
    }

    #[test]
    fn test_deselect_all_keeps_rows_outside_the_filter() {
        let mut selection = set(&["a", "b", "x"]);
        let displayed = owned(&["a", "b"]);
        selection.toggle_select_all(&displayed);
        assert_eq!(selection.ids(), owned(&["x"]));
    }

    #[test]
    fn test_select_all_twice_restores_original() {
        for start in [&[][..], &["x", "y"][..], &["a", "b"][..], &["a", "b", "x"][..]] {
            let original = set(start);
            let displayed = owned(&["a", "b"]);
            let mut selection = original.clone();
            selection.toggle_select_all(&displayed);
            selection.toggle_select_all(&displayed);
            assert_eq!(selection, original, "start = {start:?}");
        }
    }

    #[test]
    fn test_select_all_twice_from_partial_display_clears_it() {
        let mut selection = set(&["a", "x"]);
        let displayed = owned(&["a", "b"]);
        selection.toggle_select_all(&displayed);
        selection.toggle_select_all(&displayed);
        assert_eq!(selection.ids(), owned(&["x"]));
    }

    #[test]
    fn test_select_all_scope() {
        let mut selection = set(&["x", "a"]);
        let displayed = owned(&["a", "b"]);
        selection.toggle_select_all(&displayed);
        for id in &displayed {
            assert!(selection.contains(id));
        }
        assert!(selection.contains(&"x".to_string()));
    }

    #[test]
    fn test_is_all_selected_false_for_empty_display() {
        let selection = set(&["a"]);
        let empty: Vec<String> = vec![];
        assert!(!selection.is_all_selected(&empty));
    }

    #[test]
    fn test_select_all_on_empty_display_is_noop() {
        let mut selection = set(&["a"]);
        let empty: Vec<String> = vec![];
        selection.toggle_select_all(&empty);
        assert_eq!(selection.ids(), owned(&["a"]));
    }

    #[test]
    fn test_header_state() {
        let displayed = owned(&["a", "b"]);
        assert_eq!(set(&[]).header_state(&displayed), HeaderCheckbox::Unchecked);
        assert_eq!(set(&["a"]).header_state(&displayed), HeaderCheckbox::Indeterminate);
        assert_eq!(set(&["a", "b"]).header_state(&displayed), HeaderCheckbox::Checked);
    }

    #[test]
    fn test_stale_ids_are_tolerated() {
        let mut selection = set(&["gone"]);
        selection.toggle_row("gone".to_string());
        selection.toggle_row("gone".to_string());
        assert_eq!(selection.len(), 1);
    }
}
