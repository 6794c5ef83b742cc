//! Checked rows for bulk actions.

use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    ids: BTreeSet<Uuid>,
}

impl SelectionState {
    /// Flip one row. Returns whether the row is now selected.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn select(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        self.ids.extend(ids);
    }

    /// Header checkbox: select every row on the page, or deselect them all
    /// when they are already selected.
    pub fn toggle_page(&mut self, page_ids: &[Uuid]) {
        if self.is_page_selected(page_ids) {
            for id in page_ids {
                self.ids.remove(id);
            }
        } else {
            self.select(page_ids.iter().copied());
        }
    }

    /// True when the page is non-empty and every row on it is selected.
    pub fn is_page_selected(&self, page_ids: &[Uuid]) -> bool {
        !page_ids.is_empty() && page_ids.iter().all(|id| self.ids.contains(id))
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.ids.contains(id)
    }

    /// Drop ids whose records no longer exist.
    pub fn retain_existing(&mut self, exists: impl Fn(&Uuid) -> bool) {
        self.ids.retain(|id| exists(id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Take the current selection, leaving it empty.
    pub fn take(&mut self) -> BTreeSet<Uuid> {
        std::mem::take(&mut self.ids)
    }

    pub fn ids(&self) -> &BTreeSet<Uuid> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_membership() {
        let mut selection = SelectionState::default();
        let id = Uuid::new_v4();
        assert!(selection.toggle(id));
        assert!(selection.contains(&id));
        assert!(!selection.toggle(id));
        assert!(selection.is_empty());
    }

    #[test]
    fn page_toggle_selects_then_clears_page() {
        let mut selection = SelectionState::default();
        let outside = Uuid::new_v4();
        selection.toggle(outside);

        let page: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        selection.toggle(page[0]);
        assert!(!selection.is_page_selected(&page));

        selection.toggle_page(&page);
        assert!(selection.is_page_selected(&page));
        assert_eq!(selection.len(), 4);

        selection.toggle_page(&page);
        assert_eq!(selection.ids().iter().copied().collect::<Vec<_>>(), vec![outside]);
    }

    #[test]
    fn empty_page_is_never_selected() {
        let selection = SelectionState::default();
        assert!(!selection.is_page_selected(&[]));
    }

    #[test]
    fn retain_and_take() {
        let mut selection = SelectionState::default();
        let keep = Uuid::new_v4();
        let gone = Uuid::new_v4();
        selection.select([keep, gone]);
        selection.retain_existing(|id| *id == keep);
        assert_eq!(selection.len(), 1);

        let taken = selection.take();
        assert!(taken.contains(&keep));
        assert!(selection.is_empty());
    }
}
