//! Ordered tab collection and its selection pointer.
//!
//! The collection only checks bounds and identity. Renumbering of view tags
//! and the selection fallback after a removal belong to
//! [`TabStripController`](crate::strip::TabStripController).

use std::collections::HashSet;

use crate::error::{Result, TabStripError};
use super::tab::{Tab, TabId};

/// Ordered list of tabs plus the selected index.
#[derive(Debug, Clone, Default)]
pub struct TabCollection {
    tabs: Vec<Tab>,
    selected: Option<usize>,
}

impl TabCollection {
    /// Create an empty collection with no selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from restored parts, validating every invariant.
    pub fn from_parts(tabs: Vec<Tab>, selected: Option<usize>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(tabs.len());
        for tab in &tabs {
            if !seen.insert(tab.id()) {
                return Err(TabStripError::DuplicateTabId(tab.id()));
            }
        }

        let mut collection = Self { tabs, selected: None };
        collection.select(selected)?;
        Ok(collection)
    }

    /// Append a tab at the end and return its index.
    ///
    /// Selection is left untouched.
    pub fn append(&mut self, tab: Tab) -> Result<usize> {
        if self.contains(tab.id()) {
            return Err(TabStripError::DuplicateTabId(tab.id()));
        }
        self.tabs.push(tab);
        Ok(self.tabs.len() - 1)
    }

    /// Remove the tab at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Tab> {
        self.check_index(index)?;
        Ok(self.tabs.remove(index))
    }

    /// Set the selected index.
    ///
    /// `None` is only accepted for an empty collection.
    pub fn select(&mut self, index: Option<usize>) -> Result<()> {
        match index {
            Some(_) if self.tabs.is_empty() => Err(TabStripError::EmptyCollectionSelection),
            Some(i) => {
                self.check_index(i)?;
                self.selected = Some(i);
                Ok(())
            }
            None if !self.tabs.is_empty() => Err(TabStripError::SelectionRequired),
            None => {
                self.selected = None;
                Ok(())
            }
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_tab(&self) -> Option<&Tab> {
        self.selected.and_then(|i| self.tabs.get(i))
    }

    pub fn get(&self, index: usize) -> Option<&Tab> {
        self.tabs.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tab> {
        self.tabs.get_mut(index)
    }

    /// Index of the tab with `id`, if present.
    pub fn position(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id() == id)
    }

    pub fn find(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id() == id)
    }

    pub fn find_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id() == id)
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.iter()
    }

    /// Last valid index, `None` when empty.
    pub fn last_index(&self) -> Option<usize> {
        self.tabs.len().checked_sub(1)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.tabs.len() {
            Ok(())
        } else {
            Err(TabStripError::IndexOutOfRange {
                index,
                len: self.tabs.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collection(n: u64) -> TabCollection {
        let mut c = TabCollection::new();
        for id in 1..=n {
            c.append(Tab::new(TabId(id))).unwrap();
        }
        c
    }

    fn ids(c: &TabCollection) -> Vec<u64> {
        c.iter().map(|t| t.id().0).collect()
    }

    #[test]
    fn append_returns_index_and_keeps_selection() {
        let mut c = TabCollection::new();
        assert_eq!(c.append(Tab::new(TabId(1))).unwrap(), 0);
        assert_eq!(c.append(Tab::new(TabId(2))).unwrap(), 1);
        assert_eq!(c.selected_index(), None);
    }

    #[test]
    fn append_rejects_duplicate_ids() {
        let mut c = collection(2);
        let err = c.append(Tab::new(TabId(2))).unwrap_err();
        assert_eq!(err, TabStripError::DuplicateTabId(TabId(2)));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn remove_out_of_range_does_not_mutate() {
        let mut c = collection(3);
        c.select(Some(1)).unwrap();
        let err = c.remove(3).unwrap_err();
        assert_eq!(err, TabStripError::IndexOutOfRange { index: 3, len: 3 });
        assert_eq!(ids(&c), vec![1, 2, 3]);
        assert_eq!(c.selected_index(), Some(1));
    }

    #[test]
    fn remove_does_not_touch_selection() {
        let mut c = collection(3);
        c.select(Some(2)).unwrap();
        let removed = c.remove(0).unwrap();
        assert_eq!(removed.id(), TabId(1));
        assert_eq!(ids(&c), vec![2, 3]);
        assert_eq!(c.selected_index(), Some(2));
    }

    #[test]
    fn select_rules() {
        let mut empty = TabCollection::new();
        assert_eq!(empty.select(Some(0)), Err(TabStripError::EmptyCollectionSelection));
        assert_eq!(empty.select(None), Ok(()));

        let mut c = collection(2);
        assert_eq!(c.select(None), Err(TabStripError::SelectionRequired));
        assert_eq!(
            c.select(Some(5)),
            Err(TabStripError::IndexOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(c.select(Some(1)), Ok(()));
        assert_eq!(c.selected_tab().map(|t| t.id()), Some(TabId(2)));
    }

    #[test]
    fn from_parts_validates() {
        let dup = vec![Tab::new(TabId(1)), Tab::new(TabId(1))];
        assert_eq!(
            TabCollection::from_parts(dup, Some(0)).unwrap_err(),
            TabStripError::DuplicateTabId(TabId(1))
        );

        let tabs = vec![Tab::new(TabId(1)), Tab::new(TabId(2))];
        assert_eq!(
            TabCollection::from_parts(tabs.clone(), None).unwrap_err(),
            TabStripError::SelectionRequired
        );

        let c = TabCollection::from_parts(tabs, Some(1)).unwrap();
        assert_eq!(c.selected_index(), Some(1));
        assert_eq!(c.position(TabId(2)), Some(1));
    }
}
