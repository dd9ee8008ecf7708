//! Searchable, paginated, selectable collection.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::{clamp_page, page_count, paginate};
use crate::models::{Record, RecordId};

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Client-side view over the last fetched collection.
///
/// The displayed rows are: predicate, then sort, then search, then the
/// current page.
pub struct ListView<T: Record> {
    items: Vec<T>,
    query: String,
    page: usize,
    page_size: usize,
    selected: BTreeSet<RecordId>,
    predicate: Option<Predicate<T>>,
    sort: Option<Comparator<T>>,
}

impl<T: Record> ListView<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            query: String::new(),
            page: 1,
            page_size: page_size.max(1),
            selected: BTreeSet::new(),
            predicate: None,
            sort: None,
        }
    }

    /// Every fetched record, ignoring filters.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Replace the collection with a fresh snapshot.
    ///
    /// Selections of records no longer present are dropped.
    pub fn replace_items(&mut self, items: Vec<T>) {
        self.items = items;
        let present: BTreeSet<RecordId> = self.items.iter().filter_map(Record::id).collect();
        self.selected.retain(|id| present.contains(id));
        self.clamp();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Change the search text. Always returns to page 1.
    ///
    /// Selections the new search hides are dropped.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
        self.drop_hidden_selection();
    }

    /// Replace the page-level predicate. Selections it hides are dropped.
    pub fn set_predicate(&mut self, predicate: Option<Predicate<T>>) {
        self.predicate = predicate;
        self.drop_hidden_selection();
        self.clamp();
    }

    pub fn set_filter(&mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) {
        self.set_predicate(Some(Box::new(predicate)));
    }

    pub fn clear_filter(&mut self) {
        self.set_predicate(None);
    }

    pub fn set_sort(&mut self, sort: Option<Comparator<T>>) {
        self.sort = sort;
    }

    pub fn sort_by(&mut self, compare: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) {
        self.sort = Some(Box::new(compare));
    }

    /// Rows passing predicate and search, in display order.
    pub fn visible(&self) -> Vec<&T> {
        let mut rows: Vec<&T> = self
            .items
            .iter()
            .filter(|&item| self.predicate.as_ref().map_or(true, |keep| keep(item)))
            .collect();
        if let Some(compare) = &self.sort {
            rows.sort_by(|a, b| compare(*a, *b));
        }
        rows.retain(|item| item.matches_query(&self.query));
        rows
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        page_count(self.visible().len(), self.page_size)
    }

    /// Move to `page`, clamped into range.
    pub fn set_page(&mut self, page: usize) {
        self.page = clamp_page(page, self.visible().len(), self.page_size);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    /// Rows on the current page.
    pub fn page_items(&self) -> Vec<&T> {
        let visible = self.visible();
        let page = clamp_page(self.page, visible.len(), self.page_size);
        paginate(&visible, page, self.page_size).to_vec()
    }

    fn clamp(&mut self) {
        self.page = clamp_page(self.page, self.visible().len(), self.page_size);
    }

    fn drop_hidden_selection(&mut self) {
        if self.selected.is_empty() {
            return;
        }
        let shown: BTreeSet<RecordId> = self.visible().iter().filter_map(|r| r.id()).collect();
        self.selected.retain(|id| shown.contains(id));
    }

    /// Toggle a row's checkbox. Unknown ids are ignored.
    pub fn toggle_select(&mut self, id: RecordId) {
        if !self.selected.remove(&id) && self.items.iter().any(|item| item.id() == Some(id)) {
            self.selected.insert(id);
        }
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selected.contains(&id)
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.selected.iter().copied().collect()
    }

    /// The selected record when exactly one is selected.
    pub fn selected_record(&self) -> Option<&T> {
        if self.selected.len() != 1 {
            return None;
        }
        let id = self.selected.iter().next().copied();
        self.items.iter().find(|item| item.id() == id)
    }

    /// Edit needs exactly one selected row.
    pub fn can_edit(&self) -> bool {
        self.selected_record().is_some()
    }

    /// Bulk delete needs at least one selected row.
    pub fn can_bulk_delete(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn find(&self, id: RecordId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == Some(id))
    }

    /// Insert a saved record, replacing any with the same id.
    pub fn upsert(&mut self, record: T) {
        match record
            .id()
            .and_then(|id| self.items.iter().position(|item| item.id() == Some(id)))
        {
            Some(index) => self.items[index] = record,
            None => self.items.push(record),
        }
        self.clamp();
    }

    /// Apply `change` to the record with `id`. Returns whether it was found.
    pub fn update_where(&mut self, id: RecordId, change: impl FnOnce(&mut T)) -> bool {
        let found = match self.items.iter_mut().find(|item| item.id() == Some(id)) {
            Some(item) => {
                change(item);
                true
            }
            None => false,
        };
        self.clamp();
        found
    }

    /// Remove records by id, and their selections.
    pub fn remove_ids(&mut self, ids: &[RecordId]) {
        self.items
            .retain(|item| item.id().map_or(true, |id| !ids.contains(&id)));
        for id in ids {
            self.selected.remove(id);
        }
        self.clamp();
    }
}
