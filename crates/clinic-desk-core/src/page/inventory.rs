//! Inventory list with branch/status filters and sorting.

use chrono::{Local, NaiveDate};

use super::{PageController, PageResult};
use crate::api::ResourceService;
use crate::models::{Branch, InventoryItem, ItemLine, RecordId, StockStatus, StockThresholds};

/// Sort orders offered by the inventory screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InventorySort {
    /// Backend order
    #[default]
    None,
    /// A–Z by item name
    Name,
    /// Cheapest first
    Price,
}

/// Active inventory filters. `None` means no filtering on that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InventoryFilters {
    pub branch_id: Option<RecordId>,
    pub status: Option<StockStatus>,
}

/// One inventory row with its derived status.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRow {
    pub item: InventoryItem,
    pub status: StockStatus,
}

/// The `/inventory` screen.
pub struct InventoryPage {
    page: PageController<InventoryItem>,
    branches: ResourceService<Branch>,
    branch_options: Vec<Branch>,
    thresholds: StockThresholds,
    today: NaiveDate,
    filters: InventoryFilters,
    sort: InventorySort,
}

impl InventoryPage {
    pub fn new(
        service: ResourceService<InventoryItem>,
        page_size: usize,
        thresholds: StockThresholds,
    ) -> Self {
        let branches = ResourceService::new(service.client().clone());
        Self {
            page: PageController::new(service, page_size),
            branches,
            branch_options: Vec::new(),
            thresholds,
            today: Local::now().date_naive(),
            filters: InventoryFilters::default(),
            sort: InventorySort::default(),
        }
    }

    /// Derive statuses as of `today` instead of the current date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self.apply_filters();
        self
    }

    pub fn page(&self) -> &PageController<InventoryItem> {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut PageController<InventoryItem> {
        &mut self.page
    }

    /// Load items and the branch filter options.
    ///
    /// Branch options are best effort; the item list is what matters.
    pub async fn mount(&mut self) -> PageResult<()> {
        match self.branches.list(None).await {
            Ok(branches) => self.branch_options = branches,
            Err(e) => tracing::warn!("Failed to load branches: {}", e),
        }
        self.page.mount().await
    }

    pub fn branch_options(&self) -> &[Branch] {
        &self.branch_options
    }

    pub fn filters(&self) -> InventoryFilters {
        self.filters
    }

    pub fn sort(&self) -> InventorySort {
        self.sort
    }

    pub fn status_of(&self, item: &InventoryItem) -> StockStatus {
        item.status_on(self.today, self.thresholds)
    }

    pub fn filter_branch(&mut self, branch_id: Option<RecordId>) {
        self.filters.branch_id = branch_id;
        self.apply_filters();
    }

    pub fn filter_status(&mut self, status: Option<StockStatus>) {
        self.filters.status = status;
        self.apply_filters();
    }

    pub fn set_sort(&mut self, sort: InventorySort) {
        self.sort = sort;
        let list = self.page.list_mut();
        match sort {
            InventorySort::None => list.set_sort(None),
            InventorySort::Name => list.sort_by(|a: &InventoryItem, b: &InventoryItem| {
                a.item_name.to_lowercase().cmp(&b.item_name.to_lowercase())
            }),
            InventorySort::Price => list.sort_by(|a: &InventoryItem, b: &InventoryItem| {
                a.item_price.total_cmp(&b.item_price)
            }),
        }
    }

    /// Drop every filter and sort, restoring the full list.
    pub fn clear_filters(&mut self) {
        self.filters = InventoryFilters::default();
        self.set_sort(InventorySort::None);
        self.apply_filters();
    }

    fn apply_filters(&mut self) {
        let InventoryFilters { branch_id, status } = self.filters;
        let list = self.page.list_mut();
        if branch_id.is_none() && status.is_none() {
            list.clear_filter();
            return;
        }

        let today = self.today;
        let thresholds = self.thresholds;
        list.set_filter(move |item: &InventoryItem| {
            branch_id.map_or(true, |id| item.branch_id() == Some(id))
                && status.map_or(true, |wanted| item.status_on(today, thresholds) == wanted)
        });
    }

    /// Rows on the current page, with statuses.
    pub fn rows(&self) -> Vec<InventoryRow> {
        self.page
            .list()
            .page_items()
            .into_iter()
            .map(|item| InventoryRow {
                item: item.clone(),
                status: self.status_of(item),
            })
            .collect()
    }

    /// Take sold quantities off the local stock snapshot.
    pub fn apply_sale(&mut self, sold: &[ItemLine]) {
        for line in sold {
            self.page
                .list_mut()
                .update_where(line.item_id, |item| item.item_quantity -= line.item_quantity);
        }
    }
}
