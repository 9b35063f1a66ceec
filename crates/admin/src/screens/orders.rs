//! Orders list and order detail.

use chrono::Utc;
use tracing::instrument;
use vendor_desk_core::listing::{
    BulkAction, BulkActionDispatcher, BulkActionHandler, FilterOutcome, HeaderCheckbox, OrderFilter,
    PageMeta, SelectionSet, StatusCounts, displayed, paginate,
};
use vendor_desk_core::types::{Order, OrderId, ShipmentDraft, ShipmentId, StatusTab, require};

use crate::editor::{EditorSettings, FlashLevel, FlashSlot, with_timeout};
use crate::error::ConsoleError;
use crate::gateway::VendorApiClient;

/// State of the orders list: the full collection plus everything the vendor
/// has picked on screen.
///
/// Derived views (`outcome`, `counts`, `page`) are recomputed from the
/// collection and the filter on every call; nothing derived is cached.
#[derive(Debug)]
pub struct OrdersScreen {
    orders: Vec<Order>,
    filter: OrderFilter,
    selection: SelectionSet<OrderId>,
    bulk: BulkActionDispatcher,
    page: u32,
    page_size: u32,
    flash: FlashSlot,
    settings: EditorSettings,
}

impl OrdersScreen {
    #[must_use]
    pub fn new(page_size: u32, settings: EditorSettings) -> Self {
        Self {
            orders: Vec::new(),
            filter: OrderFilter::default(),
            selection: SelectionSet::new(),
            bulk: BulkActionDispatcher::new(),
            page: 1,
            page_size: page_size.max(1),
            flash: FlashSlot::new(settings.flash_window),
            settings,
        }
    }

    /// Fetch every order from the backend.
    ///
    /// On failure the current collection is kept and an error flash is
    /// raised.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Gateway` if the fetch fails.
    #[instrument(skip(self, client))]
    pub async fn load(&mut self, client: &VendorApiClient) -> Result<usize, ConsoleError> {
        match with_timeout(self.settings.request_timeout, client.orders().list_all()).await {
            Ok(orders) => {
                let count = orders.len();
                self.set_orders(orders);
                tracing::info!(count, "Loaded orders");
                Ok(count)
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Replace the collection. Selections of orders that no longer exist are
    /// dropped.
    pub fn set_orders(&mut self, orders: Vec<Order>) {
        let stale: Vec<OrderId> = self
            .selection
            .iter()
            .filter(|id| !orders.iter().any(|o| &o.id == *id))
            .cloned()
            .collect();
        for id in stale {
            self.selection.toggle_row(id);
        }
        self.orders = orders;
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub const fn filter(&self) -> &OrderFilter {
        &self.filter
    }

    pub fn set_search(&mut self, search: &str) {
        self.filter = std::mem::take(&mut self.filter).with_search(search);
        self.page = 1;
    }

    pub fn set_dates(&mut self, start: Option<&str>, end: Option<&str>) {
        self.filter = std::mem::take(&mut self.filter).with_dates(start, end);
        self.page = 1;
    }

    pub fn set_tab(&mut self, tab: impl Into<StatusTab>) {
        self.filter = std::mem::take(&mut self.filter).with_tab(tab);
        self.page = 1;
    }

    /// Jump to a page. Out-of-range pages are clamped when the page is read.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    #[must_use]
    pub fn outcome(&self) -> FilterOutcome<'_> {
        FilterOutcome::evaluate(&self.orders, &self.filter)
    }

    /// Per-status counts over the search/date filtered set, ignoring the tab.
    #[must_use]
    pub fn counts(&self) -> StatusCounts {
        self.outcome().counts
    }

    /// The current page of displayed orders.
    #[must_use]
    pub fn page(&self) -> (Vec<&Order>, PageMeta) {
        let rows = displayed(&self.orders, &self.filter);
        let (page, meta) = paginate(&rows, self.page, self.page_size);
        (page.to_vec(), meta)
    }

    #[must_use]
    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    #[must_use]
    pub const fn selection(&self) -> &SelectionSet<OrderId> {
        &self.selection
    }

    pub fn toggle_row(&mut self, id: OrderId) {
        self.selection.toggle_row(id);
    }

    /// Header checkbox. Covers every displayed order, not just the current
    /// page.
    pub fn toggle_select_all(&mut self) {
        let ids = self.outcome().displayed_ids();
        self.selection.toggle_select_all(&ids);
    }

    #[must_use]
    pub fn header_state(&self) -> HeaderCheckbox {
        let ids = self.outcome().displayed_ids();
        self.selection.header_state(&ids)
    }

    // =========================================================================
    // Bulk actions
    // =========================================================================

    #[must_use]
    pub const fn pending_bulk_action(&self) -> Option<BulkAction> {
        self.bulk.pending()
    }

    /// Pick an action in the dropdown without applying it.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::BulkAction` for an unknown key.
    pub fn select_bulk_action(&mut self, key: &str) -> Result<Option<BulkAction>, ConsoleError> {
        Ok(self.bulk.select(key)?)
    }

    /// Apply `key` to the current selection through `handler`.
    ///
    /// The selection is kept afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::BulkAction` for an unknown key.
    pub fn apply_bulk_action<H>(
        &mut self,
        key: &str,
        handler: &mut H,
    ) -> Result<Option<BulkAction>, ConsoleError>
    where
        H: BulkActionHandler<OrderId> + ?Sized,
    {
        Ok(self.bulk.apply(key, &self.selection, handler)?)
    }

    /// Apply `key` by asking the backend for the matching documents.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::BulkAction` for an unknown key and
    /// `ConsoleError::Gateway` if the request fails; the latter also raises
    /// an error flash.
    #[instrument(skip(self, client), fields(selected = self.selection.len()))]
    pub async fn request_documents(
        &mut self,
        client: &VendorApiClient,
        key: &str,
    ) -> Result<Option<BulkAction>, ConsoleError> {
        let mut batch = None;
        let applied = self.apply_bulk_action(key, &mut |action: BulkAction, ids: &[OrderId]| {
            batch = Some((action, ids.to_vec()));
        })?;

        if let Some((action, ids)) = batch {
            let call = client.request_documents(action, &ids);
            if let Err(err) = with_timeout(self.settings.request_timeout, call).await {
                return Err(self.fail(err.into()));
            }
            self.flash.raise(
                FlashLevel::Info,
                format!("Requested {} for {} orders", action.label(), ids.len()),
            );
        }
        Ok(applied)
    }

    // =========================================================================
    // Order detail
    // =========================================================================

    /// Append a note to one order.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Validation` for a blank note and
    /// `ConsoleError::NotFound` for an unknown order.
    pub fn add_note(
        &mut self,
        id: &OrderId,
        text: &str,
        is_customer_note: bool,
    ) -> Result<(), ConsoleError> {
        require("note", text)?;
        self.order_mut(id)?.add_note(text, is_customer_note, Utc::now());
        Ok(())
    }

    /// Record a shipment on one order.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Validation` when the draft has no status and
    /// `ConsoleError::NotFound` for an unknown order.
    pub fn add_shipment(
        &mut self,
        id: &OrderId,
        draft: ShipmentDraft,
    ) -> Result<ShipmentId, ConsoleError> {
        require("status", &draft.status)?;
        Ok(self.order_mut(id)?.add_shipment(draft, Utc::now()))
    }

    /// # Errors
    ///
    /// Returns `ConsoleError::NotFound` if the order or shipment is unknown.
    pub fn update_shipment_status(
        &mut self,
        id: &OrderId,
        shipment: &ShipmentId,
        status: &str,
    ) -> Result<(), ConsoleError> {
        require("status", status)?;
        if self.order_mut(id)?.update_shipment_status(shipment, status) {
            Ok(())
        } else {
            Err(ConsoleError::NotFound(format!("Shipment {shipment}")))
        }
    }

    #[must_use]
    pub const fn flash(&self) -> &FlashSlot {
        &self.flash
    }

    fn order_mut(&mut self, id: &OrderId) -> Result<&mut Order, ConsoleError> {
        self.orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| ConsoleError::NotFound(format!("Order {id}")))
    }

    fn fail(&mut self, err: ConsoleError) -> ConsoleError {
        err.report();
        self.flash.raise(FlashLevel::Error, err.user_message());
        err
    }
}
