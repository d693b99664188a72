//! Store configuration.

/// Number of orders returned per page by subset queries.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Maximum summed item amount per order when the cap is enabled.
pub const DEFAULT_MAX_ITEMS_PER_ORDER: u32 = 255;

/// Highest order number handed out before the sequence wraps back to 1.
pub const DEFAULT_ORDER_NUMBER_MAX: u32 = 999;

/// Tunables for an [`OrderStore`](crate::OrderStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Orders per page in [`get_order_subset`](crate::OrderStore::get_order_subset).
    pub page_size: usize,

    /// Cap on the summed item amount of one order; `None` disables the cap.
    pub max_items_per_order: Option<u32>,

    /// Rollover point of the display order number.
    pub order_number_max: u32,
}

impl StoreConfig {
    /// Returns a copy with the item cap disabled.
    pub fn without_item_cap(mut self) -> Self {
        self.max_items_per_order = None;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_items_per_order: Some(DEFAULT_MAX_ITEMS_PER_ORDER),
            order_number_max: DEFAULT_ORDER_NUMBER_MAX,
        }
    }
}
