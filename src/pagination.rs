use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

/// Rendered height of one table row in pixels.
pub const ROW_HEIGHT: f32 = 36.0;
/// Height reserved for the table header.
pub const HEADER_HEIGHT: f32 = 40.0;
/// Height reserved for the pagination bar below the table.
pub const PAGINATION_BAR_HEIGHT: f32 = 48.0;
/// Page size before any height has been observed.
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

/// Rows that fit in a container of the given height, never less than one.
pub fn rows_for_height(height: f32) -> usize {
    let usable = height - HEADER_HEIGHT - PAGINATION_BAR_HEIGHT;
    (usable / ROW_HEIGHT).floor().max(1.0) as usize
}

/// Page state for one rendered table: current page plus a page size that
/// tracks the measured container height.
///
/// Height updates apply hysteresis: the page size only moves when the
/// newly computed value differs by more than one row, which keeps
/// sub-pixel resize chatter from thrashing the layout. Any page size
/// change snaps back to the first page so the current page cannot end up
/// past the new page count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePager {
    rows_per_page: usize,
    page: usize,
}

impl TablePager {
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            rows_per_page: rows_per_page.max(1),
            page: 0,
        }
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Feed in a measured container height. Returns true when the page
    /// size actually changed.
    pub fn observe_height(&mut self, height: f32) -> bool {
        let computed = rows_for_height(height);
        if computed.abs_diff(self.rows_per_page) > 1 {
            self.rows_per_page = computed;
            self.page = 0;
            true
        } else {
            false
        }
    }

    /// Explicit page size choice (e.g. a per-page dropdown). Resets to the
    /// first page.
    pub fn set_rows_per_page(&mut self, rows_per_page: usize) {
        self.rows_per_page = rows_per_page.max(1);
        self.page = 0;
    }

    pub fn set_page(&mut self, page: usize, total_pages: usize) {
        self.page = page.min(total_pages.saturating_sub(1));
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.set_page(self.page + 1, total_pages);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn first_page(&mut self) {
        self.page = 0;
    }

    pub fn last_page(&mut self, total_pages: usize) {
        self.page = total_pages.saturating_sub(1);
    }
}

impl Default for TablePager {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS_PER_PAGE)
    }
}

type SizeCallback = Box<dyn FnMut(f32) + Send>;

#[derive(Default)]
struct FeedState {
    next_id: u64,
    subscribers: HashMap<u64, SizeCallback>,
}

/// Fan-out point for container size measurements. The embedding UI pushes
/// each observed height; subscribers react, typically by updating a
/// [`TablePager`]. Dropping the returned [`SizeSubscription`]
/// unsubscribes.
#[derive(Clone, Default)]
pub struct SizeFeed {
    state: Arc<Mutex<FeedState>>,
}

impl SizeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl FnMut(f32) + Send + 'static) -> SizeSubscription {
        let id = match self.state.lock() {
            Ok(mut state) => {
                let id = state.next_id;
                state.next_id += 1;
                state.subscribers.insert(id, Box::new(callback));
                id
            }
            Err(_) => u64::MAX,
        };
        SizeSubscription {
            feed: Arc::downgrade(&self.state),
            id,
        }
    }

    /// Deliver a measured height to every live subscriber.
    pub fn publish(&self, height: f32) {
        if let Ok(mut state) = self.state.lock() {
            for callback in state.subscribers.values_mut() {
                callback(height);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.lock().map(|state| state.subscribers.len()).unwrap_or(0)
    }
}

/// Keeps a [`SizeFeed`] subscription alive; dropping it unsubscribes.
pub struct SizeSubscription {
    feed: Weak<Mutex<FeedState>>,
    id: u64,
}

impl Drop for SizeSubscription {
    fn drop(&mut self) {
        if let Some(state) = self.feed.upgrade() {
            if let Ok(mut state) = state.lock() {
                state.subscribers.remove(&self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_for_height_reserves_header_and_pagination_bar() {
        // 400px leaves 312px of rows: 8 full ones.
        assert_eq!(rows_for_height(400.0), 8);
        assert_eq!(rows_for_height(0.0), 1);
        assert_eq!(rows_for_height(HEADER_HEIGHT + PAGINATION_BAR_HEIGHT), 1);
    }

    #[test]
    fn small_height_changes_are_ignored() {
        let mut pager = TablePager::default();
        // 484px computes 11 rows, one away from the default 10.
        assert!(!pager.observe_height(484.0));
        assert_eq!(pager.rows_per_page(), 10);

        // 520px computes 12 rows and goes through.
        assert!(pager.observe_height(520.0));
        assert_eq!(pager.rows_per_page(), 12);
    }

    #[test]
    fn page_size_changes_reset_to_first_page() {
        let mut pager = TablePager::default();
        pager.set_page(4, 10);
        assert!(pager.observe_height(700.0));
        assert_eq!(pager.page(), 0);

        pager.set_page(3, 10);
        pager.set_rows_per_page(25);
        assert_eq!(pager.rows_per_page(), 25);
        assert_eq!(pager.page(), 0);
        pager.set_rows_per_page(0);
        assert_eq!(pager.rows_per_page(), 1);
    }

    #[test]
    fn page_navigation_clamps_to_bounds() {
        let mut pager = TablePager::default();
        pager.next_page(3);
        pager.next_page(3);
        pager.next_page(3);
        assert_eq!(pager.page(), 2);
        pager.last_page(5);
        assert_eq!(pager.page(), 4);
        pager.first_page();
        pager.prev_page();
        assert_eq!(pager.page(), 0);
        pager.set_page(9, 0);
        assert_eq!(pager.page(), 0);
    }

    #[test]
    fn dropped_subscriptions_stop_receiving() {
        let feed = SizeFeed::new();
        let pager = Arc::new(Mutex::new(TablePager::default()));
        let shared = Arc::clone(&pager);
        let subscription = feed.subscribe(move |height| {
            if let Ok(mut pager) = shared.lock() {
                pager.observe_height(height);
            }
        });
        assert_eq!(feed.subscriber_count(), 1);

        feed.publish(700.0);
        let rows = pager.lock().map(|p| p.rows_per_page()).unwrap_or_default();
        assert_eq!(rows, 17);

        drop(subscription);
        assert_eq!(feed.subscriber_count(), 0);
        feed.publish(200.0);
        let rows = pager.lock().map(|p| p.rows_per_page()).unwrap_or_default();
        assert_eq!(rows, 17);
    }
}
