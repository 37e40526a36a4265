/// One page of rows plus the page count for the whole input.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: usize,
}

/// Slice out page `page` (zero-based) of `page_size` items.
///
/// `total_pages` is `ceil(len / page_size)`, so an empty input reports zero
/// pages. Pages past the end come back empty; clamping the page number is
/// the caller's job (see [`crate::pagination::TablePager`]).
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size);
    let start = page.saturating_mul(page_size);
    let items = if start >= items.len() {
        Vec::new()
    } else {
        items[start..(start + page_size).min(items.len())].to_vec()
    };
    Page { items, total_pages }
}
