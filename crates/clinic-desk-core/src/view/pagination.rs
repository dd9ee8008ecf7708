//! Fixed-size page arithmetic. Pages are 1-based.

/// Number of pages for `len` items. Never zero.
pub fn page_count(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    len.div_ceil(page_size).max(1)
}

/// Clamp `page` into `1..=page_count`.
pub fn clamp_page(page: usize, len: usize, page_size: usize) -> usize {
    page.clamp(1, page_count(len, page_size))
}

/// Items on `page`. Out-of-range pages are empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if page == 0 || start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
