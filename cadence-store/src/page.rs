//! Pure pagination math shared by the controller and its callers.

/// Compute the number of server pages for a collection size.
///
/// An empty collection has zero pages; callers that need a displayable
/// page count should pair this with [`clamp_page`].
pub fn total_pages(total_count: u64, limit: u32) -> u32 {
    let pages = total_count.div_ceil(u64::from(limit.max(1)));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Clamp a requested page into a valid one-based range.
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}
