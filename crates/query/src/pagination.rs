/// Number of pages for `total` items, never less than 1.
///
/// `per_page` is clamped the same way it is on the wire.
pub fn page_count(total: u64, per_page: i64) -> u64 {
    let per_page = per_page.max(1) as u64;
    total.div_ceil(per_page).max(1)
}
