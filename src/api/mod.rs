pub mod attendance;
pub mod employee;
pub mod leave_request;
pub mod payroll;
pub mod report;

/// Default and maximum page sizes for paginated list endpoints.
pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// Cuts one page out of a full result set. Pages are 1-based; out-of-range
/// pages are empty. Returns the page together with the normalized
/// `page`/`per_page` and the total before slicing.
pub fn paginate<T>(items: Vec<T>, page: Option<u32>, per_page: Option<u32>) -> (Vec<T>, u32, u32, usize) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    let total = items.len();
    let offset = (page as usize - 1).saturating_mul(per_page as usize);

    let data = items.into_iter().skip(offset).take(per_page as usize).collect();
    (data, page, per_page, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_clamps_and_slices() {
        let (data, page, per_page, total) = paginate((1..=45).collect::<Vec<_>>(), Some(3), None);
        assert_eq!((page, per_page, total), (3, 20, 45));
        assert_eq!(data, (41..=45).collect::<Vec<_>>());

        let (data, page, per_page, _) = paginate(vec![1, 2, 3], Some(0), Some(500));
        assert_eq!((page, per_page), (1, MAX_PER_PAGE));
        assert_eq!(data.len(), 3);

        let (data, ..) = paginate(vec![1, 2, 3], Some(9), Some(2));
        assert!(data.is_empty());
    }
}
