use crate::rows::TableRow;
use std::fmt;
use std::sync::Arc;

/// How many rows fit on one page.
#[derive(Clone)]
pub enum PageSize {
    Fixed(usize),
    /// Fit as many rows as the viewport allows (`available_height / row_height`).
    Fit {
        available_height: usize,
        row_height: usize,
    },
    /// Computed from the row sequence being paginated.
    Custom(Arc<dyn Fn(&[TableRow]) -> usize + Send + Sync>),
}

impl PageSize {
    pub fn custom(f: impl Fn(&[TableRow]) -> usize + Send + Sync + 'static) -> Self {
        PageSize::Custom(Arc::new(f))
    }

    /// Resolves the page size for `rows`. Never returns 0.
    pub fn resolve(&self, rows: &[TableRow]) -> usize {
        let size = match self {
            PageSize::Fixed(n) => *n,
            PageSize::Fit {
                available_height,
                row_height,
            } => available_height.checked_div(*row_height).unwrap_or(0),
            PageSize::Custom(f) => f(rows),
        };
        size.max(1)
    }
}

impl From<usize> for PageSize {
    fn from(value: usize) -> Self {
        PageSize::Fixed(value)
    }
}

impl fmt::Debug for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::Fixed(n) => f.debug_tuple("Fixed").field(n).finish(),
            PageSize::Fit {
                available_height,
                row_height,
            } => f
                .debug_struct("Fit")
                .field("available_height", available_height)
                .field("row_height", row_height)
                .finish(),
            PageSize::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One page of rows plus the metadata a page control needs.
///
/// `range_start`/`range_end` are 1-based and inclusive. With no rows there are zero pages,
/// `clamped_page` is 1 and `rows` is empty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Page<'a> {
    pub rows: &'a [TableRow],
    pub rows_per_page: usize,
    pub num_pages: usize,
    pub range_start: usize,
    pub range_end: usize,
    pub clamped_page: usize,
}

/// Clamps a 1-based page number into `[1, num_pages]` (page 1 when there are no pages).
pub fn clamp_page(requested: usize, num_pages: usize) -> usize {
    requested.clamp(1, num_pages.max(1))
}

/// Slices `rows` into the page at `current_page` (1-based).
///
/// A page past the end (e.g. after a filter shrank the row set) is clamped to the last page
/// and the slice is taken from the clamped page.
pub fn paginate<'a>(rows: &'a [TableRow], page_size: &PageSize, current_page: usize) -> Page<'a> {
    let rows_per_page = page_size.resolve(rows);
    let num_pages = rows.len().div_ceil(rows_per_page);
    let clamped_page = clamp_page(current_page, num_pages);
    if clamped_page != current_page {
        log::trace!("page {current_page} out of range (1..={num_pages}); using {clamped_page}");
    }

    let range_start = (clamped_page - 1) * rows_per_page + 1;
    let range_end = (range_start + rows_per_page - 1).min(rows.len());
    let start = (range_start - 1).min(rows.len());
    let end = (start + rows_per_page).min(rows.len());

    Page {
        rows: &rows[start..end],
        rows_per_page,
        num_pages,
        range_start,
        range_end,
        clamped_page,
    }
}

/// Tracks the current page across recomputations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paginator {
    current_page: usize,
    num_pages: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            current_page: 1,
            num_pages: 0,
        }
    }
}

impl Paginator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Page count seen by the last call to [`Paginator::page`].
    pub fn num_pages(&self) -> usize {
        self.num_pages
    }

    /// Moves to `requested`, clamped against the last known page count.
    pub fn navigate(&mut self, requested: usize) -> usize {
        self.current_page = clamp_page(requested, self.num_pages);
        self.current_page
    }

    /// Moves to `requested`, clamped against a page count the caller just computed.
    pub fn navigate_within(&mut self, requested: usize, num_pages: usize) -> usize {
        self.num_pages = num_pages;
        self.navigate(requested)
    }

    pub fn next_page(&mut self) -> usize {
        self.navigate(self.current_page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> usize {
        self.navigate(self.current_page.saturating_sub(1))
    }

    /// Paginates `rows` at the current page, clamping the stored page if the row set shrank.
    pub fn page<'a>(&mut self, rows: &'a [TableRow], page_size: &PageSize) -> Page<'a> {
        let page = paginate(rows, page_size, self.current_page);
        self.num_pages = page.num_pages;
        self.current_page = page.clamped_page;
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{DataFrame, Field};
    use crate::rows::materialize;

    use pretty_assertions::assert_eq;

    fn rows(n: usize) -> Vec<TableRow> {
        let frame = DataFrame::new(vec![Field::number("v", (0..n).map(|i| i as f64))]).unwrap();
        materialize(&frame)
    }

    fn indices(page: &Page<'_>) -> Vec<usize> {
        page.rows.iter().map(TableRow::index).collect()
    }

    #[test]
    fn five_rows_two_per_page() {
        let rows = rows(5);
        let size = PageSize::Fixed(2);

        let first = paginate(&rows, &size, 1);
        assert_eq!(first.num_pages, 3);
        assert_eq!(indices(&first), vec![0, 1]);
        assert_eq!((first.range_start, first.range_end), (1, 2));

        let last = paginate(&rows, &size, 3);
        assert_eq!(indices(&last), vec![4]);
        assert_eq!((last.range_start, last.range_end), (5, 5));
    }

    #[test]
    fn empty_rows_have_no_pages() {
        let page = paginate(&[], &PageSize::Fixed(10), 4);
        assert_eq!(page.num_pages, 0);
        assert_eq!(page.clamped_page, 1);
        assert!(page.rows.is_empty());
        assert_eq!((page.range_start, page.range_end), (1, 0));
    }

    #[test]
    fn overflowing_page_clamps_to_last() {
        let rows = rows(3);
        let page = paginate(&rows, &PageSize::Fixed(2), 9);
        assert_eq!(page.clamped_page, 2);
        assert_eq!(indices(&page), vec![2]);
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let rows = rows(2);
        let page = paginate(&rows, &PageSize::Fixed(0), 2);
        assert_eq!(page.rows_per_page, 1);
        assert_eq!(page.num_pages, 2);
        assert_eq!(indices(&page), vec![1]);
    }

    #[test]
    fn fit_and_custom_sizes_resolve_against_rows() {
        let rows = rows(10);
        let fit = PageSize::Fit {
            available_height: 100,
            row_height: 36,
        };
        assert_eq!(fit.resolve(&rows), 2);

        let half = PageSize::custom(|rows| rows.len() / 2);
        assert_eq!(half.resolve(&rows), 5);
        assert_eq!(paginate(&rows, &half, 1).num_pages, 2);
    }

    #[test]
    fn paginator_clamps_when_rows_shrink() {
        let all = rows(6);
        let size = PageSize::Fixed(2);
        let mut paginator = Paginator::new();

        paginator.page(&all, &size);
        assert_eq!(paginator.navigate(3), 3);

        let filtered = &all[..2];
        let page = paginator.page(filtered, &size);
        assert_eq!(page.clamped_page, 1);
        assert_eq!(page.rows, filtered);
        assert_eq!(paginator.current_page(), 1);
    }

    #[test]
    fn navigation_is_clamped_to_known_pages() {
        let all = rows(5);
        let mut paginator = Paginator::new();
        paginator.page(&all, &PageSize::Fixed(2));

        assert_eq!(paginator.navigate(0), 1);
        assert_eq!(paginator.navigate(7), 3);
        assert_eq!(paginator.next_page(), 3);
        assert_eq!(paginator.previous_page(), 2);
    }

    #[test]
    fn navigate_within_uses_the_given_page_count() {
        let mut paginator = Paginator::new();
        assert_eq!(paginator.navigate_within(3, 4), 3);
        assert_eq!(paginator.num_pages(), 4);
        assert_eq!(paginator.navigate_within(9, 2), 2);
        assert_eq!(paginator.navigate_within(5, 0), 1);
    }
}
