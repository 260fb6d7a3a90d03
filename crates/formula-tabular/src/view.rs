use crate::filter::{filter_rows, RowFilter};
use crate::frame::DataFrame;
use crate::nested::process_nested_rows;
use crate::options::TableOptions;
use crate::paginate::{Page, PageSize, Paginator};
use crate::rows::{materialize, TableRow};
use crate::sort::{sort_rows, SortColumn};
use crate::types::{resolve_column_types, ColumnTypes};
use std::fmt;
use std::sync::Arc;

/// A shareable row filter.
pub type SharedRowFilter = Arc<dyn RowFilter + Send + Sync>;

/// Memoized materialize → filter → sort → paginate pipeline over one frame.
///
/// Each stage is cached and only recomputed when one of its inputs changes. Nested rows stay
/// directly after their parents through filtering and sorting.
pub struct TableView {
    frame: Arc<DataFrame>,
    sort_columns: Vec<SortColumn>,
    filter: Option<SharedRowFilter>,
    /// `None` shows every row on a single page.
    page_size: Option<PageSize>,
    paginator: Paginator,

    materialized: Option<Vec<TableRow>>,
    column_types: Option<ColumnTypes>,
    filtered: Option<Vec<TableRow>>,
    sorted: Option<Vec<TableRow>>,
}

impl fmt::Debug for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableView")
            .field("rows", &self.frame.len())
            .field("sort_columns", &self.sort_columns)
            .field("filtered", &self.filter.is_some())
            .field("page_size", &self.page_size)
            .field("paginator", &self.paginator)
            .finish_non_exhaustive()
    }
}

impl TableView {
    pub fn new(frame: Arc<DataFrame>) -> Self {
        Self {
            frame,
            sort_columns: Vec::new(),
            filter: None,
            page_size: None,
            paginator: Paginator::new(),
            materialized: None,
            column_types: None,
            filtered: None,
            sorted: None,
        }
    }

    pub fn frame(&self) -> &Arc<DataFrame> {
        &self.frame
    }

    /// Replaces the frame. The current page is kept and clamped on the next [`TableView::page`].
    pub fn set_frame(&mut self, frame: Arc<DataFrame>) {
        if Arc::ptr_eq(&self.frame, &frame) {
            return;
        }
        log::trace!("table frame replaced; recomputing all stages");
        self.frame = frame;
        self.materialized = None;
        self.column_types = None;
        self.filtered = None;
        self.sorted = None;
    }

    pub fn sort_columns(&self) -> &[SortColumn] {
        &self.sort_columns
    }

    pub fn set_sort_columns(&mut self, sort_columns: Vec<SortColumn>) {
        if self.sort_columns == sort_columns {
            return;
        }
        self.sort_columns = sort_columns;
        self.sorted = None;
    }

    pub fn set_filter(&mut self, filter: Option<SharedRowFilter>) {
        self.filter = filter;
        self.filtered = None;
        self.sorted = None;
    }

    pub fn set_page_size(&mut self, page_size: Option<PageSize>) {
        self.page_size = page_size;
    }

    /// Applies the sort and pagination settings of the panel options.
    pub fn apply_options(&mut self, options: &TableOptions, available_height: usize) {
        self.set_sort_columns(options.sort_columns());
        self.set_page_size(options.page_size(available_height));
    }

    pub fn column_types(&mut self) -> &ColumnTypes {
        let frame = &self.frame;
        self.column_types
            .get_or_insert_with(|| resolve_column_types(&frame.fields))
    }

    /// The filtered, sorted rows across all pages.
    pub fn rows(&mut self) -> &[TableRow] {
        self.ensure_sorted();
        self.sorted.as_deref().unwrap_or_default()
    }

    pub fn current_page(&self) -> usize {
        self.paginator.current_page()
    }

    /// Moves to `requested`, clamped to the pages of the current rows.
    pub fn navigate(&mut self, requested: usize) -> usize {
        self.ensure_sorted();
        let rows = self.sorted.as_deref().unwrap_or_default();
        let rows_per_page = self.effective_page_size(rows).resolve(rows);
        let num_pages = rows.len().div_ceil(rows_per_page);
        self.paginator.navigate_within(requested, num_pages)
    }

    /// The visible page, clamping the current page if the row set shrank.
    pub fn page(&mut self) -> Page<'_> {
        self.ensure_sorted();
        let rows = self.sorted.as_deref().unwrap_or_default();
        let page_size = self.effective_page_size(rows);
        self.paginator.page(rows, &page_size)
    }

    fn effective_page_size(&self, rows: &[TableRow]) -> PageSize {
        match &self.page_size {
            Some(size) => size.clone(),
            None => PageSize::Fixed(rows.len()),
        }
    }

    fn ensure_sorted(&mut self) {
        if self.sorted.is_some() {
            return;
        }

        let frame = &self.frame;
        let materialized: &[TableRow] = self.materialized.get_or_insert_with(|| {
            log::trace!("materializing {} rows", frame.len());
            materialize(frame)
        });

        let filter = &self.filter;
        let filtered: &[TableRow] = self.filtered.get_or_insert_with(|| match filter {
            Some(filter) => process_nested_rows(materialized, |parents| {
                filter_rows(parents, filter.as_ref())
            }),
            None => materialized.to_vec(),
        });

        let column_types: &ColumnTypes = self
            .column_types
            .get_or_insert_with(|| resolve_column_types(&frame.fields));

        let sorted = process_nested_rows(filtered, |parents| {
            sort_rows(parents, &frame.fields, &self.sort_columns, Some(column_types))
        });
        self.sorted = Some(sorted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ValueFilter;
    use crate::frame::Field;

    use pretty_assertions::assert_eq;

    fn frame() -> Arc<DataFrame> {
        Arc::new(
            DataFrame::new(vec![
                Field::string("host", ["e", "d", "c", "b", "a"]),
                Field::number("cpu", [5.0, 4.0, 3.0, 2.0, 1.0]),
            ])
            .unwrap(),
        )
    }

    fn indices(rows: &[TableRow]) -> Vec<usize> {
        rows.iter().map(TableRow::index).collect()
    }

    #[test]
    fn unpaginated_view_shows_everything_on_one_page() {
        let mut view = TableView::new(frame());
        let page = view.page();
        assert_eq!(page.num_pages, 1);
        assert_eq!(indices(page.rows), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn sorts_then_paginates() {
        let mut view = TableView::new(frame());
        view.set_sort_columns(vec![SortColumn::ascending("cpu")]);
        view.set_page_size(Some(PageSize::Fixed(2)));

        assert_eq!(view.navigate(2), 2);
        assert_eq!(indices(view.page().rows), vec![2, 1]);
        assert_eq!(view.navigate(1), 1);
        assert_eq!(indices(view.page().rows), vec![4, 3]);
        assert_eq!(view.navigate(7), 3);
        assert_eq!(indices(view.page().rows), vec![0]);
    }

    #[test]
    fn navigation_sees_rows_of_a_larger_frame() {
        let single = Arc::new(DataFrame::new(vec![Field::number("cpu", [1.0])]).unwrap());
        let mut view = TableView::new(single);
        view.set_page_size(Some(PageSize::Fixed(2)));
        assert_eq!(view.page().num_pages, 1);

        let six = Arc::new(
            DataFrame::new(vec![Field::number("cpu", [1.0, 2.0, 3.0, 4.0, 5.0, 6.0])]).unwrap(),
        );
        view.set_frame(six);
        assert_eq!(view.navigate(3), 3);
        let page = view.page();
        assert_eq!(page.clamped_page, 3);
        assert_eq!(indices(page.rows), vec![4, 5]);
    }

    #[test]
    fn navigation_sees_a_widened_filter() {
        let mut view = TableView::new(frame());
        view.set_page_size(Some(PageSize::Fixed(2)));
        view.set_filter(Some(Arc::new(ValueFilter::new().with_values("host", ["a"]))));
        assert_eq!(view.page().num_pages, 1);

        view.set_filter(None);
        assert_eq!(view.navigate(3), 3);
        assert_eq!(indices(view.page().rows), vec![4]);
    }

    #[test]
    fn filter_shrink_clamps_current_page() {
        let mut view = TableView::new(frame());
        view.set_page_size(Some(PageSize::Fixed(2)));
        view.page();
        view.navigate(3);
        assert_eq!(indices(view.page().rows), vec![4]);

        let filter = ValueFilter::new().with_values("host", ["a", "b"]);
        view.set_filter(Some(Arc::new(filter)));
        let page = view.page();
        assert_eq!(page.num_pages, 1);
        assert_eq!(page.clamped_page, 1);
        assert_eq!(indices(page.rows), vec![3, 4]);
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn replacing_the_frame_recomputes_rows() {
        let mut view = TableView::new(frame());
        assert_eq!(view.rows().len(), 5);

        let smaller = Arc::new(DataFrame::new(vec![Field::number("cpu", [1.0])]).unwrap());
        view.set_frame(smaller);
        assert_eq!(view.rows().len(), 1);
        assert_eq!(view.column_types().len(), 1);
    }

    #[test]
    fn options_drive_sort_and_page_size() {
        let options = TableOptions::from_json(
            r#"{"sortBy":[{"displayName":"host"}],"enablePagination":true,"rowsPerPage":3}"#,
        )
        .unwrap();
        let mut view = TableView::new(frame());
        view.apply_options(&options, 0);

        let page = view.page();
        assert_eq!(page.num_pages, 2);
        assert_eq!(indices(page.rows), vec![4, 3, 2]);
    }
}
