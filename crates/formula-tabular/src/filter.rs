use crate::rows::TableRow;
use std::collections::{BTreeMap, HashSet};

/// Decides which rows stay visible.
pub trait RowFilter {
    fn keep(&self, row: &TableRow) -> bool;
}

impl<F> RowFilter for F
where
    F: Fn(&TableRow) -> bool,
{
    fn keep(&self, row: &TableRow) -> bool {
        self(row)
    }
}

/// Header "filter by value" state: per column, the set of displayed values to keep.
///
/// A row is kept when, for every filtered column, the text of its cell is in that column's
/// set. Columns without an entry don't filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueFilter {
    columns: BTreeMap<String, HashSet<String>>,
}

impl ValueFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<S: Into<String>>(
        mut self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        self.set_values(key, values);
        self
    }

    /// Replaces the accepted values for `key`.
    pub fn set_values<S: Into<String>>(
        &mut self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) {
        self.columns
            .insert(key.into(), values.into_iter().map(Into::into).collect());
    }

    /// Stops filtering on `key`.
    pub fn clear(&mut self, key: &str) {
        self.columns.remove(key);
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl RowFilter for ValueFilter {
    fn keep(&self, row: &TableRow) -> bool {
        self.columns
            .iter()
            .all(|(key, accepted)| accepted.contains(&*row.get(key).to_text()))
    }
}

/// Keeps the rows accepted by `filter`, in order.
///
/// Every row is tested as given; nested rows have no column values, so use
/// [`crate::process_nested_rows`] to keep children with their parents.
pub fn filter_rows(rows: &[TableRow], filter: &dyn RowFilter) -> Vec<TableRow> {
    rows.iter().filter(|row| filter.keep(row)).cloned().collect()
}
