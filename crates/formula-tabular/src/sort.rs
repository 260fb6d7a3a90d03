use crate::compare::{comparator_for, compare_natural, Comparator};
use crate::frame::{CellValue, Field, LogicalType};
use crate::rows::{RowSchema, TableRow};
use crate::types::{resolve_column_types, ColumnTypes};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// One key of a multi-column sort.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortColumn {
    /// Column display name.
    pub key: String,
    pub direction: SortDirection,
}

impl SortColumn {
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// A sort column with everything needed per comparison looked up up front.
struct SortSpec<'a> {
    key: &'a str,
    /// Column position in the schema shared by the rows, when the key exists there.
    position: Option<usize>,
    compare: Comparator,
    descending: bool,
    nanos: Option<&'a [i64]>,
}

impl SortSpec<'_> {
    fn cell<'r>(&self, row: &'r TableRow, schema: Option<&Arc<RowSchema>>) -> &'r CellValue {
        match (self.position, schema) {
            (Some(pos), Some(schema)) if Arc::ptr_eq(row.schema(), schema) => row.get_at(pos),
            _ => row.get(self.key),
        }
    }

    fn directed(&self, ord: Ordering) -> Ordering {
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }
}

/// Sorts rows by an ordered list of columns.
///
/// Columns compare with the comparator for their resolved type; `column_types` is resolved
/// from `fields` when not supplied. Ties on a `Time` column fall back to the field's
/// sub-millisecond `nanos`, indexed by each row's originating top-level index. The sort is
/// stable, and an empty `sort_columns` returns the rows as given.
pub fn sort_rows(
    rows: &[TableRow],
    fields: &[Field],
    sort_columns: &[SortColumn],
    column_types: Option<&ColumnTypes>,
) -> Vec<TableRow> {
    if sort_columns.is_empty() {
        return rows.to_vec();
    }

    let resolved;
    let column_types = match column_types {
        Some(types) => types,
        None => {
            resolved = resolve_column_types(fields);
            &resolved
        }
    };

    let schema = rows.first().map(|row| row.schema().clone());
    let specs: Vec<SortSpec<'_>> = sort_columns
        .iter()
        .map(|col| {
            let compare = match column_types.get(&col.key) {
                Some(ty) => comparator_for(ty),
                None => {
                    log::debug!("no type for sort column {:?}; comparing as text", col.key);
                    compare_as_text
                }
            };
            SortSpec {
                key: &col.key,
                position: schema.as_ref().and_then(|s| s.position(&col.key)),
                compare,
                descending: col.direction == SortDirection::Descending,
                nanos: time_nanos(fields, &col.key),
            }
        })
        .collect();

    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| compare_rows(a, b, &specs, schema.as_ref()));
    sorted
}

fn compare_as_text(a: &CellValue, b: &CellValue) -> Ordering {
    compare_natural(&a.to_text(), &b.to_text())
}

/// Sub-millisecond remainders of the `Time` field shown under `key`, if it carries any.
fn time_nanos<'a>(fields: &'a [Field], key: &str) -> Option<&'a [i64]> {
    fields
        .iter()
        .rev()
        .find(|f| f.display_name() == key)
        .filter(|f| f.field_type == LogicalType::Time)
        .and_then(|f| f.nanos.as_deref())
}

fn compare_rows(
    a: &TableRow,
    b: &TableRow,
    specs: &[SortSpec<'_>],
    schema: Option<&Arc<RowSchema>>,
) -> Ordering {
    for spec in specs {
        let mut ord = spec.directed((spec.compare)(spec.cell(a, schema), spec.cell(b, schema)));
        if ord == Ordering::Equal {
            if let Some(nanos) = spec.nanos {
                // A row without a remainder sorts before rows with one.
                ord = spec.directed(nanos.get(a.index()).cmp(&nanos.get(b.index())));
            }
        }
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
