use crate::rows::TableRow;
use std::collections::HashMap;

/// Runs a parent-level stage (filter, sort) while keeping nested rows with their parents.
///
/// Top-level rows are handed to `process`; each nested row is then re-inserted right after
/// the processed parent with the same index. Children whose parent was dropped are dropped
/// too. Without nested rows, `process` sees the input unchanged.
pub fn process_nested_rows<F>(rows: &[TableRow], process: F) -> Vec<TableRow>
where
    F: FnOnce(&[TableRow]) -> Vec<TableRow>,
{
    if !rows.iter().any(TableRow::is_nested) {
        return process(rows);
    }

    let mut parents = Vec::with_capacity(rows.len());
    let mut children: HashMap<usize, TableRow> = HashMap::new();
    for row in rows {
        if row.is_nested() {
            children.insert(row.index(), row.clone());
        } else {
            parents.push(row.clone());
        }
    }

    let processed = process(&parents);
    let mut out = Vec::with_capacity(processed.len() + children.len());
    for parent in processed {
        let child = children.remove(&parent.index());
        out.push(parent);
        if let Some(child) = child {
            out.push(child);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{filter_rows, ValueFilter};
    use crate::frame::{DataFrame, Field};
    use crate::rows::{materialize, NESTED_FRAMES_KEY};
    use crate::sort::{sort_rows, SortColumn};
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    fn frame() -> DataFrame {
        let child = |v: f64| Arc::new(DataFrame::new(vec![Field::number("v", [v])]).unwrap());
        DataFrame::new(vec![
            Field::string("name", ["b", "c", "a"]),
            Field::nested(
                NESTED_FRAMES_KEY,
                [vec![child(1.0)], vec![], vec![child(3.0)]],
            ),
        ])
        .unwrap()
    }

    fn shape(rows: &[TableRow]) -> Vec<(usize, usize)> {
        rows.iter().map(|r| (r.depth(), r.index())).collect()
    }

    #[test]
    fn sorting_parents_keeps_children_attached() {
        let frame = frame();
        let rows = materialize(&frame);
        let sorted = process_nested_rows(&rows, |parents| {
            sort_rows(parents, &frame.fields, &[SortColumn::ascending("name")], None)
        });
        assert_eq!(shape(&sorted), vec![(0, 2), (1, 2), (0, 0), (1, 0), (0, 1)]);
    }

    #[test]
    fn filtered_out_parents_drop_their_children() {
        let frame = frame();
        let rows = materialize(&frame);
        let filter = ValueFilter::new().with_values("name", ["c", "a"]);
        let filtered = process_nested_rows(&rows, |parents| filter_rows(parents, &filter));
        assert_eq!(shape(&filtered), vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn flat_rows_pass_straight_through() {
        let frame = DataFrame::new(vec![Field::number("v", [2.0, 1.0])]).unwrap();
        let rows = materialize(&frame);
        let out = process_nested_rows(&rows, |r| r.iter().rev().cloned().collect());
        assert_eq!(shape(&out), vec![(0, 1), (0, 0)]);
    }
}
