use crate::frame::{CellValue, DataFrame, Field, NULL_CELL};
use std::collections::HashMap;
use std::sync::Arc;

/// Column key of the field that carries per-row child frames.
pub const NESTED_FRAMES_KEY: &str = "__nestedFrames";

/// Column layout shared by every row materialized from one frame.
///
/// Columns are stored in field order under their display names. When two fields share a
/// display name, lookups resolve to the later one.
#[derive(Debug, Default, PartialEq)]
pub struct RowSchema {
    columns: Vec<Arc<str>>,
    positions: HashMap<Arc<str>, usize>,
}

impl RowSchema {
    pub fn from_fields(fields: &[Field]) -> Self {
        let columns: Vec<Arc<str>> = fields.iter().map(|f| Arc::from(f.display_name())).collect();
        let mut positions = HashMap::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            positions.insert(name.clone(), idx);
        }
        Self { columns, positions }
    }

    pub fn columns(&self) -> &[Arc<str>] {
        &self.columns
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }
}

/// A flattened, render-ready row.
///
/// Cloning is cheap: the schema and cells are shared.
#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    depth: usize,
    index: usize,
    schema: Arc<RowSchema>,
    cells: Arc<[CellValue]>,
    nested: Option<Arc<DataFrame>>,
}

impl TableRow {
    /// `0` for top-level rows, `1` for a nested child row.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Row index in the top-level frame. Nested rows share their parent's index.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_nested(&self) -> bool {
        self.depth > 0
    }

    /// Returns the cell for `key`, or `Null` when the row has no such column.
    ///
    /// Nested rows carry no top-level columns, so every key reads as `Null` for them.
    pub fn get(&self, key: &str) -> &CellValue {
        self.schema
            .position(key)
            .map_or(&NULL_CELL, |pos| self.get_at(pos))
    }

    pub(crate) fn get_at(&self, pos: usize) -> &CellValue {
        self.cells.get(pos).unwrap_or(&NULL_CELL)
    }

    pub fn schema(&self) -> &Arc<RowSchema> {
        &self.schema
    }

    /// `(column, cell)` pairs in field order. Empty for nested rows.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &CellValue)> + '_ {
        self.schema
            .columns()
            .iter()
            .zip(self.cells.iter())
            .map(|(name, cell)| (name.as_ref(), cell))
    }

    /// The child frame a nested row represents.
    pub fn nested_frame(&self) -> Option<&Arc<DataFrame>> {
        self.nested.as_ref()
    }
}

/// Flattens a frame into depth-first rows.
///
/// Each top-level row is followed by at most one nested row referencing the first child frame
/// of its `__nestedFrames` cell. Sibling child frames beyond the first are not surfaced.
pub fn materialize(frame: &DataFrame) -> Vec<TableRow> {
    let schema = Arc::new(RowSchema::from_fields(&frame.fields));
    let nested_pos = schema.position(NESTED_FRAMES_KEY);
    let no_cells: Arc<[CellValue]> = Arc::from(Vec::new());

    let mut rows = Vec::with_capacity(frame.length);
    for index in 0..frame.length {
        let cells: Arc<[CellValue]> = frame
            .fields
            .iter()
            .map(|field| field.value(index).clone())
            .collect();

        let child = nested_pos.and_then(|pos| {
            let frames = cells[pos].frames();
            if frames.len() > 1 {
                log::debug!(
                    "row {index} has {} nested frames; only the first is materialized",
                    frames.len()
                );
            }
            frames.first().cloned()
        });

        rows.push(TableRow {
            depth: 0,
            index,
            schema: schema.clone(),
            cells,
            nested: None,
        });

        if let Some(child) = child {
            rows.push(TableRow {
                depth: 1,
                index,
                schema: schema.clone(),
                cells: no_cells.clone(),
                nested: Some(child),
            });
        }
    }
    rows
}
