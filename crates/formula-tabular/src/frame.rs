use crate::error::{TableError, TableResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

/// Shared `Null` used when a lookup falls outside a field or row.
pub(crate) static NULL_CELL: CellValue = CellValue::Null;

/// Logical type of a frame field.
///
/// This is a closed set; anything the query layer can't classify should arrive as `String`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicalType {
    Time,
    Number,
    Boolean,
    String,
    Enum,
    /// A single reduced frame (e.g. a sparkline) carrying a scalar `value` used for ordering.
    Frame,
    /// Each cell is an ordered list of child frames (drill-down sub-tables).
    NestedFrames,
}

/// An embedded summary frame, ordered by its reduced `value`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameCell {
    /// Reduced statistic (e.g. "last" or "mean") of the embedded series.
    pub value: Option<f64>,
    pub frame: Option<Arc<DataFrame>>,
}

impl FrameCell {
    pub fn new(value: f64) -> Self {
        Self {
            value: Some(value),
            frame: None,
        }
    }

    pub fn with_frame(mut self, frame: Arc<DataFrame>) -> Self {
        self.frame = Some(frame);
        self
    }
}

/// A single cell of a frame or a materialized row.
///
/// Time values are epoch milliseconds carried as `Number`; the sub-millisecond remainder lives
/// in [`Field::nanos`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Null,
    Number(f64),
    Bool(bool),
    String(Arc<str>),
    Frame(FrameCell),
    Frames(Vec<Arc<DataFrame>>),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric coercion used by the numeric comparators.
    ///
    /// Booleans map to `0`/`1`, numeric strings parse (blank strings are `0`), and anything
    /// else is `NaN`. `Null` coerces to `0`, but callers are expected to handle nulls first.
    pub fn to_number(&self) -> f64 {
        match self {
            CellValue::Null => 0.0,
            CellValue::Number(n) => *n,
            CellValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            CellValue::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
            CellValue::Frame(_) | CellValue::Frames(_) => f64::NAN,
        }
    }

    /// Text coercion used by the string comparator and value filters.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Number(n) => Cow::Owned(format_number(*n)),
            CellValue::Bool(true) => Cow::Borrowed("true"),
            CellValue::Bool(false) => Cow::Borrowed("false"),
            CellValue::String(s) => Cow::Borrowed(s),
            CellValue::Frame(cell) => match cell.value {
                Some(v) => Cow::Owned(format_number(v)),
                None => Cow::Borrowed(""),
            },
            CellValue::Frames(_) => Cow::Borrowed(""),
        }
    }

    /// Child frames of a nested-frames cell, or an empty slice for any other value.
    pub fn frames(&self) -> &[Arc<DataFrame>] {
        match self {
            CellValue::Frames(frames) => frames,
            _ => &[],
        }
    }
}

/// Formats a number the way the dashboard prints plain numbers (`1` rather than `1.0`).
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // Avoid printing `-0`.
        return "0".to_string();
    }
    n.to_string()
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(Arc::from(value))
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(Arc::from(value))
    }
}

impl From<FrameCell> for CellValue {
    fn from(value: FrameCell) -> Self {
        CellValue::Frame(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

/// A named, typed column of a [`DataFrame`].
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub field_type: LogicalType,
    pub values: Vec<CellValue>,
    /// Sub-millisecond remainder per row; only meaningful for `Time` fields.
    pub nanos: Option<Vec<i64>>,
    /// Display-name override; takes precedence over `name` as the row column key.
    pub display_name: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: LogicalType, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            field_type,
            values,
            nanos: None,
            display_name: None,
        }
    }

    pub fn time(name: impl Into<String>, epoch_ms: impl IntoIterator<Item = i64>) -> Self {
        Self::new(
            name,
            LogicalType::Time,
            epoch_ms.into_iter().map(CellValue::from).collect(),
        )
    }

    pub fn number(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(
            name,
            LogicalType::Number,
            values.into_iter().map(CellValue::Number).collect(),
        )
    }

    pub fn string<S: AsRef<str>>(name: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            name,
            LogicalType::String,
            values.into_iter().map(|s| CellValue::from(s.as_ref())).collect(),
        )
    }

    pub fn boolean(name: impl Into<String>, values: impl IntoIterator<Item = bool>) -> Self {
        Self::new(
            name,
            LogicalType::Boolean,
            values.into_iter().map(CellValue::Bool).collect(),
        )
    }

    /// A nested-frames field: one (possibly empty) list of child frames per row.
    pub fn nested(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Vec<Arc<DataFrame>>>,
    ) -> Self {
        Self::new(
            name,
            LogicalType::NestedFrames,
            values.into_iter().map(CellValue::Frames).collect(),
        )
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_nanos(mut self, nanos: Vec<i64>) -> Self {
        self.nanos = Some(nanos);
        self
    }

    /// The column key used for this field in materialized rows, type maps and sort columns.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Returns the value at `row`, or `Null` when the field is shorter than the frame.
    pub fn value(&self, row: usize) -> &CellValue {
        self.values.get(row).unwrap_or(&NULL_CELL)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An immutable columnar table: ordered fields of equal length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataFrame {
    pub fields: Vec<Field>,
    pub length: usize,
}

impl DataFrame {
    /// Builds a frame, validating unique field names and equal field lengths.
    ///
    /// The frame length is taken from the first field (an empty field list yields an empty
    /// frame).
    pub fn new(fields: Vec<Field>) -> TableResult<Self> {
        let length = fields.first().map_or(0, Field::len);
        let mut seen: HashSet<&str> = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(TableError::DuplicateField {
                    name: field.name.clone(),
                });
            }
            if field.len() != length {
                return Err(TableError::LengthMismatch {
                    field: field.name.clone(),
                    expected: length,
                    actual: field.len(),
                });
            }
        }
        Ok(Self { fields, length })
    }

    /// Builds a frame without validation.
    ///
    /// Fields shorter than `length` read as `Null` past their end; longer fields are truncated
    /// by materialization.
    pub fn from_parts(fields: Vec<Field>, length: usize) -> Self {
        Self { fields, length }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Finds a field by its display name (the materialized column key).
    ///
    /// When several fields share a display name the last one wins, matching how rows resolve
    /// that key.
    pub fn field_by_display_name(&self, display_name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .rev()
            .find(|f| f.display_name() == display_name)
    }
}
