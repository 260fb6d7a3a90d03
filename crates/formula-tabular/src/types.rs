use crate::frame::{Field, LogicalType};
use std::collections::HashMap;

/// Display name → logical type for the columns of a frame (including nested frames).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnTypes {
    types: HashMap<String, LogicalType>,
}

impl ColumnTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<LogicalType> {
        self.types.get(key).copied()
    }

    /// Sets the type of a column, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, ty: LogicalType) {
        self.types.insert(key.into(), ty);
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, LogicalType)> + '_ {
        self.types.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, LogicalType)> for ColumnTypes {
    fn from_iter<I: IntoIterator<Item = (K, LogicalType)>>(iter: I) -> Self {
        let mut out = ColumnTypes::new();
        for (k, ty) in iter {
            out.insert(k, ty);
        }
        out
    }
}

/// Resolves the logical type of every column keyed by display name.
///
/// A `NestedFrames` field contributes the types of its first child frame (first row) instead
/// of an entry for itself. On a key collision the later field wins.
pub fn resolve_column_types(fields: &[Field]) -> ColumnTypes {
    let mut out = ColumnTypes::new();
    collect_types(fields, &mut out);
    out
}

fn collect_types(fields: &[Field], out: &mut ColumnTypes) {
    for field in fields {
        if field.field_type != LogicalType::NestedFrames {
            out.insert(field.display_name(), field.field_type);
            continue;
        }

        if let Some(child) = field.values.first().and_then(|v| v.frames().first()) {
            collect_types(&child.fields, out);
        }
    }
}
