//! Row engine for Formula table panels.
//!
//! This crate turns a columnar [`DataFrame`] (optionally carrying one level of nested child
//! frames) into display-ready rows:
//! - [`materialize`] flattens a frame into depth-first [`TableRow`]s,
//! - [`resolve_column_types`] maps column display names to their [`LogicalType`],
//! - [`sort_rows`] applies a stable, type-aware multi-column sort, and
//! - [`paginate`] / [`Paginator`] slice the result into pages.
//!
//! Every stage is a pure function over its inputs; [`TableView`] wires them together with
//! per-stage caching for callers that re-render often.

#![forbid(unsafe_code)]

mod compare;
mod error;
mod filter;
mod frame;
mod nested;
mod options;
mod paginate;
mod rows;
mod sort;
mod types;
mod view;

pub use crate::compare::{comparator_for, compare_natural, Comparator};
pub use crate::error::{TableError, TableResult};
pub use crate::filter::{filter_rows, RowFilter, ValueFilter};
pub use crate::frame::{CellValue, DataFrame, Field, FrameCell, LogicalType};
pub use crate::nested::process_nested_rows;
pub use crate::options::{CellHeight, SortByField, TableOptions};
pub use crate::paginate::{clamp_page, paginate, Page, PageSize, Paginator};
pub use crate::rows::{materialize, RowSchema, TableRow, NESTED_FRAMES_KEY};
pub use crate::sort::{sort_rows, SortColumn, SortDirection};
pub use crate::types::{resolve_column_types, ColumnTypes};
pub use crate::view::{SharedRowFilter, TableView};
