#![allow(dead_code)]

use formula_tabular::{DataFrame, Field, FrameCell, LogicalType, TableRow, NESTED_FRAMES_KEY};
use std::sync::Arc;

/// A small service-latency frame: one row per service, with a sparkline summary and one
/// nested frame of raw samples per row (the `api` row has none).
pub fn service_frame() -> DataFrame {
    let samples = |values: &[f64]| {
        Arc::new(
            DataFrame::new(vec![
                Field::time("time", (0..values.len() as i64).map(|i| 1_000 * i)),
                Field::number("value", values.iter().copied()),
            ])
            .unwrap(),
        )
    };

    DataFrame::new(vec![
        Field::string("service", ["web10", "web2", "api", "db"]),
        Field::number("p99", [120.0, 80.0, 250.0, 80.0]).with_display_name("Latency"),
        Field::new(
            "trend",
            LogicalType::Frame,
            vec![
                FrameCell::new(3.0).into(),
                FrameCell::new(1.0).into(),
                FrameCell::default().into(),
                FrameCell::new(2.0).into(),
            ],
        ),
        Field::nested(
            NESTED_FRAMES_KEY,
            [
                vec![samples(&[100.0, 120.0])],
                vec![samples(&[80.0]), samples(&[81.0])],
                vec![],
                vec![samples(&[70.0, 80.0])],
            ],
        ),
    ])
    .unwrap()
}

pub fn shape(rows: &[TableRow]) -> Vec<(usize, usize)> {
    rows.iter().map(|r| (r.depth(), r.index())).collect()
}

pub fn indices(rows: &[TableRow]) -> Vec<usize> {
    rows.iter().map(TableRow::index).collect()
}
