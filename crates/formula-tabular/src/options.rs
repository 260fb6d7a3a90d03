use crate::error::TableResult;
use crate::paginate::PageSize;
use crate::sort::{SortColumn, SortDirection};
use serde::{Deserialize, Serialize};

/// Row height preset of the table panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellHeight {
    #[default]
    Sm,
    Md,
    Lg,
}

impl CellHeight {
    /// Row height in pixels.
    pub fn row_height(self) -> usize {
        match self {
            CellHeight::Sm => 36,
            CellHeight::Md => 42,
            CellHeight::Lg => 48,
        }
    }
}

/// A persisted sort entry of the panel (`{ "displayName": "cpu", "desc": true }`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortByField {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<bool>,
}

/// Table panel options that drive sorting and pagination.
///
/// Unknown keys in the panel JSON (footer, cell options, ...) are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableOptions {
    pub show_header: bool,
    pub cell_height: CellHeight,
    pub sort_by: Vec<SortByField>,
    pub enable_pagination: bool,
    /// Fixed page size; when unset, pages fit the available height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_per_page: Option<usize>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            show_header: true,
            cell_height: CellHeight::default(),
            sort_by: Vec::new(),
            enable_pagination: false,
            rows_per_page: None,
        }
    }
}

impl TableOptions {
    pub fn from_json(json: &str) -> TableResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> TableResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn sort_columns(&self) -> Vec<SortColumn> {
        self.sort_by
            .iter()
            .map(|s| SortColumn {
                key: s.display_name.clone(),
                direction: if s.desc.unwrap_or(false) {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                },
            })
            .collect()
    }

    /// Page size for a panel body of `available_height` pixels, or `None` when pagination is
    /// disabled.
    pub fn page_size(&self, available_height: usize) -> Option<PageSize> {
        if !self.enable_pagination {
            return None;
        }
        if let Some(n) = self.rows_per_page {
            return Some(PageSize::Fixed(n));
        }

        let row_height = self.cell_height.row_height();
        let header = if self.show_header { row_height } else { 0 };
        Some(PageSize::Fit {
            available_height: available_height.saturating_sub(header),
            row_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;

    use pretty_assertions::assert_eq;

    #[test]
    fn parses_panel_options() {
        let options = TableOptions::from_json(
            r#"{
                "showHeader": true,
                "cellHeight": "md",
                "footer": { "show": false },
                "sortBy": [
                    { "displayName": "cpu", "desc": true },
                    { "displayName": "host" }
                ],
                "enablePagination": true
            }"#,
        )
        .unwrap();

        assert_eq!(options.cell_height, CellHeight::Md);
        assert_eq!(
            options.sort_columns(),
            vec![SortColumn::descending("cpu"), SortColumn::ascending("host")]
        );
    }

    #[test]
    fn empty_object_uses_defaults() {
        assert_eq!(TableOptions::from_json("{}").unwrap(), TableOptions::default());
    }

    #[test]
    fn malformed_json_is_an_options_error() {
        let err = TableOptions::from_json(r#"{"sortBy": 3}"#).unwrap_err();
        assert!(matches!(err, TableError::InvalidOptions(_)));
    }

    #[test]
    fn serializes_in_camel_case() {
        let options = TableOptions {
            sort_by: vec![SortByField {
                display_name: "cpu".to_string(),
                desc: Some(true),
            }],
            ..TableOptions::default()
        };
        let json = options.to_json().unwrap();
        assert!(json.contains(r#""sortBy":[{"displayName":"cpu","desc":true}]"#));
        assert_eq!(TableOptions::from_json(&json).unwrap(), options);
    }

    #[test]
    fn page_size_follows_pagination_settings() {
        let mut options = TableOptions::default();
        assert!(options.page_size(400).is_none());

        options.enable_pagination = true;
        // 400px minus a 36px header fits ten 36px rows.
        let rows = options.page_size(400).unwrap().resolve(&[]);
        assert_eq!(rows, 10);

        options.rows_per_page = Some(25);
        assert_eq!(options.page_size(400).unwrap().resolve(&[]), 25);
    }
}
