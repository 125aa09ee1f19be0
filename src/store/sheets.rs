//! Google Sheets backend over the v4 `values` endpoints.
//!
//! Every call is a blocking HTTP round trip; nothing is cached between calls,
//! so edits made directly in the sheet are always visible to the next read.
use super::{fit_row, ColumnHandle, RecordStore, RowHandle, StoreResult};
use crate::record::Table;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use ureq::Agent;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Cells are stored exactly as sent, so "012345" keeps its leading zero and
/// dates stay DD/MM/YYYY text.
const VALUE_INPUT_OPTION: &str = "RAW";
const APPEND_QUERY: [(&str, &str); 2] = [
    ("valueInputOption", VALUE_INPUT_OPTION),
    ("insertDataOption", "INSERT_ROWS"),
];

/// Where the spreadsheet lives and how to authenticate against it.
#[derive(Debug, Clone)]
pub struct SheetsTarget {
    pub spreadsheet_id: String,
    pub base_url: String,
    pub token: String,
}

pub struct SheetsStore {
    agent: Agent,
    target: SheetsTarget,
}

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct RangeWrite<'a> {
    range: String,
    values: [[&'a str; 1]; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdate<'a> {
    value_input_option: &'static str,
    data: Vec<RangeWrite<'a>>,
}

#[derive(Debug, Serialize)]
struct RowAppend<'a> {
    values: [&'a [String]; 1],
}

impl SheetsStore {
    pub fn new(target: SheetsTarget) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();
        Self { agent, target }
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{range}",
            self.target.base_url.trim_end_matches('/'),
            self.target.spreadsheet_id
        )
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.target.token)
    }

    fn get_range(&self, range: &str) -> StoreResult<ValueRange> {
        tracing::debug!(range, "fetching sheet range");
        let value_range = self
            .agent
            .get(&self.values_url(range))
            .header("Authorization", &self.bearer())
            .call()?
            .body_mut()
            .read_json::<ValueRange>()?;
        Ok(value_range)
    }

    fn sheet_values(&self, table: Table) -> StoreResult<(Vec<String>, Vec<Vec<String>>)> {
        let mut values = self.get_range(table.sheet_name())?.values.into_iter();
        let headers = values.next().unwrap_or_default();
        Ok((headers, values.collect()))
    }
}

/// Spreadsheet column letters for a zero-based column index (0 → A, 26 → AA).
fn column_letters(column: usize) -> String {
    let mut letters = Vec::new();
    let mut n = column + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// A1 reference for a data cell; data row 0 sits on sheet row 2.
fn a1_cell(table: Table, row: RowHandle, column: ColumnHandle) -> String {
    format!(
        "{}!{}{}",
        table.sheet_name(),
        column_letters(column.0),
        row.0 + 2
    )
}

fn pad_rows(rows: Vec<Vec<String>>, width: usize) -> Vec<Vec<String>> {
    rows.into_iter()
        .map(|mut row| {
            row.resize(width.max(row.len()), String::new());
            row
        })
        .collect()
}

impl RecordStore for SheetsStore {
    fn fetch_headers(&self, table: Table) -> StoreResult<Vec<String>> {
        let range = format!("{}!1:1", table.sheet_name());
        Ok(self
            .get_range(&range)?
            .values
            .into_iter()
            .next()
            .unwrap_or_default())
    }

    fn fetch_rows(&self, table: Table) -> StoreResult<Vec<Vec<String>>> {
        let (headers, rows) = self.sheet_values(table)?;
        Ok(pad_rows(rows, headers.len()))
    }

    fn read_cell(&self, table: Table, row: RowHandle, column: ColumnHandle) -> StoreResult<String> {
        let cell = self
            .get_range(&a1_cell(table, row, column))?
            .values
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .unwrap_or_default();
        Ok(cell)
    }

    fn write_cell(
        &mut self,
        table: Table,
        row: RowHandle,
        column: ColumnHandle,
        value: &str,
    ) -> StoreResult<()> {
        let range = a1_cell(table, row, column);
        let body = RangeWrite {
            range: range.clone(),
            values: [[value]],
        };
        self.agent
            .put(&self.values_url(&range))
            .header("Authorization", &self.bearer())
            .query("valueInputOption", VALUE_INPUT_OPTION)
            .send_json(&body)?;
        tracing::info!(%table, range, value, "cell written");
        Ok(())
    }

    fn write_cells(
        &mut self,
        table: Table,
        row: RowHandle,
        cells: &[(ColumnHandle, String)],
    ) -> StoreResult<()> {
        let body = BatchUpdate {
            value_input_option: VALUE_INPUT_OPTION,
            data: cells
                .iter()
                .map(|(column, value)| RangeWrite {
                    range: a1_cell(table, row, *column),
                    values: [[value.as_str()]],
                })
                .collect(),
        };
        let url = format!(
            "{}/v4/spreadsheets/{}/values:batchUpdate",
            self.target.base_url.trim_end_matches('/'),
            self.target.spreadsheet_id
        );
        self.agent
            .post(&url)
            .header("Authorization", &self.bearer())
            .send_json(&body)?;
        tracing::info!(%table, row = row.0, cells = cells.len(), "cells written");
        Ok(())
    }

    fn append_row(&mut self, table: Table, values: &[String]) -> StoreResult<()> {
        let width = self.fetch_headers(table)?.len();
        let row = fit_row(table, values, width)?;
        let url = format!("{}:append", self.values_url(table.sheet_name()));
        let mut request = self
            .agent
            .post(&url)
            .header("Authorization", &self.bearer());
        for (key, value) in APPEND_QUERY {
            request = request.query(key, value);
        }
        request.send_json(&RowAppend { values: [&row] })?;
        tracing::info!(%table, key = ?row.first(), "row appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(base_url: &str) -> SheetsStore {
        SheetsStore::new(SheetsTarget {
            spreadsheet_id: "sheet-id".to_string(),
            base_url: base_url.to_string(),
            token: "secret".to_string(),
        })
    }

    #[test]
    fn column_letters_roll_over_after_z() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(13), "N");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(27), "AB");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
    }

    #[test]
    fn a1_cells_skip_the_header_row() {
        assert_eq!(
            a1_cell(Table::RedeploymentPool, RowHandle(0), ColumnHandle(13)),
            "redeployment_pool!N2"
        );
        assert_eq!(
            a1_cell(Table::RetrenchedEmployees, RowHandle(9), ColumnHandle(1)),
            "retrenched_employees!B11"
        );
    }

    #[test]
    fn urls_join_base_id_and_range() {
        let store = store("https://sheets.example.test/");
        assert_eq!(
            store.values_url("placed_employees"),
            "https://sheets.example.test/v4/spreadsheets/sheet-id/values/placed_employees"
        );
        assert_eq!(store.bearer(), "Bearer secret");
    }

    #[test]
    fn short_rows_are_padded_to_header_width() {
        let rows = vec![
            vec!["123456".to_string()],
            vec!["654321".to_string(), "50000".to_string()],
        ];
        let padded = pad_rows(rows, 2);
        assert_eq!(padded[0], vec!["123456".to_string(), String::new()]);
        assert_eq!(padded[1].len(), 2);
    }

    #[test]
    fn writes_keep_leading_zero_keys_as_text() {
        assert!(APPEND_QUERY.contains(&("valueInputOption", "RAW")));
        assert!(APPEND_QUERY.contains(&("insertDataOption", "INSERT_ROWS")));

        let row = vec!["012345".to_string(), "01/07/2021".to_string()];
        let body = serde_json::to_value(RowAppend { values: [&row] }).unwrap();
        assert_eq!(body, serde_json::json!({"values": [["012345", "01/07/2021"]]}));

        let batch = BatchUpdate {
            value_input_option: VALUE_INPUT_OPTION,
            data: vec![RangeWrite {
                range: "redeployment_pool!L2".to_string(),
                values: [["01/08/2021"]],
            }],
        };
        let body = serde_json::to_value(&batch).unwrap();
        assert_eq!(body["valueInputOption"], "RAW");
        assert_eq!(body["data"][0]["values"], serde_json::json!([["01/08/2021"]]));
    }

    #[test]
    fn value_range_without_values_is_empty() {
        let range: ValueRange =
            serde_json::from_str(r#"{"range":"placed_employees!A1:G1","majorDimension":"ROWS"}"#)
                .unwrap();
        assert!(range.values.is_empty());
    }
}
