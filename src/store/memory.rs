//! In-process workbook: the reference implementation of [`RecordStore`].
use super::{fit_row, ColumnHandle, RecordStore, RowHandle, StoreError, StoreResult};
use crate::record::Table;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One worksheet: a header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

/// Worksheets keyed by sheet name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryWorkbook {
    sheets: BTreeMap<String, Sheet>,
}

impl MemoryWorkbook {
    /// Empty workbook with the three pool tables and their header rows.
    pub fn with_layout() -> Self {
        let sheets = Table::ALL
            .iter()
            .map(|table| {
                let sheet = Sheet {
                    headers: table.headers().iter().map(|h| h.to_string()).collect(),
                    rows: Vec::new(),
                };
                (table.sheet_name().to_string(), sheet)
            })
            .collect();
        Self { sheets }
    }

    pub fn sheet(&self, table: Table) -> StoreResult<&Sheet> {
        self.sheets
            .get(table.sheet_name())
            .ok_or_else(|| missing_sheet(table))
    }

    fn sheet_mut(&mut self, table: Table) -> StoreResult<&mut Sheet> {
        self.sheets
            .get_mut(table.sheet_name())
            .ok_or_else(|| missing_sheet(table))
    }

    /// Tables missing from the workbook or lacking a header row.
    pub fn layout_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for table in Table::ALL {
            match self.sheets.get(table.sheet_name()) {
                None => problems.push(format!("missing sheet {table}")),
                Some(sheet) if sheet.headers.is_empty() => {
                    problems.push(format!("sheet {table} has no header row"))
                }
                Some(_) => {}
            }
        }
        problems
    }
}

fn missing_sheet(table: Table) -> StoreError {
    StoreError::NotFound {
        table,
        what: "sheet",
        key: table.sheet_name().to_string(),
    }
}

impl RecordStore for MemoryWorkbook {
    fn fetch_headers(&self, table: Table) -> StoreResult<Vec<String>> {
        Ok(self.sheet(table)?.headers.clone())
    }

    fn fetch_rows(&self, table: Table) -> StoreResult<Vec<Vec<String>>> {
        let sheet = self.sheet(table)?;
        let width = sheet.headers.len();
        Ok(sheet
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.resize(width.max(row.len()), String::new());
                row
            })
            .collect())
    }

    fn read_cell(&self, table: Table, row: RowHandle, column: ColumnHandle) -> StoreResult<String> {
        let sheet = self.sheet(table)?;
        let cells = sheet.rows.get(row.0).ok_or(StoreError::OutOfBounds {
            table,
            row: row.0,
            column: column.0,
        })?;
        if column.0 >= sheet.headers.len().max(cells.len()) {
            return Err(StoreError::OutOfBounds {
                table,
                row: row.0,
                column: column.0,
            });
        }
        Ok(cells.get(column.0).cloned().unwrap_or_default())
    }

    fn write_cell(
        &mut self,
        table: Table,
        row: RowHandle,
        column: ColumnHandle,
        value: &str,
    ) -> StoreResult<()> {
        let sheet = self.sheet_mut(table)?;
        let width = sheet.headers.len();
        let out_of_bounds = StoreError::OutOfBounds {
            table,
            row: row.0,
            column: column.0,
        };
        if column.0 >= width {
            return Err(out_of_bounds);
        }
        let cells = sheet.rows.get_mut(row.0).ok_or(out_of_bounds)?;
        if cells.len() < width {
            cells.resize(width, String::new());
        }
        cells[column.0] = value.to_string();
        Ok(())
    }

    fn append_row(&mut self, table: Table, values: &[String]) -> StoreResult<()> {
        let sheet = self.sheet_mut(table)?;
        let row = fit_row(table, values, sheet.headers.len())?;
        sheet.rows.push(row);
        Ok(())
    }
}
