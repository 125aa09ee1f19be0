//! Record store adapter: a tabular store addressed by table, row and column.
//!
//! The engine only ever talks to [`RecordStore`]. Rows and columns are
//! addressed by zero-based handles over the data rows (the header row is not
//! counted); backends translate them to their own addressing.
//!
//! The store has a single writer and no concurrency control. A long session
//! can read a row, have it changed underneath by someone editing the sheet
//! directly, and then overwrite that change.
use crate::record::Table;
use std::path::PathBuf;
use thiserror::Error;

mod local;
mod memory;
mod sheets;

pub use local::LocalWorkbook;
pub use memory::MemoryWorkbook;
pub use sheets::{SheetsStore, SheetsTarget};

/// Zero-based index of a data row (header excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RowHandle(pub usize);

/// Zero-based index of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ColumnHandle(pub usize);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no {what} matching {key:?} in {table}")]
    NotFound {
        table: Table,
        what: &'static str,
        key: String,
    },
    #[error("{table} has no cell at row {row}, column {column}")]
    OutOfBounds {
        table: Table,
        row: usize,
        column: usize,
    },
    #[error("{table} has {expected} columns but the row has {got} values")]
    RowWidth {
        table: Table,
        expected: usize,
        got: usize,
    },
    #[error("workbook {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed workbook {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("spreadsheet request failed: {0}")]
    Transport(#[from] ureq::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Operations the lifecycle engine and reports need from a tabular store.
///
/// Only the primitive reads and writes are required; lookups by key and by
/// header are derived from them unless a backend has something cheaper.
pub trait RecordStore {
    /// Header row of `table`.
    fn fetch_headers(&self, table: Table) -> StoreResult<Vec<String>>;

    /// Every data row of `table`, each padded to the header width.
    fn fetch_rows(&self, table: Table) -> StoreResult<Vec<Vec<String>>>;

    fn read_cell(&self, table: Table, row: RowHandle, column: ColumnHandle) -> StoreResult<String>;

    fn write_cell(
        &mut self,
        table: Table,
        row: RowHandle,
        column: ColumnHandle,
        value: &str,
    ) -> StoreResult<()>;

    fn append_row(&mut self, table: Table, values: &[String]) -> StoreResult<()>;

    /// Write several cells of one row. Backends that can persist the batch
    /// in one step override this so a failure leaves the row untouched.
    fn write_cells(
        &mut self,
        table: Table,
        row: RowHandle,
        cells: &[(ColumnHandle, String)],
    ) -> StoreResult<()> {
        for (column, value) in cells {
            self.write_cell(table, row, *column, value)?;
        }
        Ok(())
    }

    /// All values of the column headed `column_name`, header excluded.
    fn fetch_column(&self, table: Table, column_name: &str) -> StoreResult<Vec<String>> {
        let column = self.find_column(table, column_name)?;
        Ok(self
            .fetch_rows(table)?
            .into_iter()
            .map(|mut row| {
                if column.0 < row.len() {
                    row.swap_remove(column.0)
                } else {
                    String::new()
                }
            })
            .collect())
    }

    /// Row whose key (first) column equals `key`.
    fn find_row(&self, table: Table, key: &str) -> StoreResult<RowHandle> {
        let key = key.trim();
        let row = self
            .fetch_rows(table)?
            .iter()
            .position(|row| row.first().is_some_and(|cell| cell.trim() == key))
            .ok_or_else(|| StoreError::NotFound {
                table,
                what: "row",
                key: key.to_string(),
            })?;
        tracing::debug!(%table, key, row, "row located");
        Ok(RowHandle(row))
    }

    /// Column headed exactly `header`.
    fn find_column(&self, table: Table, header: &str) -> StoreResult<ColumnHandle> {
        self.fetch_headers(table)?
            .iter()
            .position(|name| name.trim() == header)
            .map(ColumnHandle)
            .ok_or_else(|| StoreError::NotFound {
                table,
                what: "column",
                key: header.to_string(),
            })
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn fetch_headers(&self, table: Table) -> StoreResult<Vec<String>> {
        (**self).fetch_headers(table)
    }

    fn fetch_rows(&self, table: Table) -> StoreResult<Vec<Vec<String>>> {
        (**self).fetch_rows(table)
    }

    fn read_cell(&self, table: Table, row: RowHandle, column: ColumnHandle) -> StoreResult<String> {
        (**self).read_cell(table, row, column)
    }

    fn write_cell(
        &mut self,
        table: Table,
        row: RowHandle,
        column: ColumnHandle,
        value: &str,
    ) -> StoreResult<()> {
        (**self).write_cell(table, row, column, value)
    }

    fn append_row(&mut self, table: Table, values: &[String]) -> StoreResult<()> {
        (**self).append_row(table, values)
    }

    fn write_cells(
        &mut self,
        table: Table,
        row: RowHandle,
        cells: &[(ColumnHandle, String)],
    ) -> StoreResult<()> {
        (**self).write_cells(table, row, cells)
    }

    fn fetch_column(&self, table: Table, column_name: &str) -> StoreResult<Vec<String>> {
        (**self).fetch_column(table, column_name)
    }

    fn find_row(&self, table: Table, key: &str) -> StoreResult<RowHandle> {
        (**self).find_row(table, key)
    }

    fn find_column(&self, table: Table, header: &str) -> StoreResult<ColumnHandle> {
        (**self).find_column(table, header)
    }
}

/// Pad or reject `values` so it is exactly `width` cells wide.
fn fit_row(table: Table, values: &[String], width: usize) -> StoreResult<Vec<String>> {
    if values.len() > width {
        return Err(StoreError::RowWidth {
            table,
            expected: width,
            got: values.len(),
        });
    }
    let mut row = values.to_vec();
    row.resize(width, String::new());
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EMPLOYEE_NUMBER, MONTHLY_SALARY, STATUS};

    fn pool_row(number: &str, salary: &str) -> Vec<String> {
        let mut row = vec![String::new(); Table::RedeploymentPool.headers().len()];
        row[0] = number.to_string();
        row[7] = salary.to_string();
        row[13] = "Active".to_string();
        row
    }

    fn book() -> MemoryWorkbook {
        let mut book = MemoryWorkbook::with_layout();
        book.append_row(Table::RedeploymentPool, &pool_row("100001", "100000"))
            .unwrap();
        book.append_row(Table::RedeploymentPool, &pool_row("100000", "5000"))
            .unwrap();
        book
    }

    #[test]
    fn find_row_matches_key_column_only() {
        let book = book();
        // "100000" is also the first row's salary; the key column wins.
        assert_eq!(
            book.find_row(Table::RedeploymentPool, "100000").unwrap(),
            RowHandle(1)
        );
        let err = book
            .find_row(Table::RedeploymentPool, "999999")
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { what: "row", .. }));
        assert!(err.to_string().contains("999999"));
    }

    #[test]
    fn find_column_uses_header_text() {
        let book = book();
        assert_eq!(
            book.find_column(Table::RedeploymentPool, STATUS).unwrap(),
            ColumnHandle(13)
        );
        assert!(matches!(
            book.find_column(Table::RedeploymentPool, "Salary"),
            Err(StoreError::NotFound { what: "column", .. })
        ));
    }

    #[test]
    fn fetch_column_excludes_header() {
        let book = book();
        assert_eq!(
            book.fetch_column(Table::RedeploymentPool, EMPLOYEE_NUMBER)
                .unwrap(),
            vec!["100001".to_string(), "100000".to_string()]
        );
        assert_eq!(
            book.fetch_column(Table::RedeploymentPool, MONTHLY_SALARY)
                .unwrap(),
            vec!["100000".to_string(), "5000".to_string()]
        );
    }

    #[test]
    fn write_cells_updates_one_row() {
        let mut book = book();
        let row = book.find_row(Table::RedeploymentPool, "100000").unwrap();
        let status = book.find_column(Table::RedeploymentPool, STATUS).unwrap();
        book.write_cells(
            Table::RedeploymentPool,
            row,
            &[(status, "Placed".to_string())],
        )
        .unwrap();
        assert_eq!(
            book.read_cell(Table::RedeploymentPool, row, status).unwrap(),
            "Placed"
        );
        assert_eq!(
            book.read_cell(Table::RedeploymentPool, RowHandle(0), status)
                .unwrap(),
            "Active"
        );
    }

    #[test]
    fn boxed_stores_forward_calls() {
        let mut boxed: Box<dyn RecordStore> = Box::new(book());
        boxed
            .append_row(Table::RetrenchedEmployees, &["100000".to_string()])
            .unwrap();
        assert_eq!(
            boxed.fetch_rows(Table::RetrenchedEmployees).unwrap(),
            vec![vec!["100000".to_string(), String::new()]]
        );
    }

    #[test]
    fn fit_row_pads_and_rejects_overflow() {
        let row = fit_row(Table::RetrenchedEmployees, &["1".to_string()], 2).unwrap();
        assert_eq!(row, vec!["1".to_string(), String::new()]);
        assert!(matches!(
            fit_row(Table::RetrenchedEmployees, &vec![String::new(); 3], 2),
            Err(StoreError::RowWidth { got: 3, .. })
        ));
    }
}
