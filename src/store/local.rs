//! Workbook persisted as a JSON file on local disk.
//!
//! Every mutation is applied to a copy of the in-memory workbook, written to
//! a temp file beside the target and renamed over it. A failed save leaves
//! both the file and the in-memory state as they were.
use super::{ColumnHandle, MemoryWorkbook, RecordStore, RowHandle, StoreError, StoreResult};
use crate::record::Table;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct LocalWorkbook {
    path: PathBuf,
    book: MemoryWorkbook,
}

impl LocalWorkbook {
    /// Open an existing workbook file.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let bytes = fs::read(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let book: MemoryWorkbook =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        for problem in book.layout_problems() {
            tracing::warn!(path = %path.display(), %problem, "workbook layout problem");
        }
        Ok(Self {
            path: path.to_path_buf(),
            book,
        })
    }

    /// Write a fresh workbook with empty tables to `path`.
    pub fn create(path: &Path) -> StoreResult<Self> {
        let workbook = Self {
            path: path.to_path_buf(),
            book: MemoryWorkbook::with_layout(),
        };
        save(&workbook.path, &workbook.book)?;
        tracing::info!(path = %path.display(), "workbook created");
        Ok(workbook)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mutate(
        &mut self,
        change: impl FnOnce(&mut MemoryWorkbook) -> StoreResult<()>,
    ) -> StoreResult<()> {
        let mut next = self.book.clone();
        change(&mut next)?;
        save(&self.path, &next)?;
        self.book = next;
        Ok(())
    }
}

fn save(path: &Path, book: &MemoryWorkbook) -> StoreResult<()> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_err)?;
    let bytes = serde_json::to_vec_pretty(book).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    staged.write_all(&bytes).map_err(io_err)?;
    staged.as_file().sync_all().map_err(io_err)?;
    staged.persist(path).map_err(|err| io_err(err.error))?;
    Ok(())
}

impl RecordStore for LocalWorkbook {
    fn fetch_headers(&self, table: Table) -> StoreResult<Vec<String>> {
        self.book.fetch_headers(table)
    }

    fn fetch_rows(&self, table: Table) -> StoreResult<Vec<Vec<String>>> {
        self.book.fetch_rows(table)
    }

    fn read_cell(&self, table: Table, row: RowHandle, column: ColumnHandle) -> StoreResult<String> {
        self.book.read_cell(table, row, column)
    }

    fn write_cell(
        &mut self,
        table: Table,
        row: RowHandle,
        column: ColumnHandle,
        value: &str,
    ) -> StoreResult<()> {
        self.mutate(|book| book.write_cell(table, row, column, value))?;
        tracing::info!(%table, row = row.0, column = column.0, value, "cell written");
        Ok(())
    }

    fn write_cells(
        &mut self,
        table: Table,
        row: RowHandle,
        cells: &[(ColumnHandle, String)],
    ) -> StoreResult<()> {
        self.mutate(|book| book.write_cells(table, row, cells))?;
        tracing::info!(%table, row = row.0, cells = cells.len(), "cells written");
        Ok(())
    }

    fn append_row(&mut self, table: Table, values: &[String]) -> StoreResult<()> {
        self.mutate(|book| book.append_row(table, values))?;
        tracing::info!(%table, key = ?values.first(), "row appended");
        Ok(())
    }
}
