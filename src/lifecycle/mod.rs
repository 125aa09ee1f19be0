//! Candidate lifecycle engine.
//!
//! Each entry point (intake, update, place, retrench) drives a sequence of
//! prompts to build a record or a field change and then persists it through
//! the [`RecordStore`] it was handed. The only legal status changes are
//! Active → Placed and Active → Retrenched; both go through [`PoolEngine::exit_pool`],
//! which stamps the exit date and the days spent in the pool.
use crate::prompt::Prompter;
use crate::record::{
    format_date, parse_date, CandidateStatus, Table, TransitionError, DAYS_IN_POOL, ENTRY_DATE,
    EXIT_DATE, STATUS,
};
use crate::store::{ColumnHandle, RecordStore, RowHandle};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use thiserror::Error;

pub mod calc;
mod intake;
mod place;
mod retrench;
mod update;

/// Source of "today" for exit dates.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// The local calendar date of the machine running the tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("there are no active candidates to {action}")]
    NoActiveCandidates { action: &'static str },
    #[error("cannot {action} employee {employee_number}: {source}")]
    NotActive {
        employee_number: String,
        action: &'static str,
        #[source]
        source: TransitionError,
    },
    #[error("no salary can be {direction} from the current salary of {current}")]
    NoSalaryBand {
        direction: &'static str,
        current: u32,
    },
    #[error("{column} of employee {employee_number} holds {value:?}, which is not usable")]
    BadCell {
        employee_number: String,
        column: &'static str,
        value: String,
    },
}

/// Exit stamp written when a candidate leaves the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolExit {
    pub exit_date: NaiveDate,
    pub days_in_pool: i64,
}

pub struct PoolEngine<S, R, W, C = SystemClock> {
    store: S,
    prompter: Prompter<R, W>,
    clock: C,
}

impl<S, R, W, C> PoolEngine<S, R, W, C>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
    C: Clock,
{
    pub fn new(store: S, prompter: Prompter<R, W>, clock: C) -> Self {
        Self {
            store,
            prompter,
            clock,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn prompter_mut(&mut self) -> &mut Prompter<R, W> {
        &mut self.prompter
    }

    /// Employee numbers that may still be updated, placed or retrenched.
    ///
    /// A number is excluded when its Status cell is anything but Active, or
    /// when it already appears in the placed or retrenched tables (a row
    /// whose status write was lost still counts as exited).
    pub fn active_employee_numbers(&self) -> Result<Vec<String>> {
        let mut exited = BTreeSet::new();
        for table in [Table::PlacedEmployees, Table::RetrenchedEmployees] {
            let rows = self
                .store
                .fetch_rows(table)
                .with_context(|| format!("read {table}"))?;
            exited.extend(
                rows.into_iter()
                    .filter_map(|row| row.into_iter().next())
                    .map(|number| number.trim().to_string()),
            );
        }

        let status = self
            .store
            .find_column(Table::RedeploymentPool, STATUS)
            .context("locate Status column")?;
        let rows = self
            .store
            .fetch_rows(Table::RedeploymentPool)
            .context("read redeployment pool")?;
        let active: Vec<String> = rows
            .iter()
            .filter(|row| {
                row.get(status.0)
                    .and_then(|cell| CandidateStatus::from_cell(cell))
                    == Some(CandidateStatus::Active)
            })
            .filter_map(|row| row.first().map(|number| number.trim().to_string()))
            .filter(|number| !number.is_empty() && !exited.contains(number))
            .collect();
        tracing::debug!(active = active.len(), exited = exited.len(), "active candidates listed");
        Ok(active)
    }

    /// Let the operator pick one Active candidate.
    pub(crate) fn select_active(&mut self, action: &'static str) -> Result<String> {
        let choices = self.active_employee_numbers()?;
        if choices.is_empty() {
            return Err(LifecycleError::NoActiveCandidates { action }.into());
        }
        let index = self
            .prompter
            .select("Please select the employee number", &choices)?;
        Ok(choices[index].clone())
    }

    /// Check that `employee_number` is Active and may move to `to` (Active
    /// for an in-place update), returning its row.
    pub(crate) fn require_active(
        &self,
        employee_number: &str,
        to: CandidateStatus,
        action: &'static str,
    ) -> Result<RowHandle> {
        let row = self
            .store
            .find_row(Table::RedeploymentPool, employee_number)?;
        let cell = self.pool_cell_at(row, employee_number, STATUS)?;
        let status = CandidateStatus::from_cell(&cell).ok_or_else(|| LifecycleError::BadCell {
            employee_number: employee_number.to_string(),
            column: STATUS,
            value: cell.clone(),
        })?;
        let allowed = match to {
            CandidateStatus::Active => !status.is_terminal(),
            _ => status.transition(to).is_ok(),
        };
        if !allowed {
            return Err(LifecycleError::NotActive {
                employee_number: employee_number.to_string(),
                action,
                source: TransitionError { from: status, to },
            }
            .into());
        }
        Ok(row)
    }

    /// Raw pool cell for `employee_number` under `header`.
    pub(crate) fn pool_cell(&self, employee_number: &str, header: &'static str) -> Result<String> {
        let row = self
            .store
            .find_row(Table::RedeploymentPool, employee_number)?;
        self.pool_cell_at(row, employee_number, header)
    }

    fn pool_cell_at(
        &self,
        row: RowHandle,
        employee_number: &str,
        header: &'static str,
    ) -> Result<String> {
        let column = self.store.find_column(Table::RedeploymentPool, header)?;
        let value = self
            .store
            .read_cell(Table::RedeploymentPool, row, column)
            .with_context(|| format!("read {header} of employee {employee_number}"))?;
        Ok(value)
    }

    /// Pool cell parsed as a whole number.
    pub(crate) fn pool_number(&self, employee_number: &str, header: &'static str) -> Result<u32> {
        let value = self.pool_cell(employee_number, header)?;
        value.trim().parse::<u32>().map_err(|_| {
            LifecycleError::BadCell {
                employee_number: employee_number.to_string(),
                column: header,
                value,
            }
            .into()
        })
    }

    /// Move an Active candidate to a terminal status.
    ///
    /// Exit date, days in pool and status are written in one batch.
    pub fn exit_pool(&mut self, employee_number: &str, to: CandidateStatus) -> Result<PoolExit> {
        let row = self.require_active(employee_number, to, "exit")?;
        let entry_cell = self.pool_cell_at(row, employee_number, ENTRY_DATE)?;
        let entry_date = parse_date(&entry_cell).map_err(|_| LifecycleError::BadCell {
            employee_number: employee_number.to_string(),
            column: ENTRY_DATE,
            value: entry_cell.clone(),
        })?;
        let exit_date = self.clock.today();
        let days_in_pool = calc::days_in_pool(entry_date, exit_date);
        if days_in_pool < 0 {
            tracing::warn!(
                employee_number,
                %entry_date,
                %exit_date,
                days_in_pool,
                "entry date is after the exit date"
            );
        }

        let column = |header: &str| -> Result<ColumnHandle> {
            Ok(self.store.find_column(Table::RedeploymentPool, header)?)
        };
        let cells = vec![
            (column(EXIT_DATE)?, format_date(exit_date)),
            (column(DAYS_IN_POOL)?, days_in_pool.to_string()),
            (column(STATUS)?, to.to_string()),
        ];
        self.store
            .write_cells(Table::RedeploymentPool, row, &cells)
            .with_context(|| format!("record exit of employee {employee_number}"))?;
        tracing::info!(employee_number, status = %to, days_in_pool, "candidate left the pool");
        Ok(PoolExit {
            exit_date,
            days_in_pool,
        })
    }
}

#[cfg(test)]
#[path = "flow_tests.rs"]
mod tests;
