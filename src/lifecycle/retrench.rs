use super::calc;
use super::{Clock, PoolEngine};
use crate::record::{
    format_date, CandidateStatus, Retrenchment, Table, MONTHLY_SALARY, TENURE_MONTHS, TENURE_YEARS,
};
use crate::store::RecordStore;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

impl<S, R, W, C> PoolEngine<S, R, W, C>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
    C: Clock,
{
    /// Retrench an Active candidate, recording their package.
    pub fn retrench(&mut self) -> Result<Retrenchment> {
        self.prompter
            .say("You have chosen to retrench an employee.")?;
        let employee_number = self.select_active("retrench")?;
        self.require_active(&employee_number, CandidateStatus::Retrenched, "retrench")?;

        self.prompter.say("Calculating retrenchment package...\n")?;
        let salary = self.pool_number(&employee_number, MONTHLY_SALARY)?;
        let years = self.pool_number(&employee_number, TENURE_YEARS)?;
        let months = self.pool_number(&employee_number, TENURE_MONTHS)?;
        let retrenchment = Retrenchment {
            retrenchment_package: calc::retrenchment_package(salary, years, months),
            employee_number,
        };
        self.prompter.say(format!(
            "Retrenchment package calculated as {}.\n",
            retrenchment.retrenchment_package
        ))?;

        self.store
            .append_row(Table::RetrenchedEmployees, &retrenchment.to_row())
            .with_context(|| format!("record retrenchment of {}", retrenchment.employee_number))?;
        let exit = self.exit_pool(&retrenchment.employee_number, CandidateStatus::Retrenched)?;
        tracing::info!(
            employee_number = %retrenchment.employee_number,
            package = retrenchment.retrenchment_package,
            "candidate retrenched"
        );
        self.prompter.say(format!(
            "Employee {} left the pool on {} after {} days.\n",
            retrenchment.employee_number,
            format_date(exit.exit_date),
            exit.days_in_pool
        ))?;
        Ok(retrenchment)
    }
}
