use super::calc::{self, SalaryChange};
use super::intake::capture_text;
use super::{Clock, LifecycleError, PoolEngine};
use crate::prompt::Request;
use crate::record::{format_date, CandidateStatus, Placement, Table, MONTHLY_SALARY};
use crate::store::RecordStore;
use crate::validate;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

impl<S, R, W, C> PoolEngine<S, R, W, C>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
    C: Clock,
{
    /// Place an Active candidate into a new role and close their pool entry.
    pub fn place(&mut self) -> Result<Placement> {
        self.prompter.say("You have chosen to place an employee.")?;
        let employee_number = self.select_active("place")?;
        self.require_active(&employee_number, CandidateStatus::Placed, "place")?;
        let previous_salary = self.pool_number(&employee_number, MONTHLY_SALARY)?;
        let new_salary = self.capture_new_salary(previous_salary)?;

        self.prompter
            .say("Please enter the New Department in which the employee has been placed.")?;
        let new_department = capture_text(&mut self.prompter, "department")?;
        self.prompter
            .say(format!("The New Department has been set as {new_department}.\n"))?;
        self.prompter
            .say("Please enter the New Position in which the employee has been placed.")?;
        let new_position = capture_text(&mut self.prompter, "position")?;
        self.prompter
            .say(format!("The New Position has been set as {new_position}.\n"))?;

        let placement = Placement {
            employee_number,
            new_department,
            new_position,
            previous_salary,
            new_salary,
        };
        self.store
            .append_row(Table::PlacedEmployees, &placement.to_row())
            .with_context(|| format!("record placement of {}", placement.employee_number))?;
        let exit = self.exit_pool(&placement.employee_number, CandidateStatus::Placed)?;
        tracing::info!(
            employee_number = %placement.employee_number,
            salary_delta = placement.salary_delta(),
            salary_status = %placement.salary_status(),
            "candidate placed"
        );
        self.prompter.say(format!(
            "Thank you for capturing the placement. Employee {} left the pool on {} after {} days.\n",
            placement.employee_number,
            format_date(exit.exit_date),
            exit.days_in_pool
        ))?;
        Ok(placement)
    }

    /// Ask for the salary direction, then a salary inside its band.
    ///
    /// A direction with no room (decrease from the floor, increase from the
    /// ceiling) is reported and the direction is asked again.
    fn capture_new_salary(&mut self, current: u32) -> Result<u32> {
        self.prompter
            .say("Has there been a change in monthly salary?\n")?;
        let choices: Vec<String> = SalaryChange::ALL
            .iter()
            .map(|change| change.label().to_string())
            .collect();
        loop {
            let index = self
                .prompter
                .select("Please select the relevant option", &choices)?;
            let change = SalaryChange::ALL[index];
            if change == SalaryChange::Same {
                self.prompter.say(format!(
                    "The current employee salary is: {current}. This will remain the same.\n"
                ))?;
                return Ok(current);
            }
            let direction = match change {
                SalaryChange::Decrease => "decreased",
                _ => "increased",
            };
            let Some(band) = calc::salary_band(change, current) else {
                let err = LifecycleError::NoSalaryBand { direction, current };
                tracing::warn!(%err, "salary direction rejected");
                self.prompter.say(format!("{err}. Please choose again.\n"))?;
                continue;
            };
            let description = format!("{} to {}", band.start(), band.end());
            let request = Request::new("salary")
                .line(format!(
                    "The current employee salary is: {current}. Please capture the new {direction} salary."
                ))
                .line(format!("The salary should be between the range {description}.\n"));
            let paid = self
                .prompter
                .ask(&request, |raw| validate::in_range(raw, &band, &description))?;
            self.prompter
                .say(format!("The new salary has been captured as {paid}."))?;
            return Ok(paid);
        }
    }
}
