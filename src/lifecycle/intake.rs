use super::calc::{self, NumberRule};
use super::{Clock, PoolEngine};
use crate::prompt::{Prompter, Request};
use crate::record::{Candidate, CandidateStatus, Gender, Table, EMPLOYEE_NUMBER};
use crate::store::RecordStore;
use crate::validate;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::{BufRead, Write};

impl<S, R, W, C> PoolEngine<S, R, W, C>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
    C: Clock,
{
    /// Capture a new candidate and append it to the pool as Active.
    pub fn intake(&mut self) -> Result<Candidate> {
        self.prompter
            .say("Please proceed to add a new employee.\n")?;
        let employee_number = self.capture_employee_number()?;
        let first_name = capture_text(&mut self.prompter, "first name")?;
        let surname = capture_text(&mut self.prompter, "surname")?;
        let age = capture_number(&mut self.prompter, &calc::AGE)?;
        let gender = capture_gender(&mut self.prompter)?;
        let department = capture_text(&mut self.prompter, "department")?;
        let position = capture_text(&mut self.prompter, "position")?;
        let monthly_salary = capture_number(&mut self.prompter, &calc::SALARY)?;
        let tenure_years = capture_number(&mut self.prompter, &calc::TENURE_YEARS)?;
        let tenure_months = capture_number(&mut self.prompter, &calc::TENURE_MONTHS)?;
        let entry_date = capture_entry_date(&mut self.prompter)?;

        let candidate = Candidate {
            employee_number,
            first_name,
            surname,
            age,
            gender,
            department,
            position,
            monthly_salary,
            tenure_years,
            tenure_months,
            entry_date,
            exit_date: None,
            days_in_pool: None,
            status: CandidateStatus::Active,
        };
        self.store
            .append_row(Table::RedeploymentPool, &candidate.to_row())
            .with_context(|| format!("add employee {}", candidate.employee_number))?;
        tracing::info!(
            employee_number = %candidate.employee_number,
            entry_date = %candidate.entry_date,
            "candidate added to the pool"
        );
        self.prompter.say(format!(
            "Employee {} has been added to the redeployment pool.\n",
            candidate.employee_number
        ))?;
        Ok(candidate)
    }

    /// Six digits, unique against a fresh read of the pool on every attempt.
    fn capture_employee_number(&mut self) -> Result<String> {
        let request = Request::new("employee number")
            .line("Please enter a six digit employee number.")
            .line("The number should not contain any letters or special characters.")
            .line("The number should be a unique value.")
            .line("Example: 123456\n");
        let store = &self.store;
        self.prompter.ask_with(&request, |raw| {
            let existing = store
                .fetch_column(Table::RedeploymentPool, EMPLOYEE_NUMBER)
                .context("read existing employee numbers")?;
            Ok(validate::employee_number(raw, &existing))
        })
    }
}

pub(super) fn capture_text<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    label: &str,
) -> Result<String> {
    let request = Request::new(label)
        .line(format!("Please enter the {label} of the employee."))
        .line("You cannot enter a number.\n");
    prompter.ask(&request, validate::text)
}

pub(super) fn capture_number<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    rule: &NumberRule,
) -> Result<u32> {
    let request = Request::new(rule.label)
        .line(format!("Please enter the {} of the employee.", rule.label))
        .line(format!(
            "The {} should be between the range {}.\n",
            rule.label, rule.description
        ));
    prompter.ask(&request, |raw| {
        validate::in_range(raw, &rule.range, rule.description)
    })
}

pub(super) fn capture_gender<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<Gender> {
    let choices: Vec<String> = Gender::ALL.iter().map(|g| g.to_string()).collect();
    let index = prompter.select("Please select the employee's gender", &choices)?;
    Ok(Gender::ALL[index])
}

pub(super) fn capture_entry_date<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<NaiveDate> {
    let request = Request::new("start date")
        .line("Please enter the date of entry / start date")
        .line("of the redeployment process for the employee.")
        .line("Please enter in the format DD/MM/YYYY.")
        .line("Example: 01/07/2021.\n");
    prompter.ask(&request, validate::date)
}
