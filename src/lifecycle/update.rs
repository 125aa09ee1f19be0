//! In-place edits of an Active candidate, one field at a time.
use super::calc;
use super::intake::{capture_entry_date, capture_gender, capture_number, capture_text};
use super::{Clock, PoolEngine};
use crate::prompt::Prompter;
use crate::record::{
    format_date, CandidateStatus, Gender, Table, AGE, DEPARTMENT, ENTRY_DATE, GENDER,
    MONTHLY_SALARY, NAME, POSITION, SURNAME, TENURE_MONTHS, TENURE_YEARS,
};
use crate::store::RecordStore;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::{BufRead, Write};

/// Pool columns the operator may edit. The employee number and the exit
/// columns are never editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Surname,
    Age,
    Gender,
    Department,
    Position,
    MonthlySalary,
    TenureYears,
    TenureMonths,
    EntryDate,
}

/// A captured, validated value for one [`Field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Name(String),
    Surname(String),
    Age(u32),
    Gender(Gender),
    Department(String),
    Position(String),
    MonthlySalary(u32),
    TenureYears(u32),
    TenureMonths(u32),
    EntryDate(NaiveDate),
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Name,
        Field::Surname,
        Field::Age,
        Field::Gender,
        Field::Department,
        Field::Position,
        Field::MonthlySalary,
        Field::TenureYears,
        Field::TenureMonths,
        Field::EntryDate,
    ];

    /// Pool header the field is stored under.
    pub fn header(&self) -> &'static str {
        match self {
            Field::Name => NAME,
            Field::Surname => SURNAME,
            Field::Age => AGE,
            Field::Gender => GENDER,
            Field::Department => DEPARTMENT,
            Field::Position => POSITION,
            Field::MonthlySalary => MONTHLY_SALARY,
            Field::TenureYears => TENURE_YEARS,
            Field::TenureMonths => TENURE_MONTHS,
            Field::EntryDate => ENTRY_DATE,
        }
    }

    /// Run the one prompt that captures this field.
    pub fn capture<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<FieldUpdate> {
        Ok(match self {
            Field::Name => FieldUpdate::Name(capture_text(prompter, "first name")?),
            Field::Surname => FieldUpdate::Surname(capture_text(prompter, "surname")?),
            Field::Age => FieldUpdate::Age(capture_number(prompter, &calc::AGE)?),
            Field::Gender => FieldUpdate::Gender(capture_gender(prompter)?),
            Field::Department => FieldUpdate::Department(capture_text(prompter, "department")?),
            Field::Position => FieldUpdate::Position(capture_text(prompter, "position")?),
            Field::MonthlySalary => {
                FieldUpdate::MonthlySalary(capture_number(prompter, &calc::SALARY)?)
            }
            Field::TenureYears => {
                FieldUpdate::TenureYears(capture_number(prompter, &calc::TENURE_YEARS)?)
            }
            Field::TenureMonths => {
                FieldUpdate::TenureMonths(capture_number(prompter, &calc::TENURE_MONTHS)?)
            }
            Field::EntryDate => FieldUpdate::EntryDate(capture_entry_date(prompter)?),
        })
    }
}

impl FieldUpdate {
    pub fn field(&self) -> Field {
        match self {
            FieldUpdate::Name(_) => Field::Name,
            FieldUpdate::Surname(_) => Field::Surname,
            FieldUpdate::Age(_) => Field::Age,
            FieldUpdate::Gender(_) => Field::Gender,
            FieldUpdate::Department(_) => Field::Department,
            FieldUpdate::Position(_) => Field::Position,
            FieldUpdate::MonthlySalary(_) => Field::MonthlySalary,
            FieldUpdate::TenureYears(_) => Field::TenureYears,
            FieldUpdate::TenureMonths(_) => Field::TenureMonths,
            FieldUpdate::EntryDate(_) => Field::EntryDate,
        }
    }

    /// Cell text written to the store.
    pub fn cell_value(&self) -> String {
        match self {
            FieldUpdate::Name(text)
            | FieldUpdate::Surname(text)
            | FieldUpdate::Department(text)
            | FieldUpdate::Position(text) => text.clone(),
            FieldUpdate::Age(n)
            | FieldUpdate::MonthlySalary(n)
            | FieldUpdate::TenureYears(n)
            | FieldUpdate::TenureMonths(n) => n.to_string(),
            FieldUpdate::Gender(gender) => gender.to_string(),
            FieldUpdate::EntryDate(date) => format_date(*date),
        }
    }
}

impl<S, R, W, C> PoolEngine<S, R, W, C>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
    C: Clock,
{
    /// Edit Active candidates until the operator declines to continue.
    pub fn update(&mut self) -> Result<Vec<(String, FieldUpdate)>> {
        self.prompter
            .say("You have chosen to update an employee's details.\n")?;
        let mut applied = Vec::new();
        loop {
            let employee_number = self.select_active("update")?;
            let labels: Vec<String> = Field::ALL.iter().map(|f| f.header().to_string()).collect();
            let index = self
                .prompter
                .select("Please select the option to update", &labels)?;
            let update = Field::ALL[index].capture(&mut self.prompter)?;
            self.apply_update(&employee_number, &update)?;
            applied.push((employee_number, update));
            if !self
                .prompter
                .confirm("Would you like to return to the update menu?")?
            {
                break;
            }
        }
        Ok(applied)
    }

    /// Write one field change to the candidate's row.
    pub fn apply_update(&mut self, employee_number: &str, update: &FieldUpdate) -> Result<()> {
        let row = self.require_active(employee_number, CandidateStatus::Active, "update")?;
        let header = update.field().header();
        let column = self.store.find_column(Table::RedeploymentPool, header)?;
        let value = update.cell_value();
        self.store
            .write_cell(Table::RedeploymentPool, row, column, &value)
            .with_context(|| format!("update {header} of employee {employee_number}"))?;
        tracing::info!(employee_number, field = header, value = %value, "candidate updated");
        self.prompter.say(format!(
            "{header} of employee {employee_number} updated to {value}.\n"
        ))?;
        Ok(())
    }
}
