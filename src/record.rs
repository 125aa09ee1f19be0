//! Typed pool records and the workbook layout they are persisted in.
//!
//! Header text is the join key for every lookup against the store, so the
//! header constants here are load-bearing: renaming one breaks existing
//! workbooks.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Date layout used for every date cell in the workbook.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub const EMPLOYEE_NUMBER: &str = "Employee Number";
pub const NAME: &str = "Name";
pub const SURNAME: &str = "Surname";
pub const AGE: &str = "Age";
pub const GENDER: &str = "Gender";
pub const DEPARTMENT: &str = "Department";
pub const POSITION: &str = "Position";
pub const MONTHLY_SALARY: &str = "Monthly Salary";
pub const TENURE_YEARS: &str = "Tenure -years";
pub const TENURE_MONTHS: &str = "Tenure -months";
pub const ENTRY_DATE: &str = "Entry Date";
pub const EXIT_DATE: &str = "Exit Date";
pub const DAYS_IN_POOL: &str = "Days within Pool";
pub const STATUS: &str = "Status";

pub const NEW_DEPARTMENT: &str = "New Department";
pub const NEW_POSITION: &str = "New Position";
pub const PREVIOUS_SALARY: &str = "Previous Salary";
pub const NEW_SALARY: &str = "New Salary";
pub const SALARY_DIFFERENCE: &str = "Salary Difference";
pub const SALARY_STATUS: &str = "Salary Status";

pub const RETRENCHMENT_PACKAGE: &str = "Retrenchment Package";

const POOL_HEADERS: [&str; 14] = [
    EMPLOYEE_NUMBER,
    NAME,
    SURNAME,
    AGE,
    GENDER,
    DEPARTMENT,
    POSITION,
    MONTHLY_SALARY,
    TENURE_YEARS,
    TENURE_MONTHS,
    ENTRY_DATE,
    EXIT_DATE,
    DAYS_IN_POOL,
    STATUS,
];

const PLACED_HEADERS: [&str; 7] = [
    EMPLOYEE_NUMBER,
    NEW_DEPARTMENT,
    NEW_POSITION,
    PREVIOUS_SALARY,
    NEW_SALARY,
    SALARY_DIFFERENCE,
    SALARY_STATUS,
];

const RETRENCHED_HEADERS: [&str; 2] = [EMPLOYEE_NUMBER, RETRENCHMENT_PACKAGE];

/// The three logical tables of the workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    RedeploymentPool,
    PlacedEmployees,
    RetrenchedEmployees,
}

impl Table {
    pub const ALL: [Table; 3] = [
        Table::RedeploymentPool,
        Table::PlacedEmployees,
        Table::RetrenchedEmployees,
    ];

    /// Worksheet name used by every store backend.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Table::RedeploymentPool => "redeployment_pool",
            Table::PlacedEmployees => "placed_employees",
            Table::RetrenchedEmployees => "retrenched_employees",
        }
    }

    /// Header row, in column order.
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            Table::RedeploymentPool => &POOL_HEADERS,
            Table::PlacedEmployees => &PLACED_HEADERS,
            Table::RetrenchedEmployees => &RETRENCHED_HEADERS,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a pool candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateStatus {
    Active,
    Placed,
    Retrenched,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("a candidate that is {from} cannot become {to}")]
pub struct TransitionError {
    pub from: CandidateStatus,
    pub to: CandidateStatus,
}

impl CandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Active => "Active",
            CandidateStatus::Placed => "Placed",
            CandidateStatus::Retrenched => "Retrenched",
        }
    }

    /// Parse a status cell. Blank or unknown text yields `None`.
    pub fn from_cell(cell: &str) -> Option<Self> {
        match cell.trim() {
            "Active" => Some(CandidateStatus::Active),
            "Placed" => Some(CandidateStatus::Placed),
            "Retrenched" => Some(CandidateStatus::Retrenched),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, CandidateStatus::Active)
    }

    /// Only Active → Placed and Active → Retrenched are legal.
    pub fn transition(self, to: CandidateStatus) -> Result<CandidateStatus, TransitionError> {
        match (self, to) {
            (CandidateStatus::Active, CandidateStatus::Placed)
            | (CandidateStatus::Active, CandidateStatus::Retrenched) => Ok(to),
            (from, to) => Err(TransitionError { from, to }),
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of `redeployment_pool`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub employee_number: String,
    pub first_name: String,
    pub surname: String,
    pub age: u32,
    pub gender: Gender,
    pub department: String,
    pub position: String,
    pub monthly_salary: u32,
    pub tenure_years: u32,
    pub tenure_months: u32,
    pub entry_date: NaiveDate,
    pub exit_date: Option<NaiveDate>,
    pub days_in_pool: Option<i64>,
    pub status: CandidateStatus,
}

impl Candidate {
    /// Cells in `redeployment_pool` column order; unset exit fields are blank.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.employee_number.clone(),
            self.first_name.clone(),
            self.surname.clone(),
            self.age.to_string(),
            self.gender.to_string(),
            self.department.clone(),
            self.position.clone(),
            self.monthly_salary.to_string(),
            self.tenure_years.to_string(),
            self.tenure_months.to_string(),
            format_date(self.entry_date),
            self.exit_date.map(format_date).unwrap_or_default(),
            self.days_in_pool
                .map(|days| days.to_string())
                .unwrap_or_default(),
            self.status.to_string(),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryStatus {
    Decreased,
    Equal,
    Increased,
}

impl SalaryStatus {
    pub fn from_delta(delta: i64) -> Self {
        match delta.signum() {
            -1 => SalaryStatus::Decreased,
            0 => SalaryStatus::Equal,
            _ => SalaryStatus::Increased,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SalaryStatus::Decreased => "Decreased",
            SalaryStatus::Equal => "Equal",
            SalaryStatus::Increased => "Increased",
        }
    }
}

impl fmt::Display for SalaryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of `placed_employees`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub employee_number: String,
    pub new_department: String,
    pub new_position: String,
    pub previous_salary: u32,
    pub new_salary: u32,
}

impl Placement {
    pub fn salary_delta(&self) -> i64 {
        i64::from(self.new_salary) - i64::from(self.previous_salary)
    }

    pub fn salary_status(&self) -> SalaryStatus {
        SalaryStatus::from_delta(self.salary_delta())
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.employee_number.clone(),
            self.new_department.clone(),
            self.new_position.clone(),
            self.previous_salary.to_string(),
            self.new_salary.to_string(),
            self.salary_delta().to_string(),
            self.salary_status().to_string(),
        ]
    }
}

/// One row of `retrenched_employees`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retrenchment {
    pub employee_number: String,
    pub retrenchment_package: u64,
}

impl Retrenchment {
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.employee_number.clone(),
            self.retrenchment_package.to_string(),
        ]
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(text: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_candidate() -> Candidate {
        Candidate {
            employee_number: "123456".to_string(),
            first_name: "Thandi".to_string(),
            surname: "Mokoena".to_string(),
            age: 41,
            gender: Gender::Female,
            department: "Finance".to_string(),
            position: "Clerk".to_string(),
            monthly_salary: 5000,
            tenure_years: 5,
            tenure_months: 6,
            entry_date: NaiveDate::from_ymd_opt(2021, 7, 1).unwrap(),
            exit_date: None,
            days_in_pool: None,
            status: CandidateStatus::Active,
        }
    }

    #[test]
    fn pool_row_matches_header_order() {
        let row = sample_candidate().to_row();
        assert_eq!(row.len(), Table::RedeploymentPool.headers().len());
        assert_eq!(row[0], "123456");
        assert_eq!(row[10], "01/07/2021");
        assert_eq!(row[11], "");
        assert_eq!(row[12], "");
        assert_eq!(row[13], "Active");
        assert_eq!(Table::RedeploymentPool.headers()[13], STATUS);
    }

    #[test]
    fn only_active_candidates_transition() {
        assert_eq!(
            CandidateStatus::Active.transition(CandidateStatus::Placed),
            Ok(CandidateStatus::Placed)
        );
        assert_eq!(
            CandidateStatus::Active.transition(CandidateStatus::Retrenched),
            Ok(CandidateStatus::Retrenched)
        );
        assert!(CandidateStatus::Placed
            .transition(CandidateStatus::Retrenched)
            .is_err());
        assert!(CandidateStatus::Retrenched
            .transition(CandidateStatus::Placed)
            .is_err());
        assert!(CandidateStatus::Active
            .transition(CandidateStatus::Active)
            .is_err());
    }

    #[test]
    fn status_cells_parse_strictly() {
        assert_eq!(
            CandidateStatus::from_cell(" Placed "),
            Some(CandidateStatus::Placed)
        );
        assert_eq!(CandidateStatus::from_cell(""), None);
        assert_eq!(CandidateStatus::from_cell("active"), None);
    }

    #[test]
    fn placement_row_carries_delta_and_status() {
        let placement = Placement {
            employee_number: "123456".to_string(),
            new_department: "Operations".to_string(),
            new_position: "Analyst".to_string(),
            previous_salary: 5000,
            new_salary: 4200,
        };
        assert_eq!(placement.salary_delta(), -800);
        assert_eq!(placement.salary_status(), SalaryStatus::Decreased);
        assert_eq!(placement.to_row()[5], "-800");
        assert_eq!(placement.to_row()[6], "Decreased");
    }

    #[test]
    fn dates_round_trip_through_cells() {
        let date = parse_date("01/08/2021").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 8, 1).unwrap());
        assert_eq!(format_date(date), "01/08/2021");
        assert!(parse_date("2021-08-01").is_err());
    }
}
