//! Derived values computed at lifecycle transitions, plus the numeric rules
//! every capture prompt shares.
use chrono::NaiveDate;
use std::ops::RangeInclusive;

/// A bounded whole-number field and the wording shown to the operator.
#[derive(Debug, Clone)]
pub struct NumberRule {
    pub label: &'static str,
    pub range: RangeInclusive<u32>,
    pub description: &'static str,
}

pub const AGE: NumberRule = NumberRule {
    label: "age",
    range: 18..=75,
    description: "18 to 75",
};

pub const SALARY: NumberRule = NumberRule {
    label: "salary",
    range: SALARY_MIN..=SALARY_MAX,
    description: "100 to 100 000",
};

pub const TENURE_YEARS: NumberRule = NumberRule {
    label: "years of service",
    range: 1..=50,
    description: "1 to 50",
};

pub const TENURE_MONTHS: NumberRule = NumberRule {
    label: "months of service",
    range: 1..=11,
    description: "1 to 11",
};

pub const SALARY_MIN: u32 = 100;
pub const SALARY_MAX: u32 = 100_000;

/// Direction of the salary change on placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalaryChange {
    Decrease,
    Same,
    Increase,
}

impl SalaryChange {
    pub const ALL: [SalaryChange; 3] = [
        SalaryChange::Decrease,
        SalaryChange::Same,
        SalaryChange::Increase,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SalaryChange::Decrease => "Decrease",
            SalaryChange::Same => "Remains the Same",
            SalaryChange::Increase => "Increase",
        }
    }
}

/// Allowed new salaries for a placement, or `None` when the band is empty
/// (decreasing from the floor or increasing from the ceiling).
pub fn salary_band(change: SalaryChange, current: u32) -> Option<RangeInclusive<u32>> {
    match change {
        SalaryChange::Decrease if current > SALARY_MIN => Some(SALARY_MIN..=current - 1),
        SalaryChange::Increase if current < SALARY_MAX => Some(current + 1..=SALARY_MAX),
        SalaryChange::Same => Some(current..=current),
        _ => None,
    }
}

/// `salary * years + (months / 12) * salary`, integer division on months.
pub fn retrenchment_package(monthly_salary: u32, tenure_years: u32, tenure_months: u32) -> u64 {
    let salary = u64::from(monthly_salary);
    salary * u64::from(tenure_years) + u64::from(tenure_months / 12) * salary
}

/// Whole days from `entry` to `exit`; negative when exit precedes entry.
pub fn days_in_pool(entry: NaiveDate, exit: NaiveDate) -> i64 {
    exit.signed_duration_since(entry).num_days()
}
