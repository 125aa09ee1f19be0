//! Read-only report tables over the workbook.
//!
//! A report is a projection of one table onto a few columns, sorted by one
//! column and optionally filtered, rendered as left-aligned plain text.
use crate::record::{
    CandidateStatus, Table, AGE, DAYS_IN_POOL, DEPARTMENT, EMPLOYEE_NUMBER, ENTRY_DATE, EXIT_DATE,
    GENDER, MONTHLY_SALARY, NAME, NEW_DEPARTMENT, NEW_POSITION, NEW_SALARY, POSITION,
    PREVIOUS_SALARY, RETRENCHMENT_PACKAGE, SALARY_DIFFERENCE, SALARY_STATUS, STATUS, SURNAME,
    TENURE_MONTHS, TENURE_YEARS,
};
use crate::store::RecordStore;
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::cmp::Ordering;

const COLUMN_GAP: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Summary,
    PersonalDetails,
    DepartmentPosition,
    Placed,
    SalaryComparison,
    DaysInPool,
    SalaryTenure,
    Retrenched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortOrder {
    Text,
    Numeric,
}

struct ReportLayout {
    table: Table,
    /// Projected columns; empty means every column of the table.
    columns: &'static [&'static str],
    sort_by: &'static str,
    order: SortOrder,
    exited_only: bool,
    intro: &'static [&'static str],
}

impl ReportKind {
    pub const ALL: [ReportKind; 8] = [
        ReportKind::Summary,
        ReportKind::PersonalDetails,
        ReportKind::DepartmentPosition,
        ReportKind::Placed,
        ReportKind::SalaryComparison,
        ReportKind::DaysInPool,
        ReportKind::SalaryTenure,
        ReportKind::Retrenched,
    ];

    /// Menu label.
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Summary => "Redeployment Pool Summary",
            ReportKind::PersonalDetails => "Personal Details Summary",
            ReportKind::DepartmentPosition => "Department and Position",
            ReportKind::Placed => "Placed Employees",
            ReportKind::SalaryComparison => "Salary Comparison",
            ReportKind::DaysInPool => "Days within Pool",
            ReportKind::SalaryTenure => "Salary and Tenure",
            ReportKind::Retrenched => "Retrenched Employees",
        }
    }

    fn layout(&self) -> ReportLayout {
        match self {
            ReportKind::Summary => pool_layout(
                &[EMPLOYEE_NUMBER, ENTRY_DATE, STATUS],
                STATUS,
                SortOrder::Text,
                &[
                    "The below table displays the employees added to the redeployment pool.",
                    "It has been sorted according to status.",
                ],
            ),
            ReportKind::PersonalDetails => pool_layout(
                &[EMPLOYEE_NUMBER, NAME, SURNAME, AGE, GENDER],
                GENDER,
                SortOrder::Text,
                &[
                    "The below table displays the personal details of employees added to the redeployment pool.",
                    "It has been sorted according to gender.",
                ],
            ),
            ReportKind::DepartmentPosition => pool_layout(
                &[EMPLOYEE_NUMBER, DEPARTMENT, POSITION],
                DEPARTMENT,
                SortOrder::Text,
                &[
                    "The below table displays the employees departments and positions.",
                    "This is before placement.",
                ],
            ),
            ReportKind::Placed => ReportLayout {
                table: Table::PlacedEmployees,
                columns: &[EMPLOYEE_NUMBER, NEW_DEPARTMENT, NEW_POSITION],
                sort_by: NEW_DEPARTMENT,
                order: SortOrder::Text,
                exited_only: false,
                intro: &["The below table displays the employees who have been placed in new positions."],
            },
            ReportKind::SalaryComparison => ReportLayout {
                table: Table::PlacedEmployees,
                columns: &[
                    EMPLOYEE_NUMBER,
                    PREVIOUS_SALARY,
                    NEW_SALARY,
                    SALARY_DIFFERENCE,
                    SALARY_STATUS,
                ],
                sort_by: SALARY_STATUS,
                order: SortOrder::Text,
                exited_only: false,
                intro: &[
                    "The below table displays the placed employees salary comparisons.",
                    "It is sorted by Salary Status.",
                ],
            },
            ReportKind::DaysInPool => ReportLayout {
                exited_only: true,
                ..pool_layout(
                    &[EMPLOYEE_NUMBER, ENTRY_DATE, EXIT_DATE, DAYS_IN_POOL, STATUS],
                    DAYS_IN_POOL,
                    SortOrder::Numeric,
                    &["The below table displays the number of days each employee was in the redeployment pool."],
                )
            },
            ReportKind::SalaryTenure => pool_layout(
                &[EMPLOYEE_NUMBER, MONTHLY_SALARY, TENURE_YEARS, TENURE_MONTHS],
                MONTHLY_SALARY,
                SortOrder::Numeric,
                &[
                    "The below table displays the salary and tenure of the employees.",
                    "These figures are used in the retrenchment package calculation.",
                ],
            ),
            ReportKind::Retrenched => ReportLayout {
                table: Table::RetrenchedEmployees,
                columns: &[],
                sort_by: RETRENCHMENT_PACKAGE,
                order: SortOrder::Numeric,
                exited_only: false,
                intro: &[
                    "The below table displays the retrenched employees.",
                    "The retrenchment package calculation is (Salary * Tenure(years)) + (Salary * Months/12).",
                ],
            },
        }
    }
}

fn pool_layout(
    columns: &'static [&'static str],
    sort_by: &'static str,
    order: SortOrder,
    intro: &'static [&'static str],
) -> ReportLayout {
    ReportLayout {
        table: Table::RedeploymentPool,
        columns,
        sort_by,
        order,
        exited_only: false,
        intro,
    }
}

/// A rendered-ready snapshot of one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub title: &'static str,
    pub intro: Vec<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read the current store contents into `kind`'s projection.
pub fn snapshot<S: RecordStore + ?Sized>(store: &S, kind: ReportKind) -> Result<Report> {
    let layout = kind.layout();
    let table = layout.table;
    let headers = store
        .fetch_headers(table)
        .with_context(|| format!("read {table} headers"))?;
    let mut rows = store
        .fetch_rows(table)
        .with_context(|| format!("read {table} rows"))?;

    let index_of = |header: &str| -> Result<usize> {
        Ok(store.find_column(table, header)?.0)
    };

    if layout.exited_only {
        let status = index_of(STATUS)?;
        rows.retain(|row| {
            CandidateStatus::from_cell(&row[status]) != Some(CandidateStatus::Active)
        });
    }

    let sort_column = index_of(layout.sort_by)?;
    rows.sort_by(|a, b| compare_cells(&a[sort_column], &b[sort_column], layout.order));

    let projection: Vec<usize> = if layout.columns.is_empty() {
        (0..headers.len()).collect()
    } else {
        layout
            .columns
            .iter()
            .map(|header| index_of(header))
            .collect::<Result<_>>()?
    };
    let rows = rows
        .iter()
        .map(|row| projection.iter().map(|&idx| row[idx].clone()).collect())
        .collect();
    let headers = projection.iter().map(|&idx| headers[idx].clone()).collect();
    tracing::debug!(report = kind.title(), %table, "report snapshot taken");

    Ok(Report {
        title: kind.title(),
        intro: layout.intro.iter().map(|line| line.to_string()).collect(),
        headers,
        rows,
    })
}

/// Numeric columns sort by value with unparsable cells last; text sorts
/// lexically. Ties keep store order.
fn compare_cells(a: &str, b: &str, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Text => a.cmp(b),
        SortOrder::Numeric => {
            match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => a.cmp(b),
            }
        }
    }
}

/// Render as intro text followed by a column-aligned table.
pub fn render(report: &Report) -> String {
    let mut widths: Vec<usize> = report.headers.iter().map(|h| h.chars().count()).collect();
    for row in &report.rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = format!("{}\n", report.title);
    for line in &report.intro {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&render_line(&report.headers, &widths));
    for row in &report.rows {
        out.push_str(&render_line(row, &widths));
    }
    if report.rows.is_empty() {
        out.push_str("(no rows)\n");
    }
    out
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    format!("{}\n", line.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Candidate, Gender, Placement};
    use crate::store::MemoryWorkbook;
    use chrono::NaiveDate;

    fn candidate(number: &str, gender: Gender, salary: u32, days: Option<i64>) -> Candidate {
        let entry_date = NaiveDate::from_ymd_opt(2021, 7, 1).unwrap();
        Candidate {
            employee_number: number.to_string(),
            first_name: "Sam".to_string(),
            surname: "Dlamini".to_string(),
            age: 30,
            gender,
            department: "Finance".to_string(),
            position: "Clerk".to_string(),
            monthly_salary: salary,
            tenure_years: 2,
            tenure_months: 3,
            entry_date,
            exit_date: days.map(|d| entry_date + chrono::Duration::days(d)),
            days_in_pool: days,
            status: if days.is_some() {
                CandidateStatus::Placed
            } else {
                CandidateStatus::Active
            },
        }
    }

    fn book() -> MemoryWorkbook {
        let mut book = MemoryWorkbook::with_layout();
        for candidate in [
            candidate("100001", Gender::Male, 20_000, Some(100)),
            candidate("100002", Gender::Female, 9_000, None),
            candidate("100003", Gender::Unknown, 100_000, Some(9)),
        ] {
            book.append_row(Table::RedeploymentPool, &candidate.to_row())
                .unwrap();
        }
        for (number, package) in [("200001", "90000"), ("200002", "100000"), ("200003", "")] {
            book.append_row(
                Table::RetrenchedEmployees,
                &[number.to_string(), package.to_string()],
            )
            .unwrap();
        }
        book.append_row(
            Table::PlacedEmployees,
            &Placement {
                employee_number: "100001".to_string(),
                new_department: "Sales".to_string(),
                new_position: "Lead".to_string(),
                previous_salary: 20_000,
                new_salary: 21_000,
            }
            .to_row(),
        )
        .unwrap();
        book
    }

    fn first_column(report: &Report) -> Vec<&str> {
        report.rows.iter().map(|row| row[0].as_str()).collect()
    }

    #[test]
    fn days_in_pool_skips_active_and_sorts_numerically() {
        let report = snapshot(&book(), ReportKind::DaysInPool).unwrap();
        assert_eq!(
            report.headers,
            vec![EMPLOYEE_NUMBER, ENTRY_DATE, EXIT_DATE, DAYS_IN_POOL, STATUS]
        );
        assert_eq!(first_column(&report), vec!["100003", "100001"]);
        assert_eq!(report.rows[0][3], "9");
    }

    #[test]
    fn salary_and_tenure_sorts_by_value_not_text() {
        let report = snapshot(&book(), ReportKind::SalaryTenure).unwrap();
        assert_eq!(first_column(&report), vec!["100002", "100001", "100003"]);
    }

    #[test]
    fn personal_details_sort_by_gender_text() {
        let report = snapshot(&book(), ReportKind::PersonalDetails).unwrap();
        assert_eq!(report.headers.len(), 5);
        assert_eq!(first_column(&report), vec!["100002", "100001", "100003"]);
    }

    #[test]
    fn retrenched_shows_every_column_with_blanks_last() {
        let report = snapshot(&book(), ReportKind::Retrenched).unwrap();
        assert_eq!(report.headers, vec![EMPLOYEE_NUMBER, RETRENCHMENT_PACKAGE]);
        assert_eq!(first_column(&report), vec!["200001", "200002", "200003"]);
    }

    #[test]
    fn salary_comparison_projects_placement_figures() {
        let report = snapshot(&book(), ReportKind::SalaryComparison).unwrap();
        assert_eq!(
            report.rows,
            vec![vec![
                "100001".to_string(),
                "20000".to_string(),
                "21000".to_string(),
                "1000".to_string(),
                "Increased".to_string(),
            ]]
        );
    }

    #[test]
    fn render_aligns_columns() {
        let report = snapshot(&book(), ReportKind::Placed).unwrap();
        let text = render(&report);
        assert!(text.starts_with(
            "Placed Employees\nThe below table displays the employees who have been placed in new positions.\n\n"
        ));
        assert!(text.contains("Employee Number  New Department  New Position\n"));
        assert!(text.contains("100001           Sales           Lead\n"));
    }

    #[test]
    fn empty_reports_say_so() {
        let report = snapshot(&MemoryWorkbook::with_layout(), ReportKind::Summary).unwrap();
        assert!(report.rows.is_empty());
        assert!(render(&report).ends_with("(no rows)\n"));
    }
}
