//! Interactive main menu and report browser.
//!
//! Operation failures are reported to the operator and logged, and control
//! returns to the menu. Closed input ends the session as if Exit was chosen.
use crate::lifecycle::{Clock, PoolEngine};
use crate::prompt::is_input_closed;
use crate::report::{self, ReportKind};
use crate::store::RecordStore;
use anyhow::Result;
use std::io::{BufRead, Write};

const WELCOME: &str = "Welcome to the capture screen for the Redeployment Process.\n";
const FAREWELL: &str = "Thank you for your time.";
const RETURN_TO_MAIN: &str = "Return to Main Menu";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Add,
    Update,
    Place,
    Retrench,
    Reports,
    Exit,
}

impl MenuAction {
    const ALL: [MenuAction; 6] = [
        MenuAction::Add,
        MenuAction::Update,
        MenuAction::Place,
        MenuAction::Retrench,
        MenuAction::Reports,
        MenuAction::Exit,
    ];

    fn label(&self) -> &'static str {
        match self {
            MenuAction::Add => "Add a new candidate",
            MenuAction::Update => "Update candidate details",
            MenuAction::Place => "Place a candidate",
            MenuAction::Retrench => "Retrench a candidate",
            MenuAction::Reports => "Data Tables",
            MenuAction::Exit => "Exit the process",
        }
    }
}

/// Run the menu loop until the operator exits or input closes.
pub fn run<S, R, W, C>(engine: &mut PoolEngine<S, R, W, C>) -> Result<()>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
    C: Clock,
{
    engine.prompter_mut().say(format!("  \n{WELCOME}"))?;
    let labels: Vec<String> = MenuAction::ALL
        .iter()
        .map(|action| action.label().to_string())
        .collect();
    loop {
        let action = match engine
            .prompter_mut()
            .select("Please select an action", &labels)
        {
            Ok(index) => MenuAction::ALL[index],
            Err(err) if is_input_closed(&err) => {
                tracing::debug!("input closed at the main menu");
                break;
            }
            Err(err) => return Err(err),
        };
        let outcome = match action {
            MenuAction::Add => engine.intake().map(|_| ()),
            MenuAction::Update => engine.update().map(|_| ()),
            MenuAction::Place => engine.place().map(|_| ()),
            MenuAction::Retrench => engine.retrench().map(|_| ()),
            MenuAction::Reports => browse_reports(engine),
            MenuAction::Exit => break,
        };
        if let Err(err) = outcome {
            if is_input_closed(&err) {
                tracing::warn!(action = action.label(), "input closed mid-operation");
                break;
            }
            tracing::warn!(action = action.label(), error = %format!("{err:#}"), "operation failed");
            engine.prompter_mut().say(format!(
                "The operation could not be completed: {err:#}\nReturning to the main menu.\n"
            ))?;
        }
    }
    engine.prompter_mut().say(FAREWELL)?;
    Ok(())
}

/// Show reports until the operator returns to the main menu.
fn browse_reports<S, R, W, C>(engine: &mut PoolEngine<S, R, W, C>) -> Result<()>
where
    S: RecordStore,
    R: BufRead,
    W: Write,
    C: Clock,
{
    let mut labels: Vec<String> = ReportKind::ALL
        .iter()
        .map(|kind| kind.title().to_string())
        .collect();
    labels.push(RETURN_TO_MAIN.to_string());
    loop {
        let index = engine
            .prompter_mut()
            .select("Please select the table you wish to view", &labels)?;
        let Some(kind) = ReportKind::ALL.get(index).copied() else {
            return Ok(());
        };
        let text = report::render(&report::snapshot(engine.store(), kind)?);
        engine.prompter_mut().say(format!("{text}  \n"))?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Prompter;
    use crate::record::Table;
    use crate::store::MemoryWorkbook;
    use chrono::NaiveDate;
    use std::io::Cursor;

    struct FixedClock;

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(2021, 8, 1).unwrap()
        }
    }

    fn session(input: &[&str]) -> (String, MemoryWorkbook) {
        let input = Cursor::new(input.join("\n").into_bytes());
        let prompter = Prompter::new(input, Vec::<u8>::new());
        let mut engine = PoolEngine::new(MemoryWorkbook::with_layout(), prompter, FixedClock);
        run(&mut engine).unwrap();
        let text = String::from_utf8_lossy(engine.prompter_mut().output()).to_string();
        (text, engine.store().clone())
    }

    #[test]
    fn add_then_view_then_exit() {
        let (text, book) = session(&[
            "Add a new candidate",
            "123456",
            "ayanda",
            "nkosi",
            "30",
            "male",
            "logistics",
            "driver",
            "8000",
            "3",
            "4",
            "01/07/2021",
            "Data Tables",
            "Salary and Tenure",
            "Return to Main Menu",
            "Exit the process",
        ]);
        assert!(text.contains(WELCOME));
        assert_eq!(book.fetch_rows(Table::RedeploymentPool).unwrap().len(), 1);
        assert!(text.contains("Employee Number  Monthly Salary  Tenure -years  Tenure -months"));
        assert!(text.trim_end().ends_with(FAREWELL));
    }

    #[test]
    fn failed_operations_return_to_the_menu() {
        let (text, _) = session(&["4", "3", "6"]);
        assert_eq!(text.matches("there are no active candidates to").count(), 2);
        assert_eq!(text.matches("Returning to the main menu.").count(), 2);
        assert!(text.trim_end().ends_with(FAREWELL));
    }

    #[test]
    fn closed_input_exits_cleanly() {
        let (text, book) = session(&["1", "123456"]);
        assert!(text.trim_end().ends_with(FAREWELL));
        assert!(book.fetch_rows(Table::RedeploymentPool).unwrap().is_empty());
    }
}
