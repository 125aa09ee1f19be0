//! End-to-end tests driving the built `redeploy` binary against a scratch
//! workbook.

mod common;

use common::{stderr, stdout, Workspace};

const INTAKE: [&str; 12] = [
    "Add a new candidate",
    "654321",
    "nomsa",
    "khumalo",
    "45",
    "female",
    "finance",
    "accountant",
    "8000",
    "10",
    "3",
    "01/07/2021",
];

#[test]
fn init_creates_the_three_tables_once() {
    let ws = Workspace::create();
    let output = ws.redeploy(&["init"], &[]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Created workbook"));

    let book = ws.read_workbook();
    for sheet in ["redeployment_pool", "placed_employees", "retrenched_employees"] {
        assert!(
            book["sheets"][sheet]["headers"].is_array(),
            "missing sheet {sheet}"
        );
    }
    assert_eq!(
        book["sheets"]["redeployment_pool"]["headers"][13],
        "Status"
    );

    let again = ws.redeploy(&["init"], &[]);
    assert!(!again.status.success());
    assert!(stderr(&again).contains("--force"));

    let forced = ws.redeploy(&["init", "--force"], &[]);
    assert!(forced.status.success(), "{}", stderr(&forced));
}

#[test]
fn commands_need_an_initialized_workbook() {
    let ws = Workspace::create();
    let output = ws.redeploy(&["report", "summary"], &[]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("redeploy init"));
}

#[test]
fn intake_and_placement_show_up_in_reports() {
    let ws = Workspace::create();
    assert!(ws.redeploy(&["init"], &[]).status.success());

    let mut script: Vec<&str> = INTAKE.to_vec();
    script.extend([
        "Place a candidate",
        "654321",
        "Increase",
        "7000",
        "9000",
        "sales",
        "manager",
        "Exit the process",
    ]);
    let session = ws.redeploy(&["run"], &script);
    assert!(session.status.success(), "{}", stderr(&session));
    let text = stdout(&session);
    assert!(text.contains("Welcome to the capture screen for the Redeployment Process."));
    assert!(text.contains("Valid first name captured: Nomsa."));
    assert!(text.contains("Only a value between 8001 to 100000 is accepted, you entered 7000"));
    assert!(text.trim_end().ends_with("Thank you for your time."));

    let book = ws.read_workbook();
    let pool_row = &book["sheets"]["redeployment_pool"]["rows"][0];
    assert_eq!(pool_row[0], "654321");
    assert_eq!(pool_row[10], "01/07/2021");
    assert_eq!(pool_row[13], "Placed");
    assert_eq!(
        book["sheets"]["placed_employees"]["rows"][0],
        serde_json::json!(["654321", "Sales", "Manager", "8000", "9000", "1000", "Increased"])
    );

    let report = ws.redeploy(&["report", "days-in-pool"], &[]);
    assert!(report.status.success(), "{}", stderr(&report));
    let table = stdout(&report);
    assert!(table.contains("Days within Pool"));
    assert!(table.contains("654321"));
    assert!(table.contains("Placed"));

    let comparison = ws.redeploy(&["report", "salary-comparison"], &[]);
    assert!(stdout(&comparison).contains("Increased"));
}

#[test]
fn closed_input_ends_the_session_without_writing() {
    let ws = Workspace::create();
    assert!(ws.redeploy(&["init"], &[]).status.success());

    let session = ws.redeploy(&["run"], &INTAKE[..4]);
    assert!(session.status.success(), "{}", stderr(&session));
    assert!(stdout(&session).contains("Thank you for your time."));
    let book = ws.read_workbook();
    assert_eq!(book["sheets"]["redeployment_pool"]["rows"], serde_json::json!([]));
}

#[test]
fn retry_bound_from_config_aborts_the_operation() {
    let ws = Workspace::create();
    assert!(ws.redeploy(&["init"], &[]).status.success());

    let session = ws.redeploy(
        &["run"],
        &["Add a new candidate", "1", "2", "3", "Exit the process"],
    );
    assert!(session.status.success(), "{}", stderr(&session));
    let text = stdout(&session);
    assert!(text.contains("gave up on the employee number after 3 rejected attempts"));
    assert!(text.contains("Returning to the main menu."));
    assert!(stderr(&session).contains("operation failed"));
}
