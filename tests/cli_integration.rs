use serde_json::Value;
use std::process::Command;

mod support;
use support::TestWorkspace;
use support::builders;

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(assert_cmd::cargo::cargo_bin!("statement-cli"))
        .args(args)
        .output()
        .expect("run statement-cli")
}

fn parse_stdout_json(output: &std::process::Output) -> Value {
    let stdout = String::from_utf8(output.stdout.clone()).expect("stdout utf8");
    serde_json::from_str(&stdout).expect("valid json")
}

fn fixture_path(workspace: &TestWorkspace) -> String {
    workspace
        .create_workbook("bs.xlsx", |book| {
            builders::statement_workbook(book, "Balance Sheet");
        })
        .to_str()
        .expect("path utf8")
        .to_string()
}

#[test]
fn sheets_command_lists_workbook_sheets() {
    let workspace = TestWorkspace::new();
    let source = fixture_path(&workspace);

    let output = run_cli(&["sheets", &source]);
    assert!(output.status.success(), "stderr: {:?}", output.stderr);

    let payload = parse_stdout_json(&output);
    let sheets = payload["sheets"].as_array().expect("sheets array");
    assert_eq!(sheets.len(), 2);
    assert!(sheets.iter().any(|name| name == "Balance Sheet"));
    assert!(sheets.iter().any(|name| name == "Notes"));
}

#[test]
fn statement_command_emits_classified_rows_as_json() {
    let workspace = TestWorkspace::new();
    let source = fixture_path(&workspace);

    let output = run_cli(&["statement", &source, "--sheet", "Balance Sheet"]);
    assert!(output.status.success(), "stderr: {:?}", output.stderr);

    let payload = parse_stdout_json(&output);
    assert_eq!(payload["columns"][0], "31-Dec-24");
    let rows = payload["rows"].as_array().expect("rows array");
    assert_eq!(rows[0]["kind"], "section");
    assert_eq!(rows[7]["kind"], "total");
    assert!(rows[0].get("is_hidden").is_none());
}

#[test]
fn statement_command_marks_collapsed_rows() {
    let workspace = TestWorkspace::new();
    let source = fixture_path(&workspace);

    let output = run_cli(&[
        "statement",
        &source,
        "--sheet",
        "Balance Sheet",
        "--collapse",
        "1",
    ]);
    assert!(output.status.success(), "stderr: {:?}", output.stderr);

    let payload = parse_stdout_json(&output);
    let rows = payload["rows"].as_array().expect("rows array");
    assert_eq!(rows[1]["is_hidden"], true, "line item inside section 1");
    assert!(rows[3].get("is_hidden").is_none(), "subtotal stays visible");
}

#[test]
fn statement_command_renders_a_text_table() {
    let workspace = TestWorkspace::new();
    let source = fixture_path(&workspace);

    let output = run_cli(&[
        "statement",
        &source,
        "--sheet",
        "Balance Sheet",
        "--render",
        "text",
    ]);
    assert!(output.status.success(), "stderr: {:?}", output.stderr);

    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert!(stdout.contains("TOTAL ASSETS"));
    assert!(stdout.contains("1,234,567"));
    assert!(stdout.contains("(1,234)"));
}

#[test]
fn template_command_dumps_the_sheet_model() {
    let workspace = TestWorkspace::new();
    let source = fixture_path(&workspace);

    let output = run_cli(&["template", &source, "--sheet", "balance sheet"]);
    assert!(output.status.success(), "stderr: {:?}", output.stderr);

    let payload = parse_stdout_json(&output);
    assert_eq!(payload["name"], "Balance Sheet");
    assert_eq!(payload["rows"].as_array().expect("rows").len(), 11);
}

#[test]
fn missing_sheet_exits_nonzero_with_a_structured_envelope() {
    let workspace = TestWorkspace::new();
    let source = fixture_path(&workspace);

    let output = run_cli(&["statement", &source, "--sheet", "Cash Flow"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).expect("stderr utf8");
    let envelope: Value = serde_json::from_str(stderr.lines().last().expect("envelope line"))
        .expect("stderr json");
    assert_eq!(envelope["code"], "SHEET_NOT_FOUND");
    let available = envelope["available_sheets"].as_array().expect("names");
    assert!(available.iter().any(|name| name == "Balance Sheet"));
}

#[test]
fn csv_output_is_rejected_up_front() {
    let workspace = TestWorkspace::new();
    let source = fixture_path(&workspace);

    let output = run_cli(&["--format", "csv", "sheets", &source]);
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).expect("stderr utf8");
    assert!(stderr.contains("OUTPUT_FORMAT_UNSUPPORTED"));
}
