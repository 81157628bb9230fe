//! End-to-end runs of the simulator binary.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

const EXCHANGE: &str = r#"[
    {"kind":"axfer","asset_id":5001,"asset_amount":40},
    {"kind":"axfer","asset_id":5002,"asset_amount":40},
    {"kind":"pay","amount":900},
    {"kind":"appl","application_id":9,"application_args":["redeem_coupon"]}
]"#;

fn simulator() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_simulator"));
    command
        .env_remove("BONDSWAP_PARAMS")
        .env_remove("TMPL_OLD_BOND")
        .env_remove("TMPL_NEW_BOND")
        .env_remove("TMPL_APPLICATION_ID")
        .env_remove("TMPL_APP_MANAGER")
        .env("RUST_LOG", "off");
    command
}

fn params_file(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("bondswap-{}-{name}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{"TMPL_OLD_BOND":5001,"TMPL_NEW_BOND":"5002","TMPL_APPLICATION_ID":9}"#,
    )
    .unwrap();
    path
}

fn run_with_stdin(mut command: Command, input: &str) -> Output {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(input.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

fn report(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn evaluate_accepts_params_after_subcommand() {
    let params = params_file("after");
    let mut command = simulator();
    command.args(["evaluate", "--group", "-", "--params"]).arg(&params);

    let output = run_with_stdin(command, EXCHANGE);
    std::fs::remove_file(&params).ok();

    assert!(output.status.success());
    let report = report(&output);
    assert_eq!(report["approved"], true);
    assert_eq!(report["mode"], "exchange");
}

#[test]
fn evaluate_rejection_exits_with_failure() {
    let mut command = simulator();
    command.args(["evaluate", "--group", "-"]);

    // Default instance binds bonds 1001/1002, so 5001 is the wrong asset.
    let output = run_with_stdin(command, EXCHANGE);

    assert_eq!(output.status.code(), Some(1));
    let report = report(&output);
    assert_eq!(report["approved"], false);
    assert_eq!(report["code"], "WRONG_ASSET");
    assert_eq!(report["member"], 0);
    assert_eq!(report["field"], "asset_id");
}

#[test]
fn evaluate_empty_group_reports_size_rejection() {
    let mut command = simulator();
    command.args(["evaluate", "--group", "-"]);

    let output = run_with_stdin(command, "[]");

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(report(&output)["code"], "UNSUPPORTED_GROUP_SIZE");
}

#[test]
fn scenarios_all_pass() {
    let output = simulator().args(["scenario", "all"]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.lines().count() > 0);
    assert!(stdout.lines().all(|line| line.starts_with("PASS ")));
}

#[test]
fn identical_bonds_fail_configuration() {
    let output = simulator()
        .env("TMPL_NEW_BOND", "1001")
        .arg("template")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
