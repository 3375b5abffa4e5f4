use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn input_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write input");
    file
}

#[test]
fn clean_file() {
    let file = input_file("<span><sup>12</sup></span>");
    let mut cmd = cargo_bin_cmd!("supsub");
    cmd.arg("clean").arg(file.path());
    cmd.assert().success().stdout("<sup>12</sup>");
}

#[test]
fn paste_from_stdin() {
    let mut cmd = cargo_bin_cmd!("supsub");
    cmd.arg("paste")
        .arg("-")
        .write_stdin("<p><b>x</b><sup class=\"MsoNormal\">2</sup></p>");
    cmd.assert().success().stdout("x<sup>2</sup>");
}

#[test]
fn check_valid_input() {
    let file = input_file("x<sup>2</sup> + y<sub>i</sub>");
    let mut cmd = cargo_bin_cmd!("supsub");
    cmd.arg("check").arg(file.path());
    cmd.assert().success().stdout("ok\n");
}

#[test]
fn check_reports_violations_as_text() {
    let file = input_file("a<b>c</b>");
    let mut cmd = cargo_bin_cmd!("supsub");
    cmd.arg("check").arg(file.path());
    cmd.assert().code(1).stdout(
        predicate::str::contains("2 violation(s)").and(predicate::str::contains("disallowed tag at 1..4")),
    );
}

#[test]
fn check_reports_violations_as_json() {
    let mut cmd = cargo_bin_cmd!("supsub");
    cmd.args(["check", "-", "--format", "json"]).write_stdin("<sup>x");
    cmd.assert().code(1).stdout(
        predicate::str::contains("\"valid\": false").and(predicate::str::contains("\"kind\": \"unclosed_mark\"")),
    );
}

#[test]
fn config_file_is_layered() {
    let file = tempfile::Builder::new().suffix(".toml").tempfile().expect("temp file");
    std::fs::write(file.path(), "[editor]\ntype = \"sup\"\n\n[output]\nformat = \"json\"\n").expect("write config");

    let mut cmd = cargo_bin_cmd!("supsub");
    cmd.arg("--config").arg(file.path()).arg("config");
    cmd.assert().success().stdout(predicate::str::contains("\"type\": \"sup\""));

    let mut cmd = cargo_bin_cmd!("supsub");
    cmd.arg("--config").arg(file.path()).args(["check", "-"]).write_stdin("x");
    cmd.assert().success().stdout(predicate::str::contains("\"valid\": true"));
}

#[test]
fn missing_input_fails() {
    let mut cmd = cargo_bin_cmd!("supsub");
    cmd.arg("clean").arg("/nonexistent/answer.html");
    cmd.assert().code(2).stderr(predicate::str::contains("Cannot read"));
}
