use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// Nothing listens on port 1; connecting fails fast without leaving the machine.
const UNREACHABLE_URL: &str = "http://127.0.0.1:1/contact";

fn mailscrape(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mailscrape").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_sources_and_formats() {
    let dir = TempDir::new().unwrap();
    mailscrape(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--list"))
        .stdout(predicate::str::contains("--export"))
        .stdout(predicate::str::contains("xml"));
}

#[test]
fn test_no_arguments_prints_usage() {
    let dir = TempDir::new().unwrap();
    mailscrape(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_url_and_list_are_exclusive() {
    let dir = TempDir::new().unwrap();
    mailscrape(&dir)
        .args(["https://example.com", "--list", "urls.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_generate_config() {
    let dir = TempDir::new().unwrap();
    mailscrape(&dir)
        .args(["--generate-config", "--config", "custom.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));

    let content = fs::read_to_string(dir.path().join("custom.toml")).unwrap();
    assert!(content.contains("[fetch]"));
    assert!(content.contains("timeout_secs = 30"));
}

#[test]
fn test_invalid_config_exits_with_config_code() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("mailscrape.toml"),
        "[fetch]\nconcurrency = 0\n",
    )
    .unwrap();

    mailscrape(&dir)
        .args(["https://example.com", "--dry-run"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("Concurrency"));
}

#[test]
fn test_dry_run_lists_urls_without_fetching() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("urls.csv"),
        "https://one.example/contact,first\n\nhttps://two.example/\n",
    )
    .unwrap();

    mailscrape(&dir)
        .args(["--list", "urls.csv", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pages to fetch: 2"))
        .stdout(predicate::str::contains("https://two.example/"));
}

#[test]
fn test_json_dry_run_is_machine_readable() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("urls.csv"),
        "https://one.example/contact,\"Acme\nInc\"\nhttps://two.example/\n",
    )
    .unwrap();

    let output = mailscrape(&dir)
        .args(["--list", "urls.csv", "--dry-run", "--output-format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let values: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap_or_else(|e| panic!("{:?}: {}", line, e)))
        .collect();

    let plans: Vec<&serde_json::Value> =
        values.iter().filter(|value| value["type"] == "plan").collect();
    assert_eq!(plans.len(), 1);
    assert_eq!(
        plans[0]["urls"],
        serde_json::json!(["https://one.example/contact", "https://two.example/"])
    );
}

#[test]
fn test_missing_list_file() {
    let dir = TempDir::new().unwrap();
    mailscrape(&dir)
        .args(["--list", "missing.csv"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("missing.csv"));
}

#[test]
fn test_unreachable_url_reports_no_emails() {
    let dir = TempDir::new().unwrap();
    mailscrape(&dir)
        .args([UNREACHABLE_URL, "--timeout", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No emails found."));
}

#[test]
fn test_plain_output_is_empty_without_matches() {
    let dir = TempDir::new().unwrap();
    mailscrape(&dir)
        .args([UNREACHABLE_URL, "--timeout", "5", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_export_without_emails_fails() {
    let dir = TempDir::new().unwrap();
    mailscrape(&dir)
        .args([UNREACHABLE_URL, "--timeout", "5", "--export", "out.csv"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("No emails to export"));

    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn test_json_output_for_failed_batch() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("urls.csv"),
        format!("{}\n{}\n", UNREACHABLE_URL, UNREACHABLE_URL),
    )
    .unwrap();

    let output = mailscrape(&dir)
        .args(["--list", "urls.csv", "--timeout", "5", "--output-format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let result: serde_json::Value = stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|value| value["type"] == "result")
        .expect("result object on stdout");

    assert_eq!(result["emails"], serde_json::json!([]));
    assert_eq!(result["failed"].as_array().unwrap().len(), 2);
    assert_eq!(result["cancelled"], false);
}
