use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn cli(config: &NamedTempFile) -> Command {
    let mut cmd = Command::cargo_bin("setroubleshoot-config").unwrap();
    cmd.arg("--config").arg(config.path());
    cmd
}

#[test]
fn test_defaults_template() {
    let config = config_file("");
    cli(&config)
        .arg("--defaults")
        .assert()
        .success()
        .stdout(predicate::str::contains("[audit]\n"))
        .stdout(predicate::str::contains("retry_interval = 60\n"))
        .stdout(predicate::str::contains("[socket]").not())
        .stdout(predicate::str::contains("READ ONLY").not());
}

#[test]
fn test_defaults_template_with_read_only() {
    let config = config_file("");
    cli(&config)
        .args(["-d", "--show-read-only"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[socket]\n"))
        .stdout(predicate::str::contains("# READ ONLY, default = \"2048\""));
}

#[test]
fn test_no_flags_is_a_no_op() {
    let config = config_file("");
    cli(&config).assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn test_get_with_override() {
    let config = config_file("[audit]\nretry_interval = 30\n");
    cli(&config)
        .args(["--get", "audit.retry_interval"])
        .assert()
        .success()
        .stdout("30\n");

    cli(&config)
        .args(["--set", "audit.retry_interval = 90", "--get", "audit.retry_interval"])
        .assert()
        .success()
        .stdout("90\n");
}

#[test]
fn test_get_with_type() {
    let config = config_file("");
    cli(&config)
        .args(["-g", "listen_for_client.address_list", "-t", "raw"])
        .assert()
        .success()
        .stdout("{unix}%(path)s\n");

    cli(&config)
        .args(["-g", "email.smtp_host", "-t", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown type = list"));
}

#[test]
fn test_get_missing_option_fails() {
    let config = config_file("");
    cli(&config)
        .args(["--get", "audit.nothing"])
        .assert()
        .failure();
}

#[test]
fn test_malformed_override_fails() {
    let config = config_file("");
    cli(&config)
        .args(["--set", "not_a_valid_setting", "--dump"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be 'section.option=value'"))
        .stdout(predicate::str::contains("[audit] retry_interval = 60"));
}

#[test]
fn test_read_only_violation_reported() {
    let config = config_file("[general]\npkg_name = other\n");
    cli(&config)
        .args(["--get", "general.pkg_name"])
        .assert()
        .success()
        .stdout("setroubleshoot\n")
        .stderr(predicate::str::contains(
            "[general] pkg_name cannot be set in config file",
        ));
}

#[test]
fn test_dump_json() {
    let config = config_file("[custom]\nkey = value\n");
    let output = cli(&config)
        .args(["--dump", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["custom"]["key"], "value");
    assert_eq!(value["database"]["max_alerts"], "50");
}
