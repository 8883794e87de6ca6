use std::fs;
use std::process::Command;

const MANIFEST: &str = r#"{
  "mountpath": "/blog/",
  "actions": [
    { "name": "home", "route": "/", "page": "home" },
    { "route": "/post/:id", "page": "post", "driver": "POST_LOADED" },
    { "driver": "SESSION", "initial": true }
  ],
  "error": { "page": "oops" }
}"#;

fn write_manifest(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.json");
    fs::write(&path, content).unwrap();
    (dir, path)
}

fn waypost() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_waypost"));
    cmd.env_remove("WAYPOST_MOUNTPATH")
        .env_remove("WAYPOST_STRICT")
        .env_remove("WAYPOST_CASE_SENSITIVE")
        .env("WAYPOST_LOG_LEVEL", "error");
    cmd
}

#[test]
fn test_cli_routes_prints_table() {
    let (_dir, manifest) = write_manifest(MANIFEST);
    let output = waypost()
        .arg("routes")
        .arg("--manifest")
        .arg(&manifest)
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "mountpath: /blog");
    assert!(lines[1].starts_with("/blog/ "));
    assert!(lines[2].starts_with("/blog/post/:id"));
    assert!(lines[3].starts_with("/blog/error"));
}

#[test]
fn test_cli_resolve_match() {
    let (_dir, manifest) = write_manifest(MANIFEST);
    let output = waypost()
        .args(["resolve", "--manifest"])
        .arg(&manifest)
        .arg("/blog/post/42")
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("route: /blog/post/:id"));
    assert!(stdout.contains("page: post"));
    assert!(stdout.contains("param id = 42"));
}

#[test]
fn test_cli_resolve_no_match_exits_2() {
    let (_dir, manifest) = write_manifest(MANIFEST);
    let output = waypost()
        .args(["resolve", "--manifest"])
        .arg(&manifest)
        .arg("/elsewhere")
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(2));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("route: /blog/error"));
    assert!(stdout.contains("fallback: 404"));
}

#[test]
fn test_cli_reports_configuration_errors() {
    let (_dir, manifest) = write_manifest(r#"{ "actions": [null], "error": { "page": "oops" } }"#);
    let output = waypost()
        .arg("routes")
        .arg("--manifest")
        .arg(&manifest)
        .output()
        .expect("run cli");
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("action config #0 is null"));
}

#[test]
fn test_cli_missing_manifest_fails() {
    let output = waypost()
        .args(["routes", "--manifest", "/definitely/not/here.yaml"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("failed to read manifest"));
}
