//! Integration tests for the `shop` CLI.
//!
//! Each test points the config and data directories at a temp dir, runs
//! `shop` as a subprocess, and checks stdout and/or the stored record.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Get the path to the built `shop` binary.
fn shop_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("shop");
    path
}

fn command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(shop_bin());
    cmd.args(args)
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env("XDG_DATA_HOME", dir.join("data"))
        .env_remove("SHOPLIST_LOG");
    cmd
}

/// Run `shop` with the given args, returning (stdout, stderr, success).
fn run_shop(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = command(dir, args).output().expect("failed to run shop");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `shop` expecting success, return stdout.
fn run_shop_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_shop(dir, args);
    if !success {
        panic!(
            "shop {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `shop` with `input` piped to stdin, returning (stdout, stderr, success).
fn run_shop_with_stdin(dir: &Path, args: &[&str], input: &str) -> (String, String, bool) {
    let mut child = command(dir, args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run shop");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn record_path(dir: &Path, namespace: &str) -> PathBuf {
    dir.join("data")
        .join("shoplist")
        .join(format!("{}-shoppingList.json", namespace))
}

fn read_record(dir: &Path) -> serde_json::Value {
    let raw = fs::read_to_string(record_path(dir, "myShoppingListApp")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_list_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_shop_ok(tmp.path(), &["list"]);
    assert_eq!(out, "(no items)\n");
}

#[test]
fn test_record_absent() {
    let tmp = tempfile::TempDir::new().unwrap();
    assert_eq!(run_shop_ok(tmp.path(), &["record"]), "(no record)\n");
    assert_eq!(run_shop_ok(tmp.path(), &["--json", "record"]), "null\n");
}

#[test]
fn test_list_numbered_and_filtered() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_shop_ok(tmp.path(), &["add", "Almond", "Milk"]);
    run_shop_ok(tmp.path(), &["add", "bread"]);
    run_shop_ok(tmp.path(), &["add", "oat milk"]);

    let out = run_shop_ok(tmp.path(), &["list"]);
    assert_eq!(out, "  1  almond milk\n  2  bread\n  3  oat milk\n");

    // Positions stay those of the full list
    let out = run_shop_ok(tmp.path(), &["list", "--filter", "MILK"]);
    assert_eq!(out, "  1  almond milk\n  3  oat milk\n");
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_shop_ok(tmp.path(), &["add", "milk"]);
    run_shop_ok(tmp.path(), &["add", "bread"]);

    let out = run_shop_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([
            {"position": 1, "item": "milk"},
            {"position": 2, "item": "bread"},
        ])
    );
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

#[test]
fn test_add_normalizes_and_persists() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_shop_ok(tmp.path(), &["add", "  Milk  "]);
    assert_eq!(out, "  1  milk\n");

    let record = read_record(tmp.path());
    assert_eq!(
        record,
        serde_json::json!({"items": ["milk"], "shouldShowClearButton": true})
    );
}

#[test]
fn test_add_duplicate_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_shop_ok(tmp.path(), &["add", "milk"]);

    let (_, stderr, success) = run_shop(tmp.path(), &["add", "MILK"]);
    assert!(!success);
    assert!(stderr.starts_with("error:"));
    assert!(stderr.contains("already in the list"));
    assert_eq!(read_record(tmp.path())["items"], serde_json::json!(["milk"]));
}

#[test]
fn test_add_blank_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_shop(tmp.path(), &["add", "   "]);
    assert!(!success);
    assert!(stderr.contains("empty"));
    assert!(!record_path(tmp.path(), "myShoppingListApp").exists());
}

#[test]
fn test_edit_in_place() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_shop_ok(tmp.path(), &["add", "milk"]);
    run_shop_ok(tmp.path(), &["add", "bread"]);
    run_shop_ok(tmp.path(), &["add", "eggs"]);

    let out = run_shop_ok(tmp.path(), &["edit", "2", "Rye", "Bread"]);
    assert_eq!(out, "  2  rye bread\n");
    assert_eq!(
        read_record(tmp.path())["items"],
        serde_json::json!(["milk", "rye bread", "eggs"])
    );
}

#[test]
fn test_edit_errors() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_shop_ok(tmp.path(), &["add", "milk"]);
    run_shop_ok(tmp.path(), &["add", "bread"]);

    let (_, stderr, success) = run_shop(tmp.path(), &["edit", "5", "tea"]);
    assert!(!success);
    assert!(stderr.contains("no item at position 5"));

    let (_, stderr, success) = run_shop(tmp.path(), &["edit", "0", "tea"]);
    assert!(!success);
    assert!(stderr.contains("positions start at 1"));

    let (_, _, success) = run_shop(tmp.path(), &["edit", "1", "Bread"]);
    assert!(!success);

    // Renaming to its own value is allowed
    run_shop_ok(tmp.path(), &["edit", "1", "MILK"]);
}

#[test]
fn test_rm_with_yes() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_shop_ok(tmp.path(), &["add", "milk"]);
    run_shop_ok(tmp.path(), &["add", "bread"]);

    let out = run_shop_ok(tmp.path(), &["rm", "1", "--yes"]);
    assert_eq!(out, "removed milk\n");
    assert_eq!(read_record(tmp.path())["items"], serde_json::json!(["bread"]));
}

#[test]
fn test_rm_asks_first() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_shop_ok(tmp.path(), &["add", "milk"]);
    run_shop_ok(tmp.path(), &["add", "bread"]);

    let (stdout, stderr, success) = run_shop_with_stdin(tmp.path(), &["rm", "2"], "n\n");
    assert!(success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Are you sure?"));
    assert!(stderr.contains("cancelled"));
    assert_eq!(
        read_record(tmp.path())["items"],
        serde_json::json!(["milk", "bread"])
    );

    let (stdout, _, success) = run_shop_with_stdin(tmp.path(), &["rm", "2"], "y\n");
    assert!(success);
    assert_eq!(stdout, "removed bread\n");
    assert_eq!(read_record(tmp.path())["items"], serde_json::json!(["milk"]));
}

#[test]
fn test_rm_last_item_keeps_empty_record() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_shop_ok(tmp.path(), &["add", "milk"]);
    run_shop_ok(tmp.path(), &["rm", "1", "-y"]);

    assert_eq!(
        read_record(tmp.path()),
        serde_json::json!({"items": [], "shouldShowClearButton": false})
    );
}

#[test]
fn test_clear_removes_record() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_shop_ok(tmp.path(), &["add", "milk"]);
    run_shop_ok(tmp.path(), &["add", "bread"]);

    let out = run_shop_ok(tmp.path(), &["clear"]);
    assert_eq!(out, "cleared 2 items\n");
    assert!(!record_path(tmp.path(), "myShoppingListApp").exists());
    assert_eq!(run_shop_ok(tmp.path(), &["record"]), "(no record)\n");
    assert_eq!(run_shop_ok(tmp.path(), &["list"]), "(no items)\n");
}

// ---------------------------------------------------------------------------
// Storage edge cases
// ---------------------------------------------------------------------------

#[test]
fn test_corrupt_record_reads_as_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = record_path(tmp.path(), "myShoppingListApp");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{not json").unwrap();

    assert_eq!(run_shop_ok(tmp.path(), &["list"]), "(no items)\n");

    // The unreadable value is kept beside the record
    let backups: Vec<_> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".bak"))
        .collect();
    assert_eq!(backups.len(), 1);
    assert!(backups[0].starts_with("myShoppingListApp-shoppingList.json."));
}

#[test]
fn test_data_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    let custom = tmp.path().join("elsewhere");
    let custom_str = custom.to_str().unwrap();
    run_shop_ok(tmp.path(), &["-D", custom_str, "add", "milk"]);

    assert!(custom.join("myShoppingListApp-shoppingList.json").exists());
    assert!(!record_path(tmp.path(), "myShoppingListApp").exists());
}

#[test]
fn test_parallel_adds_are_all_kept() {
    let tmp = tempfile::TempDir::new().unwrap();
    let children: Vec<_> = (0..8)
        .map(|i| {
            command(tmp.path(), &["add", &format!("item {}", i)])
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .spawn()
                .expect("failed to run shop")
        })
        .collect();
    for child in children {
        let output = child.wait_with_output().unwrap();
        assert!(
            output.status.success(),
            "{}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let items = read_record(tmp.path())["items"].as_array().unwrap().len();
    assert_eq!(items, 8);
}

#[test]
fn test_tui_launch_logs_to_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    // An unusable namespace stops the TUI before it touches the terminal
    let output = command(tmp.path(), &["--namespace", "../x"])
        .env("SHOPLIST_LOG", "trace")
        .stdin(Stdio::null())
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.starts_with("error:"), "{}", stderr);
    assert_eq!(stderr.lines().count(), 1, "{}", stderr);
    assert!(tmp.path().join("data/shoplist/shoplist.log").exists());
}

// ---------------------------------------------------------------------------
// Namespaces and config
// ---------------------------------------------------------------------------

#[test]
fn test_namespaces_are_independent() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_shop_ok(tmp.path(), &["add", "milk"]);
    run_shop_ok(tmp.path(), &["--namespace", "work", "add", "coffee"]);

    assert_eq!(run_shop_ok(tmp.path(), &["list"]), "  1  milk\n");
    assert_eq!(
        run_shop_ok(tmp.path(), &["--namespace", "work", "list"]),
        "  1  coffee\n"
    );
    assert!(record_path(tmp.path(), "work").exists());
}

#[test]
fn test_invalid_namespace_rejected() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_shop(tmp.path(), &["--namespace", "../x", "add", "milk"]);
    assert!(!success);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_config_set_namespace() {
    let tmp = tempfile::TempDir::new().unwrap();
    let config_file = tmp.path().join("config/shoplist/config.toml");
    fs::create_dir_all(config_file.parent().unwrap()).unwrap();
    fs::write(
        &config_file,
        "# my settings\n[ui]\nshow_key_hints = false # quiet\n",
    )
    .unwrap();

    let out = run_shop_ok(tmp.path(), &["config", "set-namespace", "home"]);
    assert_eq!(out, "namespace set to home\n");

    let text = fs::read_to_string(&config_file).unwrap();
    assert!(text.contains("# my settings"));
    assert!(text.contains("show_key_hints = false # quiet"));
    assert!(text.contains("namespace = \"home\""));

    run_shop_ok(tmp.path(), &["add", "milk"]);
    assert!(record_path(tmp.path(), "home").exists());

    let out = run_shop_ok(tmp.path(), &["--json", "config", "show"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["namespace"], "home");
    assert_eq!(parsed["key"], "home-shoppingList");
    assert_eq!(parsed["show_key_hints"], false);
}

#[test]
fn test_bad_config_reports_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    let config_file = tmp.path().join("config/shoplist/config.toml");
    fs::create_dir_all(config_file.parent().unwrap()).unwrap();
    fs::write(&config_file, "[storage\n").unwrap();

    let (_, stderr, success) = run_shop(tmp.path(), &["list"]);
    assert!(!success);
    assert!(stderr.starts_with("error:"));
}
