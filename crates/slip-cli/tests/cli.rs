use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SLIP_TEXT: &str = "山田 花子　様\n\
    R7年7月31日\n\
    クイーン シルバー 4,000 ×2\n\
    クレイパック 3,500\n\
    振込先：○○銀行 普通 1234567\n";

/// Workspace with an all-defaults config file, so the user's own config is never read.
fn workspace() -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    fs::write(&config, "{}").unwrap();
    let config = config.to_str().unwrap().to_string();
    (dir, config)
}

fn slip(config: &str) -> Command {
    let mut cmd = Command::cargo_bin("slip").unwrap();
    cmd.args(["-c", config]);
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn parse_text_file_as_json() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "slip.txt", SLIP_TEXT);

    slip(&config)
        .args(["parse", &input, "--today", "2025-10-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""customerName": "山田 花子""#))
        .stdout(predicate::str::contains(r#""date": "2025-07-31""#))
        .stdout(predicate::str::contains(r#""code": "421628""#))
        .stdout(predicate::str::contains(r#""code": "421652""#));
}

#[test]
fn parse_ocr_json_as_csv() {
    let (dir, config) = workspace();
    let input = write(
        dir.path(),
        "slip.json",
        r#"{"fullText": "クイーン シルバー 4,000 ×2", "lines": ["クイーン シルバー 4,000 ×2"]}"#,
    );

    slip(&config)
        .args(["parse", &input, "-f", "csv", "--today", "2025-10-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("customer_name,date,code,name"))
        .stdout(predicate::str::contains("421628"))
        .stdout(predicate::str::contains(",4000,2,8000,"));
}

#[test]
fn parse_rejects_json_without_lines() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "bad.json", r#"{"fullText": "クイーン シルバー 4,000"}"#);

    slip(&config)
        .args(["parse", &input])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lines"));
}

#[test]
fn parse_writes_output_file() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "slip.txt", SLIP_TEXT);
    let output = dir.path().join("slip.out.txt");

    slip(&config)
        .args(["parse", &input, "-f", "text", "--today", "2025-10-01", "-o"])
        .arg(&output)
        .assert()
        .success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("Customer: 山田 花子"));
    assert!(text.contains("Total: ¥11500 (3 units)"));
}

#[test]
fn batch_continues_past_bad_files() {
    let (dir, config) = workspace();
    let inputs = dir.path().join("inputs");
    fs::create_dir(&inputs).unwrap();
    write(&inputs, "a.txt", SLIP_TEXT);
    write(&inputs, "b.json", r#"{"fullText": ""}"#);
    let out = dir.path().join("out");

    let pattern = inputs.join("*");
    slip(&config)
        .args(["batch", pattern.to_str().unwrap(), "--summary", "--continue-on-error"])
        .args(["--today", "2025-10-01", "--output-dir"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"));

    assert!(out.join("a.json").exists());
    assert!(!out.join("b.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    let rows: Vec<&str> = summary.lines().collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[1].starts_with("a.txt,success,山田 花子,2025-07-31,true,2,3,11500,"));
    assert!(rows[2].starts_with("b.json,error,"));
}

#[test]
fn batch_stops_on_first_error_by_default() {
    let (dir, config) = workspace();
    write(dir.path(), "bad.json", "not json");

    let pattern = dir.path().join("bad.json");
    slip(&config)
        .args(["batch", pattern.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn catalog_show_builtin_product() {
    let (_dir, config) = workspace();

    slip(&config)
        .args(["catalog", "show", "421628"])
        .assert()
        .success()
        .stdout(predicate::str::contains("アルソアクイーンシルバー(135g)"))
        .stdout(predicate::str::contains("¥4000"))
        .stdout(predicate::str::contains("スキンケア"))
        .stdout(predicate::str::contains("Tax rate: 10%"));
}

#[test]
fn catalog_show_unknown_code_fails() {
    let (_dir, config) = workspace();

    slip(&config)
        .args(["catalog", "show", "000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Product not found"));
}

#[test]
fn catalog_list_includes_custom_products() {
    let (dir, config) = workspace();
    let custom = write(
        dir.path(),
        "custom.json",
        r#"[{"code": "900001", "name": "限定ギフトセット", "price": 9800, "category": "other"}]"#,
    );

    slip(&config)
        .args(["catalog", "list", "--category", "other", "--catalog", &custom])
        .assert()
        .success()
        .stdout(predicate::str::contains("900001"))
        .stdout(predicate::str::contains("限定ギフトセット"));
}

#[test]
fn config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("nested").join("config.json");
    let config = config.to_str().unwrap();

    slip(config).args(["config", "init"]).assert().success();
    slip(config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    slip(config)
        .args(["config", "get", "matching.min_match_score"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4"));

    slip(config)
        .args(["config", "set", "matching.min_match_score", "0.9"])
        .assert()
        .success();

    slip(config)
        .args(["config", "get", "matching.min_match_score"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.9"));
}

#[test]
fn config_set_unknown_key_fails() {
    let (_dir, config) = workspace();

    slip(&config)
        .args(["config", "set", "matching.no_such_key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
