//! End-to-end `osp` binary runs.
//!
//! Each test runs inside its own temp dir so no `.env.local` is picked up,
//! and clears the override variables so the host environment cannot leak in.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const OVERRIDE_VARS: &[&str] = &[
    "SHARE_DECIMAL_PLACES",
    "DEFAULT_STOCK_PRICE",
    "EXECUTION_CALENDAR",
    "OSP_DAEMON_ADDR",
];

fn osp(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("osp").unwrap();
    cmd.current_dir(dir);
    for v in OVERRIDE_VARS {
        cmd.env_remove(v);
    }
    cmd
}

fn write(dir: &Path, name: &str, body: &str) -> String {
    let p = dir.join(name);
    fs::write(&p, body).unwrap();
    p.to_str().unwrap().to_string()
}

#[test]
fn split_prints_order_json() {
    let dir = tempfile::tempdir().unwrap();
    let req = write(
        dir.path(),
        "req.json",
        r#"{"orderType":"BUY","totalAmount":100,
            "portfolio":[{"symbol":"AAPL","weight":60},{"symbol":"TSLA","weight":40}]}"#,
    );

    let out = osp(dir.path())
        .args(["split", "--request", &req])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["orderType"], "BUY");
    assert_eq!(json["breakdown"][0]["allocatedAmount"], 60.0);
    assert_eq!(json["breakdown"][1]["quantity"], 0.4);
}

#[test]
fn split_honours_config_and_env_override() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write(
        dir.path(),
        "base.yaml",
        "allocation:\n  share_decimal_places: 1\n  default_stock_price: 3\n",
    );
    let req = write(
        dir.path(),
        "req.json",
        r#"{"orderType":"SELL","totalAmount":100,"portfolio":[{"symbol":"AAPL","weight":100}]}"#,
    );

    // Env wins over YAML: 100 / 3 at two places.
    let out = osp(dir.path())
        .env("SHARE_DECIMAL_PLACES", "2")
        .args(["split", "--request", &req, "--config", &cfg])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["breakdown"][0]["price"], 3.0);
    assert_eq!(json["breakdown"][0]["quantity"], 33.33);
}

#[test]
fn split_rejects_bad_weights_with_code() {
    let dir = tempfile::tempdir().unwrap();
    let req = write(
        dir.path(),
        "req.json",
        r#"{"orderType":"BUY","totalAmount":100,
            "portfolio":[{"symbol":"AAPL","weight":50},{"symbol":"TSLA","weight":30}]}"#,
    );
    osp(dir.path())
        .args(["split", "--request", &req])
        .assert()
        .failure()
        .stderr(predicate::str::contains("WEIGHTS_DO_NOT_TOTAL_100"));
}

#[test]
fn split_refuses_invalid_precision() {
    let dir = tempfile::tempdir().unwrap();
    let req = write(
        dir.path(),
        "req.json",
        r#"{"orderType":"BUY","totalAmount":100,"portfolio":[{"symbol":"AAPL","weight":100}]}"#,
    );
    osp(dir.path())
        .env("SHARE_DECIMAL_PLACES", "8")
        .args(["split", "--request", &req])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SHARE_DECIMAL_PLACES"));
}

#[test]
fn strict_split_fails_on_unknown_config_key() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write(dir.path(), "base.yaml", "allocation:\n  precision: 2\n");
    let req = write(
        dir.path(),
        "req.json",
        r#"{"orderType":"BUY","totalAmount":100,"portfolio":[{"symbol":"AAPL","weight":100}]}"#,
    );
    osp(dir.path())
        .args(["split", "--request", &req, "--config", &cfg, "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIG_UNUSED_KEYS"));
}

#[test]
fn config_hash_prints_hash_and_canonical_json() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = write(dir.path(), "base.yaml", "calendar:\n  policy: weekends\n");
    osp(dir.path())
        .args(["config-hash", &cfg])
        .assert()
        .success()
        .stdout(predicate::str::contains("config_hash="))
        .stdout(predicate::str::contains(r#"{"calendar":{"policy":"weekends"}}"#));
}
