//! Integration tests for the specimen CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

const CATALOG: &str = r#"{
  "types": [
    { "name": "Order",
      "constructors": [
        [{ "name": "id", "type": "i32" }],
        [{ "name": "id", "type": "i32" }, { "name": "note", "type": "string" }]
      ],
      "properties": [{ "name": "lines", "type": "List<OrderLine>" }] },
    { "name": "OrderLine",
      "constructors": [[{ "name": "sku", "type": "string" }]] },
    { "name": "Ping",
      "constructors": [[{ "name": "pong", "type": "Pong" }]] },
    { "name": "Pong",
      "constructors": [[{ "name": "ping", "type": "Ping" }, { "name": "id", "type": "i32" }]] }
  ]
}"#;

fn write_catalog(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, CATALOG).unwrap();
    path
}

fn specimen() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("specimen").unwrap()
}

#[test]
fn test_resolve_prints_object_json() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir);

    let output = specimen()
        .arg("--catalog")
        .arg(&catalog)
        .args(["resolve", "Order", "--count", "2"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["$type"], "Order");
    assert!(json["id"].is_number());
    assert!(json.get("note").is_none(), "modest constructor chosen");
    assert_eq!(json["lines"].as_array().unwrap().len(), 2);
}

#[test]
fn test_resolve_greedy_and_many() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir);

    let output = specimen()
        .arg("--catalog")
        .arg(&catalog)
        .args(["resolve", "Order", "--greedy", "--many", "2", "--compact"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let orders = json.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders[0]["note"].as_str().unwrap().starts_with("note"));
}

#[test]
fn test_resolve_builtin_collection_without_catalog() {
    specimen()
        .args(["resolve", "List<i32>"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("["));
}

#[test]
fn test_resolve_recursion_failure() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir);

    specimen()
        .arg("--catalog")
        .arg(&catalog)
        .args(["resolve", "Ping"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RECURSION_CYCLE"));

    specimen()
        .arg("--catalog")
        .arg(&catalog)
        .args(["resolve", "Ping", "--recursion", "null"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ping\": null"));
}

#[test]
fn test_resolve_errors() {
    specimen()
        .args(["resolve", "Nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("UNSATISFIABLE"));

    specimen()
        .args(["resolve", "List<"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid type"));

    specimen()
        .args(["resolve", "i32", "--recursion", "sometimes"])
        .assert()
        .failure();
}

#[test]
fn test_candidates_order() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(&dir);

    specimen()
        .arg("--catalog")
        .arg(&catalog)
        .args(["candidates", "Order"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Order::new [constructor] (id: i32)"));

    let output = specimen()
        .arg("--catalog")
        .arg(&catalog)
        .args(["candidates", "Order", "--greedy", "--json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["parameters"].as_array().unwrap().len(), 2);
}

#[test]
fn test_missing_catalog_file() {
    specimen()
        .args(["--catalog", "/nonexistent/catalog.json", "graph"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read catalog"));
}

#[test]
fn test_graph_outline() {
    specimen()
        .arg("graph")
        .assert()
        .success()
        .stdout(predicate::str::contains("RecursionGuard"));
}
