//! Whitelist file loading tests

use std::fs;
use std::path::PathBuf;

use gatewatch::application::whitelist::WhitelistIndex;
use gatewatch::config::WhitelistConfig;
use gatewatch::domain::value_objects::WhitelistCategory;

fn write_whitelist(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loads_legacy_and_v2_entries_side_by_side() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_whitelist(
        &dir,
        "public.json",
        r#"{
            "whitelist": {
                "orders-api": [
                    "/health",
                    {"path": "/oauth/token", "method": "POST", "comment": "token issuance"},
                    {"path": "/webhook/jumio/*", "method": "*"}
                ]
            }
        }"#,
    );

    let config = WhitelistConfig {
        no_requiere_seguridad: Some(path),
        ..WhitelistConfig::default()
    };
    let index = WhitelistIndex::load(&config);

    // Legacy entry applies to every method
    assert!(!index.categories_for("orders-api", "GET", "/health").is_empty());
    assert!(!index.categories_for("orders-api", "DELETE", "/health").is_empty());

    // V2 entry restricts by method
    assert!(!index.categories_for("orders-api", "POST", "/oauth/token").is_empty());
    assert!(index.categories_for("orders-api", "GET", "/oauth/token").is_empty());

    // V2 entry with a "*" method applies to every method
    assert!(!index
        .categories_for("orders-api", "PUT", "/webhook/jumio/callback")
        .is_empty());

    // Entries never leak across APIs
    assert!(index.categories_for("billing-api", "GET", "/health").is_empty());
}

#[test]
fn wildcard_method_means_any() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_whitelist(
        &dir,
        "wildcard.json",
        r#"{"whitelist": {"orders-api": [{"path": "/status", "method": "*"}]}}"#,
    );

    let config = WhitelistConfig {
        no_requiere_seguridad: Some(path),
        ..WhitelistConfig::default()
    };
    let index = WhitelistIndex::load(&config);

    assert!(!index.categories_for("orders-api", "GET", "/status").is_empty());
    assert!(!index.categories_for("orders-api", "POST", "/status").is_empty());
}

#[test]
fn unconfigured_categories_are_empty() {
    let index = WhitelistIndex::load(&WhitelistConfig::default());
    assert!(index.is_empty());
    assert!(index.categories_for("orders-api", "GET", "/anything").is_empty());
}

#[test]
fn missing_file_is_treated_as_empty() {
    let config = WhitelistConfig {
        seguridad_por_ip: Some(PathBuf::from("/nonexistent/whitelist.json")),
        ..WhitelistConfig::default()
    };
    let index = WhitelistIndex::load(&config);
    assert!(index.is_empty());
}

#[test]
fn invalid_json_is_treated_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_whitelist(&dir, "broken.json", "not json at all");

    let config = WhitelistConfig {
        seguridad_en_microservicio: Some(path),
        ..WhitelistConfig::default()
    };
    let index = WhitelistIndex::load(&config);
    assert!(index.is_empty());
}

#[test]
fn malformed_entries_are_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_whitelist(
        &dir,
        "mixed.json",
        r#"{
            "whitelist": {
                "orders-api": [
                    "/health",
                    {"method": "GET"},
                    42,
                    {"path": "/status", "method": "GET"}
                ]
            }
        }"#,
    );

    let config = WhitelistConfig {
        no_requiere_seguridad: Some(path),
        ..WhitelistConfig::default()
    };
    let index = WhitelistIndex::load(&config);

    assert!(!index.categories_for("orders-api", "GET", "/health").is_empty());
    assert!(!index.categories_for("orders-api", "GET", "/status").is_empty());
}

#[test]
fn v2_entry_without_method_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_whitelist(
        &dir,
        "no_method.json",
        r#"{"whitelist": {"orders-api": [{"path": "/webhook/jumio/*"}]}}"#,
    );

    let config = WhitelistConfig {
        no_requiere_seguridad: Some(path),
        ..WhitelistConfig::default()
    };
    let index = WhitelistIndex::load(&config);

    assert!(index
        .categories_for("orders-api", "PUT", "/webhook/jumio/callback")
        .is_empty());
    assert!(index.is_empty());
}

#[test]
fn multi_category_membership_joins_labels_alphabetically() {
    let dir = tempfile::tempdir().unwrap();
    let public = write_whitelist(&dir, "public.json", r#"{"whitelist": {"orders-api": ["/ping"]}}"#);
    let by_ip = write_whitelist(&dir, "by_ip.json", r#"{"whitelist": {"orders-api": ["/ping"]}}"#);

    let config = WhitelistConfig {
        no_requiere_seguridad: Some(public),
        seguridad_por_ip: Some(by_ip),
        ..WhitelistConfig::default()
    };
    let index = WhitelistIndex::load(&config);

    let categories = index.categories_for("orders-api", "GET", "/ping");
    assert_eq!(categories.len(), 2);
    assert!(categories.contains(&WhitelistCategory::NoRequiereSeguridad));
    assert_eq!(
        WhitelistIndex::label(&categories),
        "NO_REQUIERE_SEGURIDAD+SEGURIDAD_POR_IP"
    );
}
