//! Unit tests for membership module.

use super::*;
use serde_json::json;

fn stats_response() -> Value {
    json!({
        "poolMemberStats": {
            "items": [
                {"name": "web1:80"},
                {"name": "web2:80"}
            ]
        }
    })
}

// ============================================================================
// Extraction Tests
// ============================================================================

#[test]
fn test_extract_nested_items() {
    let membership = extract(&stats_response()).unwrap().expect("items present");

    assert_eq!(membership.source_key, "poolMemberStats");
    assert_eq!(membership.len(), 2);
    assert_eq!(membership.names().collect::<Vec<_>>(), ["web1:80", "web2:80"]);
}

#[test]
fn test_extract_top_level_items() {
    let body = json!({
        "kind": "tm:ltm:pool:members:memberscollectionstate",
        "selfLink": "https://localhost/mgmt/tm/ltm/pool/pool-web/members?ver=11.5.1",
        "items": [{"name": "web1:80", "address": "10.0.0.5"}]
    });

    let membership = extract(&body).unwrap().expect("items present");
    assert_eq!(membership.source_key, "items");
    assert_eq!(membership.members[0].raw["address"], "10.0.0.5");
}

#[test]
fn test_extract_items_not_first_key() {
    let body = json!({
        "kind": "tm:ltm:pool:members:memberscollectionstate",
        "generation": 42,
        "meta": {"count": 1},
        "stats": {"items": [{"name": "db1:5432"}]}
    });

    let membership = extract(&body).unwrap().expect("items present");
    assert_eq!(membership.source_key, "stats");
    assert!(membership.any_named("db1"));
}

#[test]
fn test_extract_first_carrier_wins() {
    let body = json!({
        "first": {"items": [{"name": "a:80"}]},
        "second": {"items": [{"name": "b:80"}]}
    });

    let membership = extract(&body).unwrap().expect("items present");
    assert_eq!(membership.source_key, "first");
    assert!(!membership.any_named("b:80"));
}

#[test]
fn test_extract_without_items() {
    let body = json!({"kind": "tm:ltm:pool:poolstate", "name": "pool-web"});
    assert_eq!(extract(&body).unwrap(), None);
}

#[test]
fn test_extract_non_object_body() {
    assert_eq!(extract(&json!([{"name": "web1:80"}])).unwrap(), None);
    assert_eq!(extract(&json!("items")).unwrap(), None);
}

#[test]
fn test_extract_items_wrong_shape() {
    let body = json!({"wrapper": {"items": "web1:80"}});

    let err = extract(&body).unwrap_err();
    assert!(matches!(err, Error::UnexpectedResponse(_)));
    assert!(err.to_string().contains("wrapper"));
}

// ============================================================================
// Matching Tests
// ============================================================================

#[test]
fn test_any_named_substring() {
    let membership = extract(&stats_response()).unwrap().unwrap();

    assert!(membership.any_named("web1"));
    assert!(membership.any_named("web2:80"));
    assert!(membership.any_named(":80"));
    assert!(!membership.any_named("web3"));
    assert!(!membership.any_named("WEB1"));
}

#[test]
fn test_any_named_empty_fragment() {
    let membership = extract(&stats_response()).unwrap().unwrap();
    assert!(membership.any_named(""));
}

#[test]
fn test_any_named_empty_items() {
    let body = json!({"poolMemberStats": {"items": []}});
    let membership = extract(&body).unwrap().unwrap();

    assert!(membership.is_empty());
    assert!(!membership.any_named("web1"));
    assert!(!membership.any_named(""));
}

#[test]
fn test_members_without_name_never_match() {
    let body = json!({
        "stats": {"items": [{"address": "10.0.0.5"}, {"name": 7}, "web1:80"]}
    });
    let membership = extract(&body).unwrap().unwrap();

    assert_eq!(membership.len(), 3);
    assert_eq!(membership.names().count(), 0);
    assert!(!membership.any_named(""));
}
