//! Unit tests for types module.

use super::*;
use chrono::{NaiveDateTime, TimeZone};
use serde_json::json;

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 5).unwrap()
}

// ============================================================================
// ConfigCommand Tests
// ============================================================================

#[test]
fn test_save_command_serialization() {
    let value = serde_json::to_value(ConfigCommand::save()).unwrap();
    assert_eq!(value, json!({"command": "save"}));
}

// ============================================================================
// NodeRequest Tests
// ============================================================================

#[test]
fn test_node_request_serialization() {
    let node = NodeRequest::new("web1", "10.0.0.5");

    let json = serde_json::to_string(&node).unwrap();
    assert_eq!(
        json,
        r#"{"kind":"tm:ltm:node","name":"web1","address":"10.0.0.5","monitor":"default"}"#
    );
}

// ============================================================================
// LoadBalancingMode Tests
// ============================================================================

#[test]
fn test_load_balancing_mode_serialization() {
    assert_eq!(
        serde_json::to_string(&LoadBalancingMode::RoundRobin).unwrap(),
        "\"round-robin\""
    );
    assert_eq!(
        serde_json::to_string(&LoadBalancingMode::LeastConnectionsMember).unwrap(),
        "\"least-connections-member\""
    );
    assert_eq!(
        serde_json::to_string(&LoadBalancingMode::Other("custom-mode".to_string())).unwrap(),
        "\"custom-mode\""
    );
}

#[test]
fn test_load_balancing_mode_deserialization() {
    let known: LoadBalancingMode = serde_json::from_str("\"ratio-member\"").unwrap();
    let unknown: LoadBalancingMode = serde_json::from_str("\"shiny-new-mode\"").unwrap();

    assert_eq!(known, LoadBalancingMode::RatioMember);
    assert_eq!(unknown, LoadBalancingMode::Other("shiny-new-mode".to_string()));
}

#[test]
fn test_load_balancing_mode_display_matches_wire() {
    let modes = [
        LoadBalancingMode::RoundRobin,
        LoadBalancingMode::FastestAppResponse,
        LoadBalancingMode::WeightedLeastConnectionsNode,
        LoadBalancingMode::LeastSessions,
    ];

    for mode in modes {
        let wire = serde_json::to_string(&mode).unwrap();
        assert_eq!(wire, format!("\"{}\"", mode));
    }
}

// ============================================================================
// PoolRequest Tests
// ============================================================================

#[test]
fn test_pool_request_members_reshaped_once() {
    let pool = NewPool::new("pool-web", ["a", "b"]);
    let request = PoolRequest::new(&pool, fixed_time());

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["members"], json!([{"name": "a"}, {"name": "b"}]));
}

#[test]
fn test_pool_request_full_payload() {
    let pool = NewPool::new("pool-web", ["web1:80"])
        .with_monitor("http")
        .with_load_balancing_mode(LoadBalancingMode::LeastConnectionsMember);
    let request = PoolRequest::new(&pool, fixed_time());

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(
        value,
        json!({
            "kind": "tm:ltm:pool:poolstate",
            "name": "pool-web",
            "description": "Auto-configured on 2024-03-15 12:30:05 UTC",
            "loadBalancingMode": "least-connections-member",
            "monitor": "http",
            "members": [{"name": "web1:80"}]
        })
    );
}

#[test]
fn test_pool_request_omits_unset_options() {
    let pool = NewPool::new("pool-web", Vec::<String>::new());
    let value = serde_json::to_value(PoolRequest::new(&pool, fixed_time())).unwrap();

    assert!(value.get("monitor").is_none());
    assert!(value.get("loadBalancingMode").is_none());
    assert_eq!(value["members"], json!([]));
}

#[test]
fn test_pool_description_is_parseable() {
    let description = pool_description(fixed_time());
    let stamp = description
        .strip_prefix(DESCRIPTION_PREFIX)
        .expect("description prefix");

    let parsed = NaiveDateTime::parse_from_str(stamp, DESCRIPTION_TIME_FORMAT).unwrap();
    assert_eq!(parsed.and_utc(), fixed_time());
}

// ============================================================================
// HealthMonitor Tests
// ============================================================================

#[test]
fn test_health_monitor_passes_settings_through() {
    let monitor = HealthMonitor::new("web-http")
        .derived_from("http")
        .with_setting("interval", 5)
        .with_setting("send", "GET /health HTTP/1.1\\r\\n\\r\\n");

    let value = serde_json::to_value(&monitor).unwrap();
    assert_eq!(value["name"], "web-http");
    assert_eq!(value["interval"], 5);
    assert!(value.get("parent").is_none());
    assert_eq!(monitor.parent.as_deref(), Some("http"));
}

#[test]
fn test_health_monitor_deserialization_keeps_unknown_fields() {
    let monitor: HealthMonitor = serde_json::from_value(json!({
        "name": "http",
        "kind": "tm:ltm:monitor:http:httpstate",
        "timeout": 16
    }))
    .unwrap();

    assert_eq!(monitor.name, "http");
    assert_eq!(monitor.settings["timeout"], 16);
    assert_eq!(monitor.parent, None);
}

// ============================================================================
// CheckResponse Tests
// ============================================================================

#[test]
fn test_check_response_found() {
    let response = CheckResponse::from_text(200, r#"{"name":"web1"}"#);

    assert!(response.is_found());
    assert!(!response.is_not_found());
    assert_eq!(response.body["name"], "web1");
}

#[test]
fn test_check_response_not_found() {
    let response = CheckResponse::from_text(
        404,
        r#"{"code":404,"message":"01020036:3: The requested Node (/Common/web9) was not found."}"#,
    );

    assert!(!response.is_found());
    assert!(response.is_not_found());
    assert!(response.message().unwrap().contains("was not found"));
}

#[test]
fn test_check_response_non_json_body() {
    let response = CheckResponse::from_text(502, "Bad Gateway");

    assert_eq!(response.body, Value::String("Bad Gateway".to_string()));
    assert_eq!(response.message(), None);
}

#[test]
fn test_check_response_empty_body() {
    let response = CheckResponse::from_text(204, "");
    assert_eq!(response.body, Value::Null);
}
