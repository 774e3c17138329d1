//! Request and response types for the LTM management API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[cfg(test)]
mod tests;

/// Resource kind stamped on node payloads.
pub const NODE_KIND: &str = "tm:ltm:node";

/// Resource kind stamped on pool payloads.
pub const POOL_KIND: &str = "tm:ltm:pool:poolstate";

/// Monitor assigned to nodes created by this client.
pub const DEFAULT_NODE_MONITOR: &str = "default";

/// `strftime` layout of the timestamp embedded in pool descriptions.
pub const DESCRIPTION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Prefix of every generated pool description.
pub const DESCRIPTION_PREFIX: &str = "Auto-configured on ";

// ============================================================================
// System
// ============================================================================

/// Command posted to `sys/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigCommand {
    /// Command name.
    pub command: String,
}

impl ConfigCommand {
    /// Persists the running configuration.
    #[must_use]
    pub fn save() -> Self {
        Self {
            command: "save".to_string(),
        }
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// Node creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRequest {
    /// Resource kind.
    pub kind: String,
    /// Node name.
    pub name: String,
    /// Node IP address.
    pub address: String,
    /// Monitor rule.
    pub monitor: String,
}

impl NodeRequest {
    /// Creates a node payload using the default monitor.
    pub fn new(name: &str, address: &str) -> Self {
        Self {
            kind: NODE_KIND.to_string(),
            name: name.to_string(),
            address: address.to_string(),
            monitor: DEFAULT_NODE_MONITOR.to_string(),
        }
    }
}

// ============================================================================
// Pools
// ============================================================================

/// Load balancing algorithm of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadBalancingMode {
    /// Round robin.
    RoundRobin,
    /// Ratio per member.
    RatioMember,
    /// Ratio per node.
    RatioNode,
    /// Ratio per session.
    RatioSession,
    /// Least connections per member.
    LeastConnectionsMember,
    /// Least connections per node.
    LeastConnectionsNode,
    /// Weighted least connections per member.
    WeightedLeastConnectionsMember,
    /// Weighted least connections per node.
    WeightedLeastConnectionsNode,
    /// Ratio least connections per member.
    RatioLeastConnectionsMember,
    /// Ratio least connections per node.
    RatioLeastConnectionsNode,
    /// Fastest node.
    FastestNode,
    /// Fastest application response.
    FastestAppResponse,
    /// Observed per member.
    ObservedMember,
    /// Observed per node.
    ObservedNode,
    /// Predictive per member.
    PredictiveMember,
    /// Predictive per node.
    PredictiveNode,
    /// Dynamic ratio per member.
    DynamicRatioMember,
    /// Dynamic ratio per node.
    DynamicRatioNode,
    /// Least sessions.
    LeastSessions,
    /// Mode not known to this client, sent verbatim.
    #[serde(untagged)]
    Other(String),
}

impl LoadBalancingMode {
    /// Wire name of the mode.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::RoundRobin => "round-robin",
            Self::RatioMember => "ratio-member",
            Self::RatioNode => "ratio-node",
            Self::RatioSession => "ratio-session",
            Self::LeastConnectionsMember => "least-connections-member",
            Self::LeastConnectionsNode => "least-connections-node",
            Self::WeightedLeastConnectionsMember => "weighted-least-connections-member",
            Self::WeightedLeastConnectionsNode => "weighted-least-connections-node",
            Self::RatioLeastConnectionsMember => "ratio-least-connections-member",
            Self::RatioLeastConnectionsNode => "ratio-least-connections-node",
            Self::FastestNode => "fastest-node",
            Self::FastestAppResponse => "fastest-app-response",
            Self::ObservedMember => "observed-member",
            Self::ObservedNode => "observed-node",
            Self::PredictiveMember => "predictive-member",
            Self::PredictiveNode => "predictive-node",
            Self::DynamicRatioMember => "dynamic-ratio-member",
            Self::DynamicRatioNode => "dynamic-ratio-node",
            Self::LeastSessions => "least-sessions",
            Self::Other(mode) => mode,
        }
    }
}

impl std::fmt::Display for LoadBalancingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reference to a pool member by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRef {
    /// Member name, conventionally `<node>:<port>`.
    pub name: String,
}

/// Caller-side description of a pool to create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPool {
    /// Pool name.
    pub name: String,
    /// Member names, in order.
    pub members: Vec<String>,
    /// Health monitor name.
    pub monitor: Option<String>,
    /// Load balancing algorithm.
    pub load_balancing_mode: Option<LoadBalancingMode>,
}

impl NewPool {
    /// Creates a pool description with no monitor and the remote default mode.
    pub fn new<I, S>(name: &str, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            members: members.into_iter().map(Into::into).collect(),
            monitor: None,
            load_balancing_mode: None,
        }
    }

    /// Sets the health monitor.
    #[must_use]
    pub fn with_monitor(mut self, monitor: &str) -> Self {
        self.monitor = Some(monitor.to_string());
        self
    }

    /// Sets the load balancing mode.
    #[must_use]
    pub fn with_load_balancing_mode(mut self, mode: LoadBalancingMode) -> Self {
        self.load_balancing_mode = Some(mode);
        self
    }
}

/// Pool creation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRequest {
    /// Resource kind.
    pub kind: String,
    /// Pool name.
    pub name: String,
    /// Generated description carrying the creation time.
    pub description: String,
    /// Load balancing algorithm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_balancing_mode: Option<LoadBalancingMode>,
    /// Health monitor name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor: Option<String>,
    /// Members, one entry per input name.
    pub members: Vec<MemberRef>,
}

impl PoolRequest {
    /// Builds the payload for `pool`, stamping the description with `at`.
    pub fn new(pool: &NewPool, at: DateTime<Utc>) -> Self {
        Self {
            kind: POOL_KIND.to_string(),
            name: pool.name.clone(),
            description: pool_description(at),
            load_balancing_mode: pool.load_balancing_mode.clone(),
            monitor: pool.monitor.clone(),
            members: pool
                .members
                .iter()
                .map(|name| MemberRef { name: name.clone() })
                .collect(),
        }
    }
}

/// Description attached to pools created by this client.
#[must_use]
pub fn pool_description(at: DateTime<Utc>) -> String {
    format!("{}{}", DESCRIPTION_PREFIX, at.format(DESCRIPTION_TIME_FORMAT))
}

// ============================================================================
// Health Monitors
// ============================================================================

/// Health monitor definition.
///
/// Only the name is interpreted; every other field is passed through to the
/// management API untouched. `parent` selects the builtin monitor type the
/// request is routed under and is not part of the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMonitor {
    /// Monitor name.
    pub name: String,
    /// Builtin monitor type to derive from (e.g. `http`).
    #[serde(skip)]
    pub parent: Option<String>,
    /// Vendor-specific settings.
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl HealthMonitor {
    /// Creates a monitor with no parent and no settings.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            settings: Map::new(),
        }
    }

    /// Derives the monitor from a builtin type.
    #[must_use]
    pub fn derived_from(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    /// Adds a pass-through setting.
    #[must_use]
    pub fn with_setting(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.settings.insert(key.to_string(), value.into());
        self
    }
}

// ============================================================================
// Pool Members
// ============================================================================

/// Payload adding a member to an existing pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddMemberRequest {
    /// Member name.
    pub name: String,
}

// ============================================================================
// Existence checks
// ============================================================================

/// Full response of an existence check, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed body. Non-JSON bodies are kept as a string, empty ones as null.
    pub body: Value,
}

impl CheckResponse {
    /// Builds a check response from a raw body.
    #[must_use]
    pub fn from_text(status: u16, text: &str) -> Self {
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
        };

        Self { status, body }
    }

    /// Returns true when the resource exists.
    #[must_use]
    pub fn is_found(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true when the management API reported the resource missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Error message carried in a BIG-IP error body, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}
