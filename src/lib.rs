//! HTTP client library for the BIG-IP LTM iControl REST management API.
//!
//! This crate maps the provisioning endpoints of the management API onto typed
//! methods: saving the running configuration, checking and creating nodes,
//! pools and health monitors, adding pool members, and querying pool
//! membership.
//!
//! ## Endpoints
//!
//! All paths are relative to `https://{address}/mgmt/tm/`.
//!
//! | Method | Path | Client operation |
//! |--------|------|------------------|
//! | POST | `sys/config` | [`BigIpClient::save`] |
//! | GET | `ltm/node/{name}` | [`BigIpClient::check_node`] |
//! | POST | `ltm/node` | [`BigIpClient::make_node`] |
//! | GET | `ltm/pool/{pool}` | [`BigIpClient::check_pool`] |
//! | POST | `ltm/pool` | [`BigIpClient::create_pool`] |
//! | POST | `ltm/pool/{pool}/members` | [`BigIpClient::add_node2pool`] |
//! | GET | `ltm/pool/{pool}/members/` | [`BigIpClient::is_member`], [`BigIpClient::get_pool_membership`] |
//! | GET | `ltm/monitor[/{parent}]/{monitor}` | [`BigIpClient::check_health_monitor`] |
//! | POST | `ltm/monitor[/{parent}]` | [`BigIpClient::create_health_monitor`] |
//!
//! # Example
//!
//! ```no_run
//! use bigip_client::{BigIpClient, NewPool, LoadBalancingMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), bigip_client::Error> {
//!     let client = BigIpClient::new("lb.example.com", "admin", "secret")?;
//!
//!     if client.check_node("web1").await?.is_not_found() {
//!         client.make_node("web1", "10.0.0.5").await?;
//!     }
//!
//!     let pool = NewPool::new("pool-web", ["web1:80"])
//!         .with_monitor("http")
//!         .with_load_balancing_mode(LoadBalancingMode::LeastConnectionsMember);
//!     client.create_pool(&pool).await?;
//!
//!     assert!(client.is_member("pool-web", "web1").await?);
//!     client.save().await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod clock;
mod config;
mod error;
mod membership;
mod types;

pub use client::BigIpClient;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{API_PREFIX, ConfigError, Scheme, SessionConfig};
pub use error::Error;
pub use membership::{ITEMS_KEY, PoolMember, PoolMembership};
pub use types::*;
