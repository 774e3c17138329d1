//! HTTP client for the BIG-IP management API.

use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::error::Error;
use crate::membership::{self, PoolMembership};
use crate::types::*;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};


/// HTTP client for the BIG-IP LTM iControl REST API.
///
/// Every operation issues exactly one request and resolves once the full
/// response has been read. Nothing is retried or cached.
#[derive(Clone)]
pub struct BigIpClient {
    client: Client,
    base_url: String,
    user: String,
    password: String,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for BigIpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BigIpClient")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl BigIpClient {
    /// Creates a client for `https://{address}/mgmt/tm/`.
    ///
    /// No request is made until the first operation.
    ///
    /// # Errors
    /// Returns error if the address or a credential is empty, or the HTTP
    /// client cannot be built.
    pub fn new(address: &str, user: &str, password: &str) -> Result<Self, Error> {
        Self::with_config(SessionConfig::new(address, user, password))
    }

    /// Creates a client from an explicit session configuration.
    ///
    /// # Errors
    /// Returns error if the configuration is invalid, the base URL does not
    /// parse, or the HTTP client cannot be built.
    pub fn with_config(config: SessionConfig) -> Result<Self, Error> {
        config.validate()?;

        let base_url = config.base_url();
        url::Url::parse(&base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            user: config.user,
            password: config.password,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replaces the clock used to stamp pool descriptions.
    #[must_use]
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Base URL all request paths are relative to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // System
    // ========================================================================

    /// Persists the running configuration.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn save(&self) -> Result<Value, Error> {
        self.post("sys/config", &ConfigCommand::save()).await
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Looks up a node. The response is returned whatever its status.
    ///
    /// # Errors
    /// Returns error only if the request cannot be completed.
    pub async fn check_node(&self, name: &str) -> Result<CheckResponse, Error> {
        self.check(&format!("ltm/node/{}", name)).await
    }

    /// Creates a node monitored by the default monitor.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn make_node(&self, name: &str, address: &str) -> Result<Value, Error> {
        self.post("ltm/node", &NodeRequest::new(name, address)).await
    }

    // ========================================================================
    // Pools
    // ========================================================================

    /// Looks up a pool. The response is returned whatever its status.
    ///
    /// # Errors
    /// Returns error only if the request cannot be completed.
    pub async fn check_pool(&self, pool_name: &str) -> Result<CheckResponse, Error> {
        self.check(&format!("ltm/pool/{}", pool_name)).await
    }

    /// Creates a pool. The description is stamped with the current UTC time.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn create_pool(&self, pool: &NewPool) -> Result<Value, Error> {
        let payload = PoolRequest::new(pool, self.clock.now());
        self.post("ltm/pool", &payload).await
    }

    /// Adds an existing node to a pool as `member_name`.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn add_node2pool(&self, member_name: &str, pool_name: &str) -> Result<Value, Error> {
        let payload = AddMemberRequest {
            name: member_name.to_string(),
        };
        self.post(&format!("ltm/pool/{}/members", pool_name), &payload)
            .await
    }

    /// Lists the members of a pool.
    ///
    /// Returns `None` if the response carries no `items` sequence.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the pool does not exist, and
    /// [`Error::Json`] if the body is not JSON.
    pub async fn get_pool_membership(
        &self,
        pool_name: &str,
    ) -> Result<Option<PoolMembership>, Error> {
        let path = format!("ltm/pool/{}/members/", pool_name);
        let body: Value = self.get(&path).await?;

        let membership = membership::extract(&body)?;
        if membership.is_none() {
            warn!(pool = pool_name, "membership response carries no items");
        }
        Ok(membership)
    }

    /// Returns true if any member of the pool has a name containing
    /// `member_name`.
    ///
    /// A response without an `items` sequence yields `false`.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if the pool does not exist.
    pub async fn is_member(&self, pool_name: &str, member_name: &str) -> Result<bool, Error> {
        let membership = self.get_pool_membership(pool_name).await?;
        Ok(membership.is_some_and(|m| m.any_named(member_name)))
    }

    // ========================================================================
    // Health Monitors
    // ========================================================================

    /// Looks up a health monitor, under `parent` when given.
    ///
    /// # Errors
    /// Returns error only if the request cannot be completed.
    pub async fn check_health_monitor(
        &self,
        monitor: &str,
        parent: Option<&str>,
    ) -> Result<CheckResponse, Error> {
        let path = match parent {
            Some(parent) => format!("ltm/monitor/{}/{}", parent, monitor),
            None => format!("ltm/monitor/{}", monitor),
        };
        self.check(&path).await
    }

    /// Creates a health monitor from a caller-supplied payload, under `parent`
    /// when given.
    ///
    /// # Errors
    /// Returns error if the request fails.
    pub async fn create_health_monitor<T>(
        &self,
        payload: &T,
        parent: Option<&str>,
    ) -> Result<Value, Error>
    where
        T: Serialize + ?Sized,
    {
        let path = match parent {
            Some(parent) => format!("ltm/monitor/{}", parent),
            None => "ltm/monitor".to_string(),
        };
        self.post(&path, payload).await
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = method.as_str(), url = url.as_str(), "sending request");
        self.client
            .request(method, url)
            .basic_auth(&self.user, Some(&self.password))
    }

    async fn check(&self, path: &str) -> Result<CheckResponse, Error> {
        let resp = self.request(Method::GET, path).send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        debug!(status, path, "check completed");
        Ok(CheckResponse::from_text(status, &text))
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let resp = self.request(Method::GET, path).send().await?;
        self.handle_response(resp).await
    }

    async fn post<B, T>(&self, path: &str, payload: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let resp = self
            .request(Method::POST, path)
            .json(payload)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status.is_success() {
            let text = resp.text().await?;
            Ok(serde_json::from_str(&text)?)
        } else if status.as_u16() == 404 {
            let text = resp.text().await.unwrap_or_default();
            Err(Error::NotFound(text))
        } else {
            let text = resp.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}
