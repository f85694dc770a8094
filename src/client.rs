/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Data-access collaborator for the aggregation core.
//!
//! The core consumes [`FleetApi`]; [`HttpFleetApi`] implements it
//! against the fleet's JSON HTTP API. Fetches are issued serially from
//! the event loop, so no request-level concurrency control is needed
//! here.
//!
//! Address handling: `--addr` may be `host:port` (no scheme) or an
//! explicit `http://...` / `https://...`; a provided scheme is treated
//! as authoritative.

use std::time::Duration;

use async_trait::async_trait;

use crate::model::Deployment;
use crate::model::Server;
use crate::model::Service;
use crate::model::Stack;

/// Failure of a single fleet API request.
///
/// Never fatal to the tree: callers retain last-known data and log.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),
}

/// Read-only queries the aggregation core needs from the fleet.
///
/// Root lists (servers, stacks, deployments) are snapshot-refreshed on
/// the caller's cadence. `list_stack_services` is only ever invoked
/// for stacks whose service source is active (rendered and expanded) —
/// the gating lives in [`ServiceSource`](crate::source::ServiceSource),
/// not behind a parameter here.
#[async_trait]
pub trait FleetApi: Send + Sync {
    /// Servers, pre-filtered server-side by tag membership. An empty
    /// `tags` slice lists the whole fleet.
    async fn list_servers(&self, tags: &[String]) -> Result<Vec<Server>, ApiError>;

    async fn list_stacks(&self) -> Result<Vec<Stack>, ApiError>;

    async fn list_deployments(&self) -> Result<Vec<Deployment>, ApiError>;

    /// Current services of one stack, with embedded container state.
    async fn list_stack_services(&self, stack_id: &str) -> Result<Vec<Service>, ApiError>;
}

/// `FleetApi` over the fleet's `GET /v1/...` JSON endpoints.
pub struct HttpFleetApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFleetApi {
    /// Build a client for `addr` (`host:port` or a full URL).
    pub fn new(addr: &str) -> Self {
        let base_url = normalize_base_url(addr);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { base_url, client }
    }

    /// Base URL including scheme, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T, ApiError> {
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status()));
        }
        Ok(resp.json::<T>().await?)
    }
}

#[async_trait]
impl FleetApi for HttpFleetApi {
    async fn list_servers(&self, tags: &[String]) -> Result<Vec<Server>, ApiError> {
        self.get_json(servers_url(&self.base_url, tags)).await
    }

    async fn list_stacks(&self) -> Result<Vec<Stack>, ApiError> {
        self.get_json(format!("{}/v1/stacks", self.base_url)).await
    }

    async fn list_deployments(&self) -> Result<Vec<Deployment>, ApiError> {
        self.get_json(format!("{}/v1/deployments", self.base_url))
            .await
    }

    async fn list_stack_services(&self, stack_id: &str) -> Result<Vec<Service>, ApiError> {
        self.get_json(format!(
            "{}/v1/stacks/{}/services",
            self.base_url,
            urlencoding::encode(stack_id)
        ))
        .await
    }
}

/// Prepend `http://` when `addr` carries no scheme; strip any trailing
/// slash so path joins stay predictable.
fn normalize_base_url(addr: &str) -> String {
    let with_scheme = if addr.starts_with("http://") || addr.starts_with("https://") {
        addr.to_string()
    } else {
        format!("http://{}", addr)
    };
    with_scheme.trim_end_matches('/').to_string()
}

fn servers_url(base_url: &str, tags: &[String]) -> String {
    if tags.is_empty() {
        format!("{}/v1/servers", base_url)
    } else {
        let joined = tags
            .iter()
            .map(|t| urlencoding::encode(t).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        format!("{}/v1/servers?tags={}", base_url, joined)
    }
}
