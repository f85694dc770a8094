/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Read-only entity snapshots for the fleet hierarchy.
//!
//! Server → (Stack | Deployment) → Service → Container. All types are
//! plain data decoded from the fleet API; the aggregation core never
//! mutates them. Each searchable kind projects its own fields via
//! [`Searchable`] so the filter stays kind-aware without runtime type
//! inspection.

use serde::Deserialize;

/// A host machine; root of the hierarchy.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    /// Opaque identifier, unique fleet-wide.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Tag identifiers attached to this server.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A compose stack deployed on a server. Parent of services.
#[derive(Debug, Clone, Deserialize)]
pub struct Stack {
    pub id: String,
    pub name: String,
    /// Identifier of the owning [`Server`]. Stacks referencing an
    /// unknown server are silently excluded from the tree.
    pub server_id: String,
    /// Raw lifecycle state string (e.g. `"running"`, `"down"`).
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A single-container deployment on a server. Sibling-level to
/// [`Stack`] but a leaf in this view.
#[derive(Debug, Clone, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub name: String,
    /// Identifier of the owning [`Server`]; orphans are excluded.
    pub server_id: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One service within a stack.
///
/// The service name is unique only within its owning stack; the
/// composite key from [`service_key`] is the fleet-wide addressable
/// identity used for expansion tracking.
#[derive(Debug, Clone, Deserialize)]
pub struct Service {
    /// Service name, scoped to the owning stack.
    pub name: String,
    /// The live container backing this service, if any. Embedded in
    /// the service payload, never independently fetched.
    #[serde(default)]
    pub container: Option<Container>,
}

/// The container backing a service.
#[derive(Debug, Clone, Deserialize)]
pub struct Container {
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub network: Option<ContainerNetwork>,
}

/// Network descriptor of a container: an ordered list of port
/// mappings.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerNetwork {
    #[serde(default)]
    pub ports: Vec<PortMapping>,
}

/// One published port of a container.
#[derive(Debug, Clone, Deserialize)]
pub struct PortMapping {
    pub container_port: u16,
    #[serde(default)]
    pub host_port: Option<u16>,
    /// Transport protocol, usually `"tcp"` or `"udp"`.
    #[serde(default = "default_protocol")]
    pub protocol: String,
}

fn default_protocol() -> String {
    "tcp".to_string()
}

/// Closed classification of a tree node, used for rendering dispatch
/// and for routing toggle events to the right expansion store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Server,
    Stack,
    Deployment,
    Service,
    Container,
}

impl NodeKind {
    /// Short human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Server => "server",
            NodeKind::Stack => "stack",
            NodeKind::Deployment => "deployment",
            NodeKind::Service => "service",
            NodeKind::Container => "container",
        }
    }
}

/// Composite expansion key for a service.
///
/// Service names repeat across stacks, so expansion is tracked under
/// `"{stack_id}-{service_name}"`.
pub fn service_key(stack_id: &str, service_name: &str) -> String {
    format!("{}-{}", stack_id, service_name)
}

/// Projection of an entity onto its searchable fields.
///
/// Each kind decides which of its fields participate in free-text
/// matching; absent fields surface as `None` and are skipped by the
/// filter rather than treated as errors.
pub trait Searchable {
    fn search_fields(&self) -> Vec<Option<&str>>;
}

impl Searchable for Server {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.name.as_str())]
    }
}

impl Searchable for Stack {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.name.as_str())]
    }
}

impl Searchable for Deployment {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.name.as_str())]
    }
}

impl Searchable for Service {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            self.container.as_ref().map(|c| c.name.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Composite keys disambiguate identically-named services across stacks.
    #[test]
    fn service_key_scopes_by_stack() {
        assert_eq!(service_key("web-1", "db"), "web-1-db");
        assert_ne!(service_key("web-1", "db"), service_key("web-2", "db"));
    }

    // A service without a container projects None for the container field.
    #[test]
    fn service_search_fields_tolerate_missing_container() {
        let svc = Service {
            name: "api".to_string(),
            container: None,
        };
        assert_eq!(svc.search_fields(), vec![Some("api"), None]);
    }

    // Port mappings default the protocol to tcp when the payload omits it.
    #[test]
    fn port_mapping_defaults_protocol() {
        let port: PortMapping = serde_json::from_str(r#"{"container_port": 80}"#).unwrap();
        assert_eq!(port.protocol, "tcp");
        assert_eq!(port.host_port, None);
    }
}
