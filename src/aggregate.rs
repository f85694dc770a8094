/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The tree aggregator: one pure pass from entity snapshots to a
//! renderable overview tree.
//!
//! Invariants enforced here:
//! - **Filter cascade**: a parent is visible iff its own fields match
//!   the query OR any descendant within known data matches. Deployments
//!   and containers are leaves and match on themselves only.
//! - **Expansion gating**: children are materialized only under
//!   expanded parents, and [`OverviewTree::active_stacks`] names
//!   exactly the stacks whose service source may poll — visible,
//!   expanded, and under an expanded visible server. Collapsed or
//!   filtered-out branches never activate a source.
//! - **Affordance from data**: `has_*` flags reflect the filtered
//!   child count in known data, independent of expansion state. A
//!   stack whose services were never fetched reports no children yet.
//!   Embedded containers are the one exception to expansion gating:
//!   they ride along on their service node (the row shows container
//!   state while collapsed) and only the child row is gated.
//! - **Orphan exclusion**: stacks and deployments are reached only
//!   through their owning server; unknown `server_id`s drop out
//!   silently.
//! - **Order preservation**: upstream collection order is kept
//!   verbatim; the tree is stable whenever the inputs are.
//!
//! The pass allocates only the output snapshot and is cheap enough to
//! run on every keystroke and toggle.

use std::collections::HashSet;

use crate::expand::ExpansionState;
use crate::filter::matches_entity;
use crate::intent::container_intent;
use crate::intent::deployment_intent;
use crate::intent::stack_intent;
use crate::intent::Intent;
use crate::model::service_key;
use crate::model::Deployment;
use crate::model::PortMapping;
use crate::model::Server;
use crate::model::Service;
use crate::model::Stack;
use crate::source::ServiceSource;

/// Everything one aggregation pass reads. All borrows: the aggregator
/// owns nothing and mutates nothing.
pub struct AggregatorInput<'a> {
    pub servers: &'a [Server],
    pub stacks: &'a [Stack],
    pub deployments: &'a [Deployment],
    /// Free-text filter, cascaded through every level.
    pub query: &'a str,
    pub expansion: &'a ExpansionState,
    pub services: &'a ServiceSource,
}

/// Read-only nested snapshot of the visible hierarchy.
#[derive(Debug, Clone, Default)]
pub struct OverviewTree {
    pub servers: Vec<ServerNode>,
    /// Stacks whose service source must be polling: filtered-in,
    /// expanded, and rendered under an expanded server.
    pub active_stacks: HashSet<String>,
}

#[derive(Debug, Clone)]
pub struct ServerNode {
    pub id: String,
    pub name: String,
    pub tags: Vec<String>,
    pub expanded: bool,
    /// Whether any stack or deployment survived filtering; drives the
    /// expand affordance.
    pub has_children: bool,
    /// Populated only when `expanded`.
    pub stacks: Vec<StackNode>,
    pub deployments: Vec<DeploymentNode>,
}

#[derive(Debug, Clone)]
pub struct StackNode {
    pub id: String,
    pub name: String,
    pub state: String,
    pub intent: Intent,
    pub tags: Vec<String>,
    pub expanded: bool,
    /// Whether any known service survived filtering. False until the
    /// first fetch lands; the row stays toggleable regardless.
    pub has_services: bool,
    /// Populated only when `expanded`.
    pub services: Vec<ServiceNode>,
}

#[derive(Debug, Clone)]
pub struct DeploymentNode {
    pub id: String,
    pub name: String,
    pub state: String,
    pub intent: Intent,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ServiceNode {
    /// Composite `"{stack_id}-{service_name}"` expansion key.
    pub key: String,
    pub name: String,
    pub expanded: bool,
    pub has_container: bool,
    /// The embedded container, when one exists. Always carried (the
    /// service row shows its state even while collapsed); the
    /// presentation layer reveals the container as a child row only
    /// when `expanded`.
    pub container: Option<ContainerNode>,
}

#[derive(Debug, Clone)]
pub struct ContainerNode {
    pub name: String,
    pub state: String,
    pub intent: Intent,
    pub ports: Vec<PortMapping>,
}

/// Build the overview snapshot for the current inputs.
pub fn build_tree(input: &AggregatorInput<'_>) -> OverviewTree {
    let mut tree = OverviewTree::default();

    for server in input.servers {
        // Candidate children by owning-server match, upstream order.
        let stacks: Vec<&Stack> = input
            .stacks
            .iter()
            .filter(|s| s.server_id == server.id)
            .collect();
        let deployments: Vec<&Deployment> = input
            .deployments
            .iter()
            .filter(|d| d.server_id == server.id)
            .collect();

        // Per-stack filtered service lists from last-known data; also
        // decides stack visibility (self OR matching service).
        let visible_stacks: Vec<(&Stack, Vec<&Service>)> = stacks
            .into_iter()
            .filter_map(|stack| {
                let matching: Vec<&Service> = input
                    .services
                    .latest(&stack.id)
                    .unwrap_or_default()
                    .iter()
                    .filter(|svc| matches_entity(input.query, *svc))
                    .collect();
                if matches_entity(input.query, stack) || !matching.is_empty() {
                    Some((stack, matching))
                } else {
                    None
                }
            })
            .collect();

        let visible_deployments: Vec<&Deployment> = deployments
            .into_iter()
            .filter(|d| matches_entity(input.query, *d))
            .collect();

        let has_children = !visible_stacks.is_empty() || !visible_deployments.is_empty();
        if !matches_entity(input.query, server) && !has_children {
            continue;
        }

        let expanded = input.expansion.servers.is_expanded(&server.id);
        let mut node = ServerNode {
            id: server.id.clone(),
            name: server.name.clone(),
            tags: server.tags.clone(),
            expanded,
            has_children,
            stacks: Vec::new(),
            deployments: Vec::new(),
        };

        if expanded {
            for (stack, matching) in &visible_stacks {
                node.stacks
                    .push(build_stack(input, stack, matching, &mut tree.active_stacks));
            }
            for deployment in &visible_deployments {
                node.deployments.push(DeploymentNode {
                    id: deployment.id.clone(),
                    name: deployment.name.clone(),
                    state: deployment.state.clone(),
                    intent: deployment_intent(&deployment.state),
                    tags: deployment.tags.clone(),
                });
            }
        }

        tree.servers.push(node);
    }

    tree
}

/// Build one visible stack node under an expanded server, activating
/// its service source when the stack itself is expanded.
fn build_stack(
    input: &AggregatorInput<'_>,
    stack: &Stack,
    matching: &[&Service],
    active_stacks: &mut HashSet<String>,
) -> StackNode {
    let expanded = input.expansion.stacks.is_expanded(&stack.id);
    let mut node = StackNode {
        id: stack.id.clone(),
        name: stack.name.clone(),
        state: stack.state.clone(),
        intent: stack_intent(&stack.state),
        tags: stack.tags.clone(),
        expanded,
        has_services: !matching.is_empty(),
        services: Vec::new(),
    };

    if expanded {
        active_stacks.insert(stack.id.clone());
        for service in matching {
            let key = service_key(&stack.id, &service.name);
            let svc_expanded = input.expansion.services.is_expanded(&key);
            let container = service.container.as_ref().map(|c| ContainerNode {
                name: c.name.clone(),
                state: c.state.clone(),
                intent: container_intent(&c.state),
                ports: c
                    .network
                    .as_ref()
                    .map(|n| n.ports.clone())
                    .unwrap_or_default(),
            });
            node.services.push(ServiceNode {
                key,
                name: service.name.clone(),
                expanded: svc_expanded,
                has_container: service.container.is_some(),
                container,
            });
        }
    }

    node
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::model::Container;

    fn server(id: &str, name: &str, tags: &[&str]) -> Server {
        Server {
            id: id.to_string(),
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn stack(id: &str, name: &str, server_id: &str, state: &str) -> Stack {
        Stack {
            id: id.to_string(),
            name: name.to_string(),
            server_id: server_id.to_string(),
            state: state.to_string(),
            tags: Vec::new(),
        }
    }

    fn deployment(id: &str, name: &str, server_id: &str, state: &str) -> Deployment {
        Deployment {
            id: id.to_string(),
            name: name.to_string(),
            server_id: server_id.to_string(),
            state: state.to_string(),
            tags: Vec::new(),
        }
    }

    fn service(name: &str, container: Option<&str>) -> Service {
        Service {
            name: name.to_string(),
            container: container.map(|c| Container {
                name: c.to_string(),
                state: "running".to_string(),
                network: None,
            }),
        }
    }

    struct Fixture {
        servers: Vec<Server>,
        stacks: Vec<Stack>,
        deployments: Vec<Deployment>,
        expansion: ExpansionState,
        services: ServiceSource,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                servers: Vec::new(),
                stacks: Vec::new(),
                deployments: Vec::new(),
                expansion: ExpansionState::new(),
                services: ServiceSource::default(),
            }
        }

        fn build(&self, query: &str) -> OverviewTree {
            build_tree(&AggregatorInput {
                servers: &self.servers,
                stacks: &self.stacks,
                deployments: &self.deployments,
                query,
                expansion: &self.expansion,
                services: &self.services,
            })
        }
    }

    // A server with zero children still appears, with no expand affordance.
    #[test]
    fn childless_server_appears_without_affordance() {
        let mut fx = Fixture::new();
        fx.servers.push(server("s1", "lonely", &[]));
        let tree = fx.build("");
        assert_eq!(tree.servers.len(), 1);
        assert!(!tree.servers[0].has_children);
    }

    // Searching "front" surfaces web-1 via its stack; the deployment drops out.
    #[test]
    fn descendant_match_keeps_server_visible() {
        let mut fx = Fixture::new();
        fx.servers.push(server("web-1", "web-1", &["prod"]));
        fx.stacks.push(stack("st1", "frontend", "web-1", "running"));
        fx.deployments
            .push(deployment("d1", "backend-job", "web-1", "running"));

        let tree = fx.build("front");
        assert_eq!(tree.servers.len(), 1);
        assert!(tree.servers[0].has_children);

        // Expanding reveals only the matching stack.
        fx.expansion.servers.toggle("web-1");
        let tree = fx.build("front");
        assert_eq!(tree.servers[0].stacks.len(), 1);
        assert_eq!(tree.servers[0].stacks[0].name, "frontend");
        assert!(tree.servers[0].deployments.is_empty());
    }

    // A server matching neither itself nor any descendant is hidden.
    #[test]
    fn non_matching_server_is_hidden() {
        let mut fx = Fixture::new();
        fx.servers.push(server("s1", "alpha", &[]));
        fx.stacks.push(stack("st1", "logs", "s1", "running"));
        let tree = fx.build("zzz");
        assert!(tree.servers.is_empty());
    }

    // Stacks and deployments referencing unknown servers are silently excluded.
    #[test]
    fn orphans_are_excluded() {
        let mut fx = Fixture::new();
        fx.servers.push(server("s1", "web-1", &[]));
        fx.stacks.push(stack("st1", "frontend", "ghost", "running"));
        fx.deployments
            .push(deployment("d1", "job", "ghost", "running"));
        fx.expansion.servers.toggle("s1");

        let tree = fx.build("");
        assert_eq!(tree.servers.len(), 1);
        assert!(!tree.servers[0].has_children);
        assert!(tree.servers[0].stacks.is_empty());
        assert!(tree.servers[0].deployments.is_empty());
    }

    // Service data is requested only for stacks that are visible, expanded,
    // and under an expanded server.
    #[test]
    fn active_stacks_require_the_full_chain() {
        let mut fx = Fixture::new();
        fx.servers.push(server("s1", "web-1", &[]));
        fx.stacks.push(stack("st1", "frontend", "s1", "running"));

        // Stack expanded but server collapsed: branch not rendered, no
        // polling.
        fx.expansion.stacks.toggle("st1");
        assert!(fx.build("").active_stacks.is_empty());

        // Server expanded too: now active.
        fx.expansion.servers.toggle("s1");
        assert!(fx.build("").active_stacks.contains("st1"));

        // Filtered out: inactive again.
        assert!(fx.build("nomatch").active_stacks.is_empty());
    }

    // A collapsed stack materializes no services and does not poll.
    #[test]
    fn collapsed_stack_has_no_services_and_no_polling() {
        let mut fx = Fixture::new();
        fx.servers.push(server("s1", "web-1", &[]));
        fx.stacks.push(stack("st1", "frontend", "s1", "running"));
        fx.services
            .record("st1", Ok(vec![service("web", Some("web_1"))]), Instant::now());
        fx.expansion.servers.toggle("s1");

        let tree = fx.build("");
        let stack_node = &tree.servers[0].stacks[0];
        // Known data drives the affordance even while collapsed.
        assert!(stack_node.has_services);
        assert!(stack_node.services.is_empty());
        assert!(tree.active_stacks.is_empty());
    }

    // Expanding a service surfaces its container; the identically-named
    // service in another stack is unaffected.
    #[test]
    fn service_expansion_is_scoped_to_its_stack() {
        let mut fx = Fixture::new();
        fx.servers.push(server("s1", "web-1", &[]));
        fx.stacks.push(stack("a", "one", "s1", "running"));
        fx.stacks.push(stack("b", "two", "s1", "running"));
        let now = Instant::now();
        fx.services
            .record("a", Ok(vec![service("db", Some("db_a"))]), now);
        fx.services
            .record("b", Ok(vec![service("db", Some("db_b"))]), now);
        fx.expansion.servers.toggle("s1");
        fx.expansion.stacks.toggle("a");
        fx.expansion.stacks.toggle("b");
        fx.expansion.services.toggle(&service_key("a", "db"));

        let tree = fx.build("");
        let stacks = &tree.servers[0].stacks;
        let in_a = &stacks[0].services[0];
        let in_b = &stacks[1].services[0];
        assert!(in_a.expanded);
        assert_eq!(in_a.container.as_ref().unwrap().name, "db_a");
        assert!(!in_b.expanded);
        assert!(in_b.has_container);
        // Container data rides along either way; only the expanded
        // service reveals it as a child row.
        assert_eq!(in_b.container.as_ref().unwrap().name, "db_b");
    }

    // A stack with no fetched services yet shows no affordance but is
    // visible when it matches by name.
    #[test]
    fn unfetched_stack_shows_no_affordance() {
        let mut fx = Fixture::new();
        fx.servers.push(server("s1", "web-1", &[]));
        fx.stacks.push(stack("st1", "frontend", "s1", "running"));
        fx.expansion.servers.toggle("s1");

        let tree = fx.build("");
        let stack_node = &tree.servers[0].stacks[0];
        assert!(!stack_node.has_services);
    }

    // Upstream ordering is preserved, never re-sorted.
    #[test]
    fn upstream_order_is_preserved() {
        let mut fx = Fixture::new();
        fx.servers.push(server("s2", "zeta", &[]));
        fx.servers.push(server("s1", "alpha", &[]));
        fx.stacks.push(stack("st2", "z-stack", "s1", "running"));
        fx.stacks.push(stack("st1", "a-stack", "s1", "running"));
        fx.expansion.servers.toggle("s1");

        let tree = fx.build("");
        assert_eq!(tree.servers[0].name, "zeta");
        assert_eq!(tree.servers[1].name, "alpha");
        let stacks = &tree.servers[1].stacks;
        assert_eq!(stacks[0].name, "z-stack");
        assert_eq!(stacks[1].name, "a-stack");
    }

    // Severity flows through from raw states.
    #[test]
    fn intents_are_classified_per_kind() {
        let mut fx = Fixture::new();
        fx.servers.push(server("s1", "web-1", &[]));
        fx.stacks.push(stack("st1", "frontend", "s1", "down"));
        fx.deployments
            .push(deployment("d1", "job", "s1", "running"));
        fx.expansion.servers.toggle("s1");

        let tree = fx.build("");
        assert_eq!(tree.servers[0].stacks[0].intent, Intent::Critical);
        assert_eq!(tree.servers[0].deployments[0].intent, Intent::Good);
    }
}
