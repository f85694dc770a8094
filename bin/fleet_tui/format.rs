/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Row label formatting for the overview tree.
//!
//! Labels are plain strings assembled here so the render layer stays a
//! dumb projection. State badges render as `[state]`; ports render as
//! `host:container` (`container` alone when unpublished) with a
//! `/proto` suffix for non-tcp protocols, truncated after three.

use fleet_overview::aggregate::ContainerNode;
use fleet_overview::aggregate::DeploymentNode;
use fleet_overview::aggregate::ServerNode;
use fleet_overview::aggregate::ServiceNode;
use fleet_overview::aggregate::StackNode;
use fleet_overview::model::PortMapping;

/// How many port mappings to show before eliding.
const MAX_PORTS_SHOWN: usize = 3;

pub(crate) fn server_label(server: &ServerNode) -> String {
    match format_tags(&server.tags) {
        Some(tags) => format!("{}  {}", server.name, tags),
        None => server.name.clone(),
    }
}

pub(crate) fn stack_label(stack: &StackNode) -> String {
    let mut label = stack.name.clone();
    if !stack.state.is_empty() {
        label.push_str(&format!("  [{}]", stack.state));
    }
    if let Some(tags) = format_tags(&stack.tags) {
        label.push_str(&format!("  {}", tags));
    }
    label
}

pub(crate) fn deployment_label(deployment: &DeploymentNode) -> String {
    let mut label = deployment.name.clone();
    if !deployment.state.is_empty() {
        label.push_str(&format!("  [{}]", deployment.state));
    }
    if let Some(tags) = format_tags(&deployment.tags) {
        label.push_str(&format!("  {}", tags));
    }
    label
}

/// Service rows carry the embedded container's state badge even while
/// the container row itself is collapsed.
pub(crate) fn service_label(service: &ServiceNode) -> String {
    match &service.container {
        Some(container) if !container.state.is_empty() => {
            format!("{}  [{}]", service.name, container.state)
        }
        _ => service.name.clone(),
    }
}

pub(crate) fn container_label(container: &ContainerNode) -> String {
    let mut label = container.name.clone();
    if !container.state.is_empty() {
        label.push_str(&format!("  [{}]", container.state));
    }
    if let Some(ports) = format_ports(&container.ports) {
        label.push_str(&format!("  {}", ports));
    }
    label
}

/// `#tag1 #tag2`, or `None` when there are no tags.
fn format_tags(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    Some(
        tags.iter()
            .map(|t| format!("#{}", t))
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// First three port mappings, `+N more` for the rest.
fn format_ports(ports: &[PortMapping]) -> Option<String> {
    if ports.is_empty() {
        return None;
    }
    let mut shown: Vec<String> = ports.iter().take(MAX_PORTS_SHOWN).map(format_port).collect();
    if ports.len() > MAX_PORTS_SHOWN {
        shown.push(format!("+{} more", ports.len() - MAX_PORTS_SHOWN));
    }
    Some(shown.join(", "))
}

fn format_port(port: &PortMapping) -> String {
    let mut s = match port.host_port {
        Some(host) => format!("{}:{}", host, port.container_port),
        None => format!("{}", port.container_port),
    };
    if port.protocol != "tcp" {
        s.push_str(&format!("/{}", port.protocol));
    }
    s
}
