/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! View binding: the mutation surface between the presentation layer
//! and the aggregation core.
//!
//! Owns the search term and the expansion stores. All mutations are
//! synchronous `&mut self` calls; a snapshot taken afterwards reflects
//! every mutation applied before it, so rapid toggles within one tick
//! are never lost. The aggregator reads this state, never writes it.

use crate::aggregate::build_tree;
use crate::aggregate::AggregatorInput;
use crate::aggregate::OverviewTree;
use crate::expand::ExpansionState;
use crate::model::Deployment;
use crate::model::NodeKind;
use crate::model::Server;
use crate::model::Stack;
use crate::source::ServiceSource;

/// UI-owned state behind the overview: search term plus per-kind
/// expansion.
#[derive(Debug, Default)]
pub struct OverviewView {
    query: String,
    expansion: ExpansionState,
}

impl OverviewView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current free-text filter.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the search term (one event per keystroke).
    pub fn on_search_change(&mut self, text: &str) {
        self.query = text.to_string();
    }

    /// Toggle expansion of a node.
    ///
    /// `id` is the entity id for servers and stacks, and the composite
    /// [`service_key`](crate::model::service_key) for services.
    /// Deployments and containers are leaves; toggling them is a
    /// no-op.
    pub fn on_toggle(&mut self, kind: NodeKind, id: &str) {
        match kind {
            NodeKind::Server => {
                self.expansion.servers.toggle(id);
            }
            NodeKind::Stack => {
                self.expansion.stacks.toggle(id);
            }
            NodeKind::Service => {
                self.expansion.services.toggle(id);
            }
            NodeKind::Deployment | NodeKind::Container => {}
        }
    }

    /// Collapse every node of every kind.
    pub fn collapse_all(&mut self) {
        self.expansion.collapse_all();
    }

    /// Run one aggregation pass over the current snapshots.
    pub fn snapshot(
        &self,
        servers: &[Server],
        stacks: &[Stack],
        deployments: &[Deployment],
        services: &ServiceSource,
    ) -> OverviewTree {
        build_tree(&AggregatorInput {
            servers,
            stacks,
            deployments,
            query: &self.query,
            expansion: &self.expansion,
            services,
        })
    }
}
