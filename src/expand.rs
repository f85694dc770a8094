/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Expansion state, one independent store per toggleable node kind.
//!
//! Never share a single set across kinds: server, stack, and service
//! identifiers come from different namespaces and would collide.
//! Services are keyed by the composite
//! [`service_key`](crate::model::service_key) string.

use std::collections::HashSet;

/// Set of expanded node identifiers for one node kind.
///
/// `toggle` is self-inverse: applying it twice with the same id
/// restores the original state. No bound on size, no eviction — the
/// caller controls scope.
#[derive(Debug, Default, Clone)]
pub struct ExpansionStore {
    expanded: HashSet<String>,
}

impl ExpansionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is currently expanded.
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Flip the expansion state of `id`. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
            true
        } else {
            false
        }
    }

    /// Collapse everything tracked by this store.
    pub fn clear(&mut self) {
        self.expanded.clear();
    }
}

/// The three per-kind stores: servers, stacks, services.
///
/// Deployments and containers are leaves in this view and carry no
/// expansion state.
#[derive(Debug, Default, Clone)]
pub struct ExpansionState {
    pub servers: ExpansionStore,
    pub stacks: ExpansionStore,
    pub services: ExpansionStore,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapse all nodes of every kind.
    pub fn collapse_all(&mut self) {
        self.servers.clear();
        self.stacks.clear();
        self.services.clear();
    }
}
