/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Hierarchical fleet overview core.
//!
//! Aggregates a four-level fleet hierarchy — Server → (Stack |
//! Deployment) → Service → Container — into a renderable tree
//! snapshot, with a single free-text filter cascading through every
//! level and expansion-gated polling of lazily-loaded children.
//!
//! # Design pillars
//!
//! 1. **Pure projection**: [`aggregate::build_tree`] recomputes the
//!    whole snapshot from read-only inputs on every keystroke/toggle;
//!    there is no incremental tree surgery to get wrong.
//! 2. **Per-kind expansion stores**: server, stack, and service
//!    expansion live in three independent sets
//!    ([`expand::ExpansionState`]); services are keyed by the
//!    composite `"{stack_id}-{service_name}"` string so
//!    identically-named services in different stacks never collide.
//! 3. **Cancellation as a function of state**: the service source
//!    ([`source::ServiceSource`]) reconciles its polling schedule
//!    against the aggregator's active set each tick. A collapsed or
//!    filtered-out stack simply stops being named, and its polling
//!    stops — no timer handles to leak.
//!
//! Failure states degrade to "show less": fetch failures retain the
//! last known value and log via `tracing`; orphaned entities drop out
//! silently; the core never raises a user-visible error.

pub mod aggregate;
pub mod client;
pub mod expand;
pub mod filter;
pub mod intent;
pub mod model;
pub mod source;
pub mod view;

pub use aggregate::build_tree;
pub use aggregate::AggregatorInput;
pub use aggregate::OverviewTree;
pub use client::ApiError;
pub use client::FleetApi;
pub use client::HttpFleetApi;
pub use expand::ExpansionState;
pub use expand::ExpansionStore;
pub use intent::classify_intent;
pub use intent::Intent;
pub use model::NodeKind;
pub use source::ServiceSource;
pub use source::SERVICE_POLL_INTERVAL;
pub use view::OverviewView;
