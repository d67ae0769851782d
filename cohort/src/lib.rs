/*
 * Copyright (c) 2025. Cohort Contributors
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

#![forbid(unsafe_code)]

//! # Cohort
//!
//! Cohort coordinates a fixed-size group of cooperating processes
//! ("ranks") that each host a single-threaded, cooperative script engine.
//! Rank 0 is interactive; the other ranks are captive workers. The crate
//! moves control scripts, structured data and bulk binary payloads
//! between ranks without ever blocking the interactive engine's event
//! loop.
//!
//! ## Key Concepts
//!
//! - **Node (`CohortNode`)**: the per-process command surface: group
//!   queries, `execute`/`send` with fan-out destinations, handler
//!   registration, receiver lifecycle, and the pull-protocol roles.
//! - **Destinations**: `all` (every rank, the caller strictly last),
//!   `others` (every rank but the caller) or one explicit rank;
//!   self-addressed traffic never traverses the bus.
//! - **Receiver bridge (`ReceiverBridge`)**: one-shot background probes
//!   hand arrivals to the interactive engine's run loop one at a time, in
//!   arrival order; a self-addressed stop notifier ends the cycle.
//! - **Pull distribution (`PullDistributor` / `PullGetter`)**: consumers
//!   request bulk records one at a time; a zero-length reply means the
//!   data is exhausted, and the distributor runs down every outstanding
//!   requester before finishing.
//! - **Collaborators**: the script engine (`ScriptEngine`) and the
//!   analysis data roles (`DataSource` / `DataSink`) are supplied by the
//!   embedding application and addressed only through their traits.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cohort::prelude::*;
//!
//! let cluster = LocalCluster::launch(3);
//! let node = cluster.node(0);
//! node.execute(&mut engine, Destination::All, "init").await?;
//! ```

/// Runtime facade and the local cluster launcher.
pub(crate) mod common;

/// Tracing bootstrap for embedding applications.
pub mod telemetry;

/// A prelude module for conveniently importing the most commonly used
/// items.
///
/// Re-exports the whole `cohort-core` prelude (message vocabulary,
/// transport, dispatch, bridge and distribution types) together with this
/// crate's [`CohortNode`](crate::common::CohortNode) facade and
/// [`LocalCluster`](crate::common::LocalCluster) launcher.
pub mod prelude {
    pub use cohort_core::prelude::*;

    pub use crate::common::{CohortNode, LocalCluster};
}
