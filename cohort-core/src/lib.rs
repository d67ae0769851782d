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
//! Cohort Core Library
//!
//! This library provides the messaging and distribution layer for the Cohort
//! framework: the tagged message bus, rank dispatch with fan-out
//! destinations, the background receiver bridge for the interactive rank,
//! and the pull-based bulk-data protocol between one distributor and many
//! getters.

/// Background receiver bridge and the captive foreground loop.
pub(crate) mod bridge;
/// Configuration shared across the framework.
pub(crate) mod common;
pub(crate) mod dispatch;
pub(crate) mod distribution;
pub(crate) mod message;
pub(crate) mod transport;
/// Trait definitions used at the seams of the Cohort framework.
pub(crate) mod traits;

/// Prelude module for convenient imports.
///
/// Re-exports the commonly used items from the message, transport, dispatch,
/// bridge and distribution modules, as well as the `async_trait` macro used
/// by the collaborator traits.
pub mod prelude {
    pub use async_trait::async_trait;

    pub use crate::bridge::{run_captive, ProbeOutcome, ReceiverBridge, ReceiverControl};
    pub use crate::common::{CohortConfig, CONFIG};
    pub use crate::dispatch::{
        BinaryHandler, Destination, DispatchContext, EventProcessor, RankDispatcher,
    };
    pub use crate::distribution::{pump, PullDistributor, PullGetter};
    pub use crate::message::{
        decode_text, encode_text, Arrival, CohortError, DataRecord, Rank, Tag, WireTag,
        INTERACTIVE_RANK,
    };
    pub use crate::traits::{DataSink, DataSource, EngineFlow, MessageBus, ScriptEngine};
    pub use crate::transport::{FabricStats, MemoryBus, MemoryFabric};
}
