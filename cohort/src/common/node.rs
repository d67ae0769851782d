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

use std::sync::Arc;

use tracing::instrument;

use cohort_core::prelude::{
    run_captive, BinaryHandler, CohortError, Destination, DispatchContext, EngineFlow,
    EventProcessor, MessageBus, PullDistributor, PullGetter, Rank, RankDispatcher,
    ReceiverBridge, ReceiverControl, ScriptEngine, INTERACTIVE_RANK, CONFIG,
};

/// Per-process runtime facade exposing the command surface of the layer.
///
/// One node exists per rank. Clones share the same registration state, so
/// a handler installed through one clone is seen by the receive loops
/// driven through another.
///
/// The command surface matches what the engine layer binds: group
/// queries, `execute`/`send` with fan-out destinations, the three-mode
/// handler accessor, receiver lifecycle on the interactive rank, the
/// captive loop for workers, and the two pull-protocol roles.
#[derive(Debug, Clone)]
pub struct CohortNode {
    bus: Arc<dyn MessageBus>,
    ctx: Arc<DispatchContext>,
    dispatcher: RankDispatcher,
}

impl CohortNode {
    /// Creates the node for this process over its transport endpoint.
    #[must_use]
    pub fn new(bus: Arc<dyn MessageBus>) -> Self {
        let ctx = DispatchContext::new();
        let dispatcher = RankDispatcher::new(Arc::clone(&bus), Arc::clone(&ctx));
        CohortNode {
            bus,
            ctx,
            dispatcher,
        }
    }

    /// Rank of this process.
    #[must_use]
    pub fn rank(&self) -> Rank {
        self.bus.rank()
    }

    /// Fixed number of ranks in the group.
    #[must_use]
    pub fn group_size(&self) -> usize {
        self.bus.group_size()
    }

    /// Causes exactly one evaluation of `script` on every engine named by
    /// `dest`; with [`Destination::All`] the local evaluation is strictly
    /// last.
    pub async fn execute(
        &self,
        engine: &mut dyn ScriptEngine,
        dest: Destination,
        script: &str,
    ) -> anyhow::Result<EngineFlow> {
        self.dispatcher.execute(engine, dest, script).await
    }

    /// Delivers structured data to every rank named by `dest`; at each
    /// destination it reaches the registered handler or is silently
    /// discarded.
    pub async fn send(
        &self,
        engine: &mut dyn ScriptEngine,
        dest: Destination,
        data: &str,
    ) -> anyhow::Result<EngineFlow> {
        self.dispatcher.send(engine, dest, data).await
    }

    /// The currently registered structured-data handler script, if any.
    #[must_use]
    pub fn handler(&self) -> Option<String> {
        self.ctx.handler()
    }

    /// Installs, replaces or clears the structured-data handler; an empty
    /// script clears it.
    pub fn set_handler(&self, script: &str) {
        self.ctx.set_handler(script);
    }

    /// Installs the process-wide binary-data callback for bulk arrivals.
    pub fn set_binary_handler(&self, handler: BinaryHandler) {
        self.ctx.set_binary_handler(handler);
    }

    /// Creates the receiver bridge for the interactive rank.
    ///
    /// # Errors
    ///
    /// [`CohortError::RoleViolation`] on any other rank.
    #[instrument(skip(self))]
    pub fn receiver(&self) -> Result<ReceiverBridge, CohortError> {
        if self.rank() != INTERACTIVE_RANK {
            return Err(CohortError::RoleViolation(format!(
                "only rank {INTERACTIVE_RANK} hosts the receiver bridge; this is rank {}",
                self.rank()
            )));
        }
        Ok(ReceiverBridge::new(
            Arc::clone(&self.bus),
            Arc::clone(&self.ctx),
        ))
    }

    /// Stops the receiver bridge's probe cycle by sending the
    /// self-addressed stop notifier.
    ///
    /// # Errors
    ///
    /// [`CohortError::RoleViolation`] on any other rank; no transport
    /// action is taken in that case.
    pub async fn stop_receiver(&self) -> Result<(), CohortError> {
        ReceiverControl::new(Arc::clone(&self.bus)).stop().await
    }

    /// Runs the captive foreground loop of a worker rank: probe, dispatch,
    /// repeat, until an evaluated script asks the engine to shut down.
    pub async fn run_captive(&self, engine: &mut dyn ScriptEngine) -> anyhow::Result<()> {
        let processor = EventProcessor::new(Arc::clone(&self.bus), Arc::clone(&self.ctx));
        run_captive(&processor, engine).await
    }

    /// A pull-protocol data source reading from the configured distributor
    /// rank. Attach it as the engine's data source on worker ranks.
    #[must_use]
    pub fn pull_source(&self) -> PullGetter {
        self.pull_source_from(CONFIG.defaults.distributor_rank)
    }

    /// A pull-protocol data source reading from an explicit rank.
    #[must_use]
    pub fn pull_source_from(&self, distributor: Rank) -> PullGetter {
        PullGetter::new(Arc::clone(&self.bus), distributor)
    }

    /// A pull-protocol data sink distributing this rank's records to
    /// requesting consumers. Attach it as the analysis sink on the
    /// producer rank.
    #[must_use]
    pub fn pull_sink(&self) -> PullDistributor {
        PullDistributor::new(Arc::clone(&self.bus))
    }
}
