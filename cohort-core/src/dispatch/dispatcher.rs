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

use std::str::FromStr;
use std::sync::Arc;

use tracing::{instrument, trace};

use crate::dispatch::DispatchContext;
use crate::message::{encode_text, CohortError, Rank, Tag};
use crate::traits::{EngineFlow, MessageBus, ScriptEngine};

/// Logical target of an `execute` or `send` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Every rank, the caller included; the caller is always served last.
    All,
    /// Every rank except the caller.
    Others,
    /// One explicit rank, which may be the caller itself.
    Rank(Rank),
}

impl FromStr for Destination {
    type Err = CohortError;

    /// Parses the command-surface form of a destination: `all`, `others`,
    /// or a decimal rank.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Destination::All),
            "others" => Ok(Destination::Others),
            other => other.parse::<Rank>().map(Destination::Rank).map_err(|_| {
                CohortError::InvalidDestination(format!(
                    "`{other}` is not `all`, `others` or a rank number"
                ))
            }),
        }
    }
}

/// Implements `execute`/`send` fan-out semantics on top of the message bus.
///
/// Scripts and structured data addressed to the caller's own rank never
/// traverse the bus: they are evaluated or delivered locally instead, and
/// with [`Destination::All`] the local delivery happens strictly after
/// every remote send has been issued. A script that ends the whole
/// computation is therefore observed locally only once every peer already
/// holds its copy.
#[derive(Debug, Clone)]
pub struct RankDispatcher {
    bus: Arc<dyn MessageBus>,
    ctx: Arc<DispatchContext>,
}

impl RankDispatcher {
    /// Creates a dispatcher over `bus`, consulting `ctx` for local
    /// structured-data delivery.
    #[must_use]
    pub fn new(bus: Arc<dyn MessageBus>, ctx: Arc<DispatchContext>) -> Self {
        RankDispatcher { bus, ctx }
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

    fn check_rank(&self, rank: Rank) -> Result<(), CohortError> {
        if rank >= self.bus.group_size() {
            return Err(CohortError::InvalidDestination(format!(
                "rank {rank} is outside the group of {}",
                self.bus.group_size()
            )));
        }
        Ok(())
    }

    /// Ranks of every peer, excluding the caller.
    fn peers(&self) -> impl Iterator<Item = Rank> + '_ {
        let me = self.bus.rank();
        (0..self.bus.group_size()).filter(move |&rank| rank != me)
    }

    /// Causes exactly one evaluation of `script` on every engine named by
    /// `dest`.
    ///
    /// # Errors
    ///
    /// [`CohortError::InvalidDestination`] for an out-of-range numeric
    /// destination (nothing is sent), or a transport failure.
    #[instrument(skip(self, engine, script), fields(rank = self.bus.rank()))]
    pub async fn execute(
        &self,
        engine: &mut dyn ScriptEngine,
        dest: Destination,
        script: &str,
    ) -> anyhow::Result<EngineFlow> {
        let payload = encode_text(script);
        match dest {
            Destination::All => {
                for peer in self.peers() {
                    self.bus.send(peer, Tag::Script.wire(), &payload).await?;
                }
                trace!("evaluating locally after the fan-out");
                engine.eval_global(script)
            }
            Destination::Others => {
                for peer in self.peers() {
                    self.bus.send(peer, Tag::Script.wire(), &payload).await?;
                }
                Ok(EngineFlow::Continue)
            }
            Destination::Rank(rank) => {
                self.check_rank(rank)?;
                if rank == self.bus.rank() {
                    engine.eval_global(script)
                } else {
                    self.bus.send(rank, Tag::Script.wire(), &payload).await?;
                    Ok(EngineFlow::Continue)
                }
            }
        }
    }

    /// Delivers structured data to every rank named by `dest`.
    ///
    /// At each destination the data reaches the registered handler, or is
    /// silently discarded when none is registered. The caller's own
    /// delivery never traverses the bus and is always served last.
    ///
    /// # Errors
    ///
    /// [`CohortError::InvalidDestination`] for an out-of-range numeric
    /// destination (nothing is sent), or a transport failure.
    #[instrument(skip(self, engine, data), fields(rank = self.bus.rank()))]
    pub async fn send(
        &self,
        engine: &mut dyn ScriptEngine,
        dest: Destination,
        data: &str,
    ) -> anyhow::Result<EngineFlow> {
        let payload = encode_text(data);
        match dest {
            Destination::All => {
                for peer in self.peers() {
                    self.bus
                        .send(peer, Tag::StructuredData.wire(), &payload)
                        .await?;
                }
                self.deliver_local(engine, data)
            }
            Destination::Others => {
                for peer in self.peers() {
                    self.bus
                        .send(peer, Tag::StructuredData.wire(), &payload)
                        .await?;
                }
                Ok(EngineFlow::Continue)
            }
            Destination::Rank(rank) => {
                self.check_rank(rank)?;
                if rank == self.bus.rank() {
                    self.deliver_local(engine, data)
                } else {
                    self.bus
                        .send(rank, Tag::StructuredData.wire(), &payload)
                        .await?;
                    Ok(EngineFlow::Continue)
                }
            }
        }
    }

    fn deliver_local(
        &self,
        engine: &mut dyn ScriptEngine,
        data: &str,
    ) -> anyhow::Result<EngineFlow> {
        match self.ctx.handler() {
            Some(handler) => engine.invoke_handler(&handler, self.bus.rank(), data),
            None => {
                trace!("no structured-data handler registered, local delivery discarded");
                Ok(EngineFlow::Continue)
            }
        }
    }
}
