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

use tracing::{instrument, trace, warn};

use crate::dispatch::DispatchContext;
use crate::message::{decode_text, Arrival, CohortError, Tag};
use crate::traits::{EngineFlow, MessageBus, ScriptEngine};

/// Dispatches one received message into the engine according to its tag.
///
/// Scripts are evaluated at global scope; structured data goes to the
/// registered handler with `(source, payload)` or is silently discarded;
/// bulk data goes to the registered binary callback or is discarded; a
/// message with an unrecognized tag is logged and discarded, never fatal.
#[derive(Debug)]
pub struct EventProcessor {
    bus: Arc<dyn MessageBus>,
    ctx: Arc<DispatchContext>,
}

impl EventProcessor {
    /// Creates a processor receiving over `bus` and consulting `ctx` for
    /// handler registrations.
    #[must_use]
    pub fn new(bus: Arc<dyn MessageBus>, ctx: Arc<DispatchContext>) -> Self {
        EventProcessor { bus, ctx }
    }

    pub(crate) fn bus(&self) -> &Arc<dyn MessageBus> {
        &self.bus
    }

    /// Receives the probed message described by `arrival` and dispatches
    /// it.
    ///
    /// # Errors
    ///
    /// Transport failures and engine evaluation errors propagate; payload
    /// problems (unrecognized tag, non-text script payload) are logged and
    /// the message is discarded.
    #[instrument(
        skip(self, engine),
        fields(source = arrival.source, tag = arrival.tag, len = arrival.len)
    )]
    pub async fn process(
        &self,
        engine: &mut dyn ScriptEngine,
        arrival: Arrival,
    ) -> anyhow::Result<EngineFlow> {
        let mut payload = vec![0u8; arrival.len];
        self.bus
            .recv_into(Some(arrival.source), Some(arrival.tag), &mut payload)
            .await?;

        match Tag::from_wire(arrival.tag) {
            Ok(Tag::Script) => match decode_text(&payload) {
                Ok(script) => engine.eval_global(script),
                Err(err) => {
                    warn!(%err, "script payload is not text, discarding");
                    Ok(EngineFlow::Continue)
                }
            },
            Ok(Tag::StructuredData) => {
                let Some(handler) = self.ctx.handler() else {
                    trace!("no structured-data handler registered, discarding");
                    return Ok(EngineFlow::Continue);
                };
                match decode_text(&payload) {
                    Ok(text) => engine.invoke_handler(&handler, arrival.source, text),
                    Err(err) => {
                        warn!(%err, "structured payload is not text, discarding");
                        Ok(EngineFlow::Continue)
                    }
                }
            }
            Ok(Tag::BulkData) => {
                if let Some(handler) = self.ctx.binary_handler() {
                    handler(arrival.source, &payload);
                } else {
                    trace!(len = arrival.len, "no binary handler registered, discarding");
                }
                Ok(EngineFlow::Continue)
            }
            Ok(Tag::StopNotifier) => {
                // The bridge consumes stop notifiers before they reach the
                // processor; one seen here is outside its cycle.
                trace!("stop notifier outside the receiver bridge, ignoring");
                Ok(EngineFlow::Continue)
            }
            Err(err @ CohortError::UnrecognizedTag(_)) => {
                warn!(%err, source = arrival.source, "message discarded");
                Ok(EngineFlow::Continue)
            }
            Err(err) => Err(err.into()),
        }
    }
}
