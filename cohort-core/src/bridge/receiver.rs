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

//! The probe-and-bridge cycle of the interactive rank.
//!
//! The interactive rank hosts a single-threaded, cooperative engine that
//! must stay responsive while reacting to asynchronous arrivals. A
//! dedicated one-shot task performs exactly one blocking probe, hands the
//! arrival over a channel to the engine's run loop, and terminates; after
//! the loop has dispatched the event it arms a fresh probe. At no point
//! are two probes outstanding, and events reach the engine strictly one at
//! a time in network-arrival order.
//!
//! The cycle ends in-band: a self-addressed zero-length stop notifier is
//! observed by the probe task, which consumes it and reports a halt
//! without queuing an engine event or re-arming.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;
use tracing::{error, instrument, trace, warn};

use crate::common::CONFIG;
use crate::dispatch::{DispatchContext, EventProcessor};
use crate::message::{Arrival, CohortError, Rank, Tag, INTERACTIVE_RANK};
use crate::traits::{EngineFlow, MessageBus, ScriptEngine};

/// One outcome of a one-shot probe task.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// A message is queued and ready to be received and dispatched.
    Arrival(Arrival),
    /// The stop notifier was observed and consumed; the cycle is over.
    Halted,
    /// The transport failed underneath the probe.
    Fault(CohortError),
}

/// Bridges asynchronous arrivals into the interactive rank's engine loop.
///
/// Construct one per process on the interactive rank, [`start`] it, and
/// drive [`run`] from the engine's thread of control. Stopping is done
/// through a [`ReceiverControl`] (or the node facade), which sends the
/// self-addressed stop notifier.
///
/// [`start`]: ReceiverBridge::start
/// [`run`]: ReceiverBridge::run
#[derive(Debug)]
pub struct ReceiverBridge {
    bus: Arc<dyn MessageBus>,
    processor: EventProcessor,
    outcomes: mpsc::Receiver<ProbeOutcome>,
    outcome_tx: mpsc::Sender<ProbeOutcome>,
    probes: TaskTracker,
    armed: Arc<AtomicBool>,
}

impl ReceiverBridge {
    /// Creates a bridge receiving over `bus` and dispatching through `ctx`.
    #[must_use]
    pub fn new(bus: Arc<dyn MessageBus>, ctx: Arc<DispatchContext>) -> Self {
        let capacity = CONFIG.limits.event_channel_capacity.max(1);
        let (outcome_tx, outcomes) = mpsc::channel(capacity);
        ReceiverBridge {
            processor: EventProcessor::new(Arc::clone(&bus), ctx),
            bus,
            outcomes,
            outcome_tx,
            probes: TaskTracker::new(),
            armed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A handle for stopping this bridge's cycle from elsewhere.
    #[must_use]
    pub fn control(&self) -> ReceiverControl {
        ReceiverControl {
            bus: Arc::clone(&self.bus),
        }
    }

    /// Arms the first one-shot probe.
    ///
    /// Arming while a probe is already outstanding is a caller error; the
    /// attempt is logged and refused, so the call is idempotent in effect.
    ///
    /// # Errors
    ///
    /// [`CohortError::RoleViolation`] when called from a captive rank.
    #[instrument(skip(self))]
    pub fn start(&self) -> Result<(), CohortError> {
        ensure_interactive(self.bus.rank(), "start the receiver")?;
        self.arm();
        Ok(())
    }

    fn arm(&self) {
        if self.armed.swap(true, Ordering::SeqCst) {
            warn!("a probe is already outstanding, refusing to arm another");
            return;
        }
        let bus = Arc::clone(&self.bus);
        let tx = self.outcome_tx.clone();
        let armed = Arc::clone(&self.armed);
        self.probes.spawn(async move {
            let outcome = match bus.probe(None, None).await {
                Ok(arrival) if arrival.tag == Tag::StopNotifier.wire() => {
                    let mut empty: [u8; 0] = [];
                    match bus
                        .recv_into(Some(arrival.source), Some(arrival.tag), &mut empty)
                        .await
                    {
                        Ok(_) => {
                            trace!("stop notifier consumed, ending the probe cycle");
                            ProbeOutcome::Halted
                        }
                        Err(err) => {
                            error!(%err, "failed to consume the stop notifier");
                            ProbeOutcome::Fault(err)
                        }
                    }
                }
                Ok(arrival) => ProbeOutcome::Arrival(arrival),
                Err(err) => {
                    error!(%err, "probe failed");
                    ProbeOutcome::Fault(err)
                }
            };
            armed.store(false, Ordering::SeqCst);
            if tx.send(outcome).await.is_err() {
                trace!("receiver loop is gone, outcome dropped");
            }
        });
    }

    /// Drives the bridged event loop on the engine's thread of control.
    ///
    /// Each iteration takes one probe outcome, dispatches the event through
    /// the [`EventProcessor`], and arms the next probe. The loop ends when
    /// the stop notifier halts the cycle or the engine requests shutdown;
    /// outstanding probe tasks are awaited before returning.
    ///
    /// # Errors
    ///
    /// Transport failures and engine evaluation errors propagate.
    #[instrument(skip(self, engine))]
    pub async fn run(&mut self, engine: &mut dyn ScriptEngine) -> anyhow::Result<()> {
        while let Some(outcome) = self.outcomes.recv().await {
            match outcome {
                ProbeOutcome::Arrival(arrival) => {
                    let flow = self.processor.process(engine, arrival).await?;
                    if flow == EngineFlow::Shutdown {
                        trace!("engine requested shutdown, leaving the receiver loop");
                        break;
                    }
                    self.arm();
                }
                ProbeOutcome::Halted => {
                    trace!("receiver cycle halted");
                    break;
                }
                ProbeOutcome::Fault(err) => return Err(err.into()),
            }
        }
        self.probes.close();
        self.probes.wait().await;
        Ok(())
    }
}

/// Handle for stopping a [`ReceiverBridge`] cycle.
///
/// Cloneable and detached from the bridge itself, so the engine's command
/// surface can stop the cycle while the run loop owns the bridge.
#[derive(Debug, Clone)]
pub struct ReceiverControl {
    bus: Arc<dyn MessageBus>,
}

impl ReceiverControl {
    /// Creates a control handle over `bus`.
    #[must_use]
    pub fn new(bus: Arc<dyn MessageBus>) -> Self {
        ReceiverControl { bus }
    }

    /// Sends the self-addressed stop notifier, ending the probe cycle.
    ///
    /// The notifier is delivered even while the cycle is idle: the
    /// outstanding probe observes it, consumes it and terminates without
    /// re-arming.
    ///
    /// # Errors
    ///
    /// [`CohortError::RoleViolation`] when called from a captive rank; no
    /// transport action is taken in that case.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<(), CohortError> {
        ensure_interactive(self.bus.rank(), "stop the receiver")?;
        self.bus
            .send(self.bus.rank(), Tag::StopNotifier.wire(), &[])
            .await
    }
}

fn ensure_interactive(rank: Rank, action: &str) -> Result<(), CohortError> {
    if rank != INTERACTIVE_RANK {
        return Err(CohortError::RoleViolation(format!(
            "only rank {INTERACTIVE_RANK} may {action}; this is rank {rank}"
        )));
    }
    Ok(())
}
