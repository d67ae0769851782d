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

//! In-process transport connecting a fixed-size group of ranks.
//!
//! Each rank owns one inbox; sends append to the destination's inbox and
//! wake its waiters. Probes scan in arrival order without consuming, which
//! preserves send order between any fixed (source, destination, tag)
//! triple.

use std::collections::VecDeque;
use std::pin::pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Notify;
use tracing::{trace, warn};

use crate::common::CONFIG;
use crate::message::{Arrival, CohortError, Rank, WireTag};
use crate::traits::MessageBus;

/// Statistics for a [`MemoryFabric`].
#[derive(Debug, Default)]
pub struct FabricStats {
    /// Total messages accepted for delivery.
    messages_sent: AtomicUsize,
    /// Total messages consumed by receivers.
    messages_delivered: AtomicUsize,
    /// Total probes answered.
    probes_served: AtomicUsize,
}

impl FabricStats {
    /// Number of messages accepted for delivery.
    #[must_use]
    pub fn messages_sent(&self) -> usize {
        self.messages_sent.load(Ordering::Relaxed)
    }

    /// Number of messages consumed by receivers.
    #[must_use]
    pub fn messages_delivered(&self) -> usize {
        self.messages_delivered.load(Ordering::Relaxed)
    }

    /// Number of probes answered.
    #[must_use]
    pub fn probes_served(&self) -> usize {
        self.probes_served.load(Ordering::Relaxed)
    }
}

/// One queued message.
#[derive(Debug)]
struct Packet {
    source: Rank,
    tag: WireTag,
    payload: Vec<u8>,
}

impl Packet {
    fn matches(&self, source: Option<Rank>, tag: Option<WireTag>) -> bool {
        source.map_or(true, |s| s == self.source) && tag.map_or(true, |t| t == self.tag)
    }

    fn arrival(&self) -> Arrival {
        Arrival {
            source: self.source,
            tag: self.tag,
            len: self.payload.len(),
        }
    }
}

#[derive(Debug, Default)]
struct RankInbox {
    queue: Mutex<VecDeque<Packet>>,
    arrived: Notify,
}

#[derive(Debug)]
struct FabricInner {
    inboxes: Vec<RankInbox>,
    stats: Arc<FabricStats>,
}

/// In-process transport shared by every rank of a local group.
///
/// The fabric is cheap to clone; [`endpoint`] hands out one
/// [`MemoryBus`] per rank. Message queues are unbounded (a send always
/// succeeds immediately), but a destination whose backlog crosses the
/// configured threshold logs a warning.
///
/// [`endpoint`]: MemoryFabric::endpoint
#[derive(Debug, Clone)]
pub struct MemoryFabric {
    inner: Arc<FabricInner>,
}

impl MemoryFabric {
    /// Creates a fabric for a group of `group_size` ranks.
    ///
    /// # Panics
    ///
    /// Panics if `group_size` is zero.
    #[must_use]
    pub fn new(group_size: usize) -> Self {
        assert!(group_size > 0, "a group must contain at least one rank");
        MemoryFabric {
            inner: Arc::new(FabricInner {
                inboxes: (0..group_size).map(|_| RankInbox::default()).collect(),
                stats: Arc::new(FabricStats::default()),
            }),
        }
    }

    /// Fixed number of ranks in the group.
    #[must_use]
    pub fn group_size(&self) -> usize {
        self.inner.inboxes.len()
    }

    /// Shared statistics counters for this fabric.
    #[must_use]
    pub fn stats(&self) -> Arc<FabricStats> {
        Arc::clone(&self.inner.stats)
    }

    /// Number of undelivered messages currently queued for `rank`.
    #[must_use]
    pub fn pending(&self, rank: Rank) -> usize {
        self.inner
            .inboxes
            .get(rank)
            .map_or(0, |inbox| lock_queue(inbox).map_or(0, |queue| queue.len()))
    }

    /// The endpoint through which `rank` sends and receives.
    ///
    /// # Panics
    ///
    /// Panics if `rank` is outside the group.
    #[must_use]
    pub fn endpoint(&self, rank: Rank) -> MemoryBus {
        assert!(rank < self.group_size(), "rank {rank} is outside the group");
        MemoryBus {
            inner: Arc::clone(&self.inner),
            rank,
        }
    }
}

fn lock_queue(inbox: &RankInbox) -> Result<MutexGuard<'_, VecDeque<Packet>>, CohortError> {
    inbox
        .queue
        .lock()
        .map_err(|_| CohortError::TransportFailure("inbox mutex poisoned".to_string()))
}

impl FabricInner {
    fn inbox(&self, rank: Rank) -> Result<&RankInbox, CohortError> {
        self.inboxes
            .get(rank)
            .ok_or_else(|| CohortError::TransportFailure(format!("no inbox for rank {rank}")))
    }

    fn deliver(
        &self,
        source: Rank,
        dest: Rank,
        tag: WireTag,
        payload: &[u8],
    ) -> Result<(), CohortError> {
        let inbox = self.inbox(dest)?;
        let depth = {
            let mut queue = lock_queue(inbox)?;
            queue.push_back(Packet {
                source,
                tag,
                payload: payload.to_vec(),
            });
            queue.len()
        };
        self.stats.messages_sent.fetch_add(1, Ordering::Relaxed);
        if depth > CONFIG.limits.backlog_warn_threshold {
            warn!(dest, depth, "destination inbox backlog is growing");
        }
        inbox.arrived.notify_waiters();
        Ok(())
    }

    /// Waits until a message matching the selectors is queued for `rank`
    /// and describes it without consuming it.
    async fn probe_at(
        &self,
        rank: Rank,
        source: Option<Rank>,
        tag: Option<WireTag>,
    ) -> Result<Arrival, CohortError> {
        let inbox = self.inbox(rank)?;
        loop {
            // Register for a wakeup before scanning so a send between the
            // scan and the await is not lost.
            let mut notified = pin!(inbox.arrived.notified());
            notified.as_mut().enable();
            {
                let queue = lock_queue(inbox)?;
                if let Some(packet) = queue.iter().find(|p| p.matches(source, tag)) {
                    self.stats.probes_served.fetch_add(1, Ordering::Relaxed);
                    return Ok(packet.arrival());
                }
            }
            notified.await;
        }
    }

    /// Waits for the first message matching the selectors and consumes it
    /// into `buf`, which must be exactly the message's size.
    async fn recv_at(
        &self,
        rank: Rank,
        source: Option<Rank>,
        tag: Option<WireTag>,
        buf: &mut [u8],
    ) -> Result<Arrival, CohortError> {
        let inbox = self.inbox(rank)?;
        loop {
            let mut notified = pin!(inbox.arrived.notified());
            notified.as_mut().enable();
            {
                let mut queue = lock_queue(inbox)?;
                if let Some(index) = queue.iter().position(|p| p.matches(source, tag)) {
                    let arrival = queue[index].arrival();
                    if arrival.len != buf.len() {
                        return Err(CohortError::TransportFailure(format!(
                            "receive buffer is {} bytes but the queued message is {} bytes",
                            buf.len(),
                            arrival.len
                        )));
                    }
                    let packet = queue
                        .remove(index)
                        .expect("scanned index is in range under the same lock");
                    buf.copy_from_slice(&packet.payload);
                    self.stats.messages_delivered.fetch_add(1, Ordering::Relaxed);
                    trace!(
                        rank,
                        source = arrival.source,
                        tag = arrival.tag,
                        len = arrival.len,
                        "message delivered"
                    );
                    return Ok(arrival);
                }
            }
            notified.await;
        }
    }
}

/// One rank's endpoint on a [`MemoryFabric`].
#[derive(Debug, Clone)]
pub struct MemoryBus {
    inner: Arc<FabricInner>,
    rank: Rank,
}

#[async_trait::async_trait]
impl MessageBus for MemoryBus {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn group_size(&self) -> usize {
        self.inner.inboxes.len()
    }

    async fn send(&self, dest: Rank, tag: WireTag, payload: &[u8]) -> Result<(), CohortError> {
        self.inner.deliver(self.rank, dest, tag, payload)
    }

    async fn probe(
        &self,
        source: Option<Rank>,
        tag: Option<WireTag>,
    ) -> Result<Arrival, CohortError> {
        self.inner.probe_at(self.rank, source, tag).await
    }

    async fn recv_into(
        &self,
        source: Option<Rank>,
        tag: Option<WireTag>,
        buf: &mut [u8],
    ) -> Result<Arrival, CohortError> {
        self.inner.recv_at(self.rank, source, tag, buf).await
    }
}
