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

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{instrument, trace};

use crate::message::{CohortError, DataRecord, Rank, Tag};
use crate::traits::{DataSink, MessageBus};

/// Producer side of the pull protocol.
///
/// The distributor waits for pull requests and answers each one exactly
/// once, in arrival order. Consumers that have received data are tracked
/// until the end-of-data rundown has answered them; a rank that never
/// requests data is never tracked and receives nothing: this is a pull
/// protocol, not a push.
#[derive(Debug)]
pub struct PullDistributor {
    bus: Arc<dyn MessageBus>,
    consumers: HashSet<Rank>,
}

impl PullDistributor {
    /// Creates a distributor serving pull requests over `bus`.
    #[must_use]
    pub fn new(bus: Arc<dyn MessageBus>) -> Self {
        PullDistributor {
            bus,
            consumers: HashSet::new(),
        }
    }

    /// Number of consumers currently owed an end-of-data reply.
    #[must_use]
    pub fn tracked_consumers(&self) -> usize {
        self.consumers.len()
    }

    /// Waits for the next pull request and returns the requester's rank.
    ///
    /// Requests are zero-length by protocol; anything else on the bulk-data
    /// tag is a protocol violation surfaced as a transport failure by the
    /// sizing discipline.
    async fn next_request(&self) -> Result<Rank, CohortError> {
        let arrival = self.bus.probe(None, Some(Tag::BulkData.wire())).await?;
        let mut empty: [u8; 0] = [];
        self.bus
            .recv_into(Some(arrival.source), Some(arrival.tag), &mut empty)
            .await?;
        Ok(arrival.source)
    }

    /// Answers one pull request with `record` and starts tracking the
    /// requester.
    #[instrument(skip(self, record), fields(len = record.len()))]
    async fn distribute(&mut self, record: &DataRecord) -> Result<(), CohortError> {
        let requester = self.next_request().await?;
        self.bus
            .send(requester, Tag::BulkData.wire(), record.as_bytes())
            .await?;
        self.consumers.insert(requester);
        trace!(
            requester,
            tracked = self.consumers.len(),
            "record delivered"
        );
        Ok(())
    }

    /// Answers pending and late pull requests with zero-length end-of-data
    /// replies until no tracked consumer is owed one.
    ///
    /// Requesters that were never recorded before the end marker are
    /// drained the same way; the loop records only what passes through and
    /// stops once the tracked set is empty.
    #[instrument(skip(self), fields(tracked = self.consumers.len()))]
    async fn run_down(&mut self) -> Result<(), CohortError> {
        while !self.consumers.is_empty() {
            let requester = self.next_request().await?;
            self.bus.send(requester, Tag::BulkData.wire(), &[]).await?;
            self.consumers.remove(&requester);
            trace!(
                requester,
                remaining = self.consumers.len(),
                "end of data delivered"
            );
        }
        Ok(())
    }
}

#[async_trait]
impl DataSink for PullDistributor {
    /// Hands one record to the next requester, or, for the end-of-data
    /// sentinel, runs the rundown until every tracked consumer has been
    /// answered.
    async fn accept(&mut self, record: DataRecord) -> Result<(), CohortError> {
        if record.is_end_of_data() {
            self.run_down().await
        } else {
            self.distribute(&record).await
        }
    }
}
