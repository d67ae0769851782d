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

use async_trait::async_trait;
use tracing::instrument;

use crate::message::{CohortError, DataRecord, Rank, Tag};
use crate::traits::{DataSource, MessageBus};

/// Consumer side of the pull protocol.
///
/// Each `read` sends one zero-length request to the distributor rank and
/// blocks for the reply; a zero-length reply is the end-of-data record.
/// Calling `read` again after end-of-data is undefined; a correct
/// consumer stops.
#[derive(Debug)]
pub struct PullGetter {
    bus: Arc<dyn MessageBus>,
    distributor: Rank,
}

impl PullGetter {
    /// Creates a getter pulling from `distributor` over `bus`.
    #[must_use]
    pub fn new(bus: Arc<dyn MessageBus>, distributor: Rank) -> Self {
        PullGetter { bus, distributor }
    }

    /// Rank this getter pulls from.
    #[must_use]
    pub fn distributor(&self) -> Rank {
        self.distributor
    }
}

#[async_trait]
impl DataSource for PullGetter {
    #[instrument(skip(self), fields(distributor = self.distributor))]
    async fn read(&mut self) -> Result<DataRecord, CohortError> {
        self.bus
            .send(self.distributor, Tag::BulkData.wire(), &[])
            .await?;
        let arrival = self
            .bus
            .probe(Some(self.distributor), Some(Tag::BulkData.wire()))
            .await?;
        let mut payload = vec![0u8; arrival.len];
        self.bus
            .recv_into(Some(self.distributor), Some(arrival.tag), &mut payload)
            .await?;
        Ok(DataRecord::new(payload))
    }
}
