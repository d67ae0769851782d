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

use async_trait::async_trait;

use crate::message::{Arrival, CohortError, Rank, WireTag};

/// One rank's endpoint on the group's point-to-point transport.
///
/// Messages between a fixed (source, destination, tag) triple are delivered
/// in send order; there is no ordering guarantee across different tags or
/// sources. Every operation waits indefinitely; the layer has no timed or
/// non-blocking waits.
///
/// Receivers follow a probe-then-receive discipline: [`probe`] describes
/// the next matching message without consuming it, and [`recv_into`]
/// demands a buffer of exactly the probed size. Failures at this layer are
/// unrecoverable; callers propagate them and the process run loops abort.
///
/// [`probe`]: MessageBus::probe
/// [`recv_into`]: MessageBus::recv_into
#[async_trait]
pub trait MessageBus: std::fmt::Debug + Send + Sync {
    /// Rank of this endpoint.
    fn rank(&self) -> Rank;

    /// Fixed number of ranks in the group.
    fn group_size(&self) -> usize;

    /// Queues `payload` for `dest`, waiting until the transport accepts it.
    async fn send(&self, dest: Rank, tag: WireTag, payload: &[u8]) -> Result<(), CohortError>;

    /// Waits for a message matching the selectors and describes it without
    /// consuming it. `None` selects any source or any tag.
    async fn probe(
        &self,
        source: Option<Rank>,
        tag: Option<WireTag>,
    ) -> Result<Arrival, CohortError>;

    /// Consumes the first message matching the selectors into `buf`.
    ///
    /// The buffer length must equal the queued message's length (normally
    /// taken from a prior [`probe`]); a mismatch is a
    /// [`CohortError::TransportFailure`] and leaves the message queued.
    ///
    /// [`probe`]: MessageBus::probe
    async fn recv_into(
        &self,
        source: Option<Rank>,
        tag: Option<WireTag>,
        buf: &mut [u8],
    ) -> Result<Arrival, CohortError>;
}
