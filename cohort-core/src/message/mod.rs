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

//! Wire-level message vocabulary: tags, probe results, data records and the
//! error taxonomy shared by every component of the layer.

mod error;
mod record;
mod tag;
mod text;

pub use error::CohortError;
pub use record::DataRecord;
pub use tag::{Tag, WireTag};
pub use text::{decode_text, encode_text};

/// Identifier of one participant process in the coordinated group.
///
/// Ranks are dense integers in `0..group_size` and stable for the process
/// lifetime.
pub type Rank = usize;

/// The distinguished interactive / producer rank.
pub const INTERACTIVE_RANK: Rank = 0;

/// Description of a queued message, as returned by a probe.
///
/// A probe does not consume the message: the payload stays queued until a
/// receive with a buffer of exactly `len` bytes collects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    /// Rank that sent the message.
    pub source: Rank,
    /// Raw wire tag of the message.
    pub tag: WireTag,
    /// Payload size in bytes.
    pub len: usize,
}
