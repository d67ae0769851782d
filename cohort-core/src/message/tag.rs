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

use std::fmt;

use crate::message::CohortError;

/// Raw tag value as carried on the wire.
///
/// The fixed values must match across all participating processes.
pub type WireTag = u32;

/// Protocol-level message category, used to dispatch a received payload.
///
/// The tag space is closed and process-global; it is never extended at
/// runtime. Every message carries exactly one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Script text to evaluate at global scope on the receiving engine.
    Script,
    /// Structured text handed to the registered script-level handler.
    StructuredData,
    /// Raw bytes. A zero-length payload is reserved for the pull-protocol
    /// framing (request and end-of-data).
    BulkData,
    /// Zero-length, self-addressed marker that terminates the receiver
    /// bridge's probe cycle.
    StopNotifier,
}

impl Tag {
    /// The fixed wire value of this tag.
    #[must_use]
    pub const fn wire(self) -> WireTag {
        match self {
            Tag::Script => 1,
            Tag::StructuredData => 2,
            Tag::BulkData => 3,
            Tag::StopNotifier => 4,
        }
    }

    /// Decodes a raw wire value back into a tag.
    ///
    /// # Errors
    ///
    /// Returns [`CohortError::UnrecognizedTag`] for values outside the fixed
    /// vocabulary; receivers log and discard such messages rather than
    /// failing.
    pub fn from_wire(value: WireTag) -> Result<Self, CohortError> {
        match value {
            1 => Ok(Tag::Script),
            2 => Ok(Tag::StructuredData),
            3 => Ok(Tag::BulkData),
            4 => Ok(Tag::StopNotifier),
            other => Err(CohortError::UnrecognizedTag(other)),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Script => write!(f, "script"),
            Tag::StructuredData => write!(f, "structured-data"),
            Tag::BulkData => write!(f, "bulk-data"),
            Tag::StopNotifier => write!(f, "stop-notifier"),
        }
    }
}
