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

use crate::message::WireTag;

/// Errors raised by the messaging and distribution layer.
///
/// Failed operations are no-ops on shared state: neither the consumer set
/// nor the handler registrations are touched by an operation that returns
/// an error.
#[derive(Debug)]
pub enum CohortError {
    /// A destination rank fell outside `0..group_size`. Nothing was sent.
    InvalidDestination(String),
    /// A rank-restricted operation was attempted from the wrong rank. No
    /// transport action was taken.
    RoleViolation(String),
    /// A received message carried a wire tag outside the fixed vocabulary.
    /// Receivers log and discard the message; this never ends processing.
    UnrecognizedTag(WireTag),
    /// The transport failed. There is no retry policy: the layer assumes a
    /// reliable, failure-free group, so run loops propagate this and the
    /// process terminates.
    TransportFailure(String),
}

impl std::fmt::Display for CohortError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CohortError::InvalidDestination(reason) => {
                write!(f, "invalid destination: {}", reason)
            }
            CohortError::RoleViolation(reason) => write!(f, "role violation: {}", reason),
            CohortError::UnrecognizedTag(value) => {
                write!(f, "unrecognized message tag {}", value)
            }
            CohortError::TransportFailure(reason) => {
                write!(f, "transport failure: {}", reason)
            }
        }
    }
}

impl std::error::Error for CohortError {}
