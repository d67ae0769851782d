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

use crate::message::{CohortError, DataRecord};

/// Produces bulk-data records for an analysis pipeline.
///
/// A zero-length record signals end-of-data; after returning it, `read`
/// must not be called again. Returned records own their buffers, so a
/// consumer releases one by dropping it.
#[async_trait]
pub trait DataSource: Send {
    /// Reads the next record, or the end-of-data sentinel.
    async fn read(&mut self) -> Result<DataRecord, CohortError>;
}

/// Accepts records handed off by an analysis pipeline.
///
/// The end-of-data sentinel must be forwarded so the sink can wind down.
#[async_trait]
pub trait DataSink: Send {
    /// Accepts one record, or the end-of-data sentinel.
    async fn accept(&mut self, record: DataRecord) -> Result<(), CohortError>;
}
