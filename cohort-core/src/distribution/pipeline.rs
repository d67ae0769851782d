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

use tracing::trace;

use crate::message::CohortError;
use crate::traits::{DataSink, DataSource};

/// Drives records from a source into a sink until end-of-data has been
/// handed over.
///
/// The end-of-data sentinel itself is forwarded to the sink (a
/// distributor sink uses it to run down its consumers), and the pump
/// returns once the sink has accepted it.
///
/// # Errors
///
/// The first source or sink failure ends the pump.
pub async fn pump(
    source: &mut dyn DataSource,
    sink: &mut dyn DataSink,
) -> Result<(), CohortError> {
    loop {
        let record = source.read().await?;
        let finished = record.is_end_of_data();
        sink.accept(record).await?;
        if finished {
            trace!("end of data handed to the sink");
            return Ok(());
        }
    }
}
