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

use tracing::{instrument, trace};

use crate::dispatch::EventProcessor;
use crate::traits::{EngineFlow, ScriptEngine};

/// Foreground receive loop for captive (non-interactive) ranks.
///
/// Probe, dispatch, repeat: there is no interactive prompt to protect, so
/// no extra task is involved and every call blocks the rank's single
/// thread of control. The loop leaves when an evaluated script asks the
/// engine to shut down.
///
/// # Errors
///
/// Transport failures and engine evaluation errors propagate; the hosting
/// process treats them as fatal.
#[instrument(skip(processor, engine))]
pub async fn run_captive(
    processor: &EventProcessor,
    engine: &mut dyn ScriptEngine,
) -> anyhow::Result<()> {
    loop {
        let arrival = processor.bus().probe(None, None).await?;
        let flow = processor.process(engine, arrival).await?;
        if flow == EngineFlow::Shutdown {
            trace!("engine requested shutdown, leaving the captive loop");
            return Ok(());
        }
    }
}
