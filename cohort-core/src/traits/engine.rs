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

use crate::message::Rank;

/// What the engine asks the surrounding run loop to do after an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineFlow {
    /// Keep processing events.
    Continue,
    /// Leave the run loop; the computation on this rank is over.
    Shutdown,
}

/// The single-threaded, cooperative script engine hosted by each rank.
///
/// The messaging layer treats the engine as a black box: it only ever asks
/// for a script to be evaluated at global scope or for a registered handler
/// to be invoked with the sender's rank and payload appended as arguments.
/// A shutdown script (such as `exit`) reports [`EngineFlow::Shutdown`]
/// instead of terminating inside the evaluation, so the hosting loop can
/// wind down cleanly.
pub trait ScriptEngine: Send {
    /// Evaluates `script` at global scope.
    fn eval_global(&mut self, script: &str) -> anyhow::Result<EngineFlow>;

    /// Invokes the registered handler script with `(source, payload)`
    /// appended as arguments.
    fn invoke_handler(
        &mut self,
        handler: &str,
        source: Rank,
        payload: &str,
    ) -> anyhow::Result<EngineFlow>;
}
