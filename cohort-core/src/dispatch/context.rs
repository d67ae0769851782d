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
use std::sync::{Arc, RwLock};

use tracing::trace;

use crate::message::Rank;

/// Callback receiving `(source, payload)` for bulk binary arrivals.
pub type BinaryHandler = Arc<dyn Fn(Rank, &[u8]) + Send + Sync>;

/// Per-process registration state consulted when messages arrive.
///
/// One context exists per process, shared between the command surface and
/// the event processor. It owns the optional structured-data handler script
/// and the optional process-wide binary callback; both are mutated only by
/// the owning process, and only one received event is ever live at a time,
/// so the locks are never contended across an event dispatch.
#[derive(Default)]
pub struct DispatchContext {
    script_handler: RwLock<Option<String>>,
    binary_handler: RwLock<Option<BinaryHandler>>,
}

impl DispatchContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The currently registered structured-data handler script, if any.
    #[must_use]
    pub fn handler(&self) -> Option<String> {
        self.script_handler
            .read()
            .expect("handler registration poisoned")
            .clone()
    }

    /// Installs, replaces or clears the structured-data handler.
    ///
    /// A non-empty script replaces any prior handler; an empty script
    /// clears the registration.
    pub fn set_handler(&self, script: &str) {
        let mut slot = self
            .script_handler
            .write()
            .expect("handler registration poisoned");
        if script.is_empty() {
            trace!("structured-data handler cleared");
            *slot = None;
        } else {
            trace!(handler = script, "structured-data handler installed");
            *slot = Some(script.to_string());
        }
    }

    /// Installs the process-wide binary-data callback.
    ///
    /// Normally set once, by the compiled collaborator that consumes bulk
    /// arrivals outside the pull protocol.
    pub fn set_binary_handler(&self, handler: BinaryHandler) {
        *self
            .binary_handler
            .write()
            .expect("handler registration poisoned") = Some(handler);
    }

    pub(crate) fn binary_handler(&self) -> Option<BinaryHandler> {
        self.binary_handler
            .read()
            .expect("handler registration poisoned")
            .clone()
    }
}

impl fmt::Debug for DispatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchContext")
            .field("script_handler", &self.handler())
            .field("binary_handler", &self.binary_handler().is_some())
            .finish()
    }
}
