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

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cohort::prelude::*;

// Ensures tracing initialization happens only once across all tests.
static INIT: Once = Once::new();

/// Initializes the global tracing subscriber for tests.
///
/// Uses `RUST_LOG` when set, defaulting to `info`, and writes through the
/// test writer so output is captured per test.
pub fn initialize_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("setting default subscriber failed");
    });
}

/// Script engine that records everything it is asked to run.
///
/// Clones share the underlying records, so a test can keep one clone for
/// assertions while a receive loop owns another. Evaluating the literal
/// script `exit` reports [`EngineFlow::Shutdown`], mirroring a shutdown
/// command ending a captive loop.
#[derive(Default, Clone)]
pub struct RecordingEngine {
    evals: Arc<Mutex<Vec<String>>>,
    handled: Arc<Mutex<Vec<(Rank, String, String)>>>,
    eval_hook: Option<Arc<dyn Fn(&str) + Send + Sync>>,
}

impl RecordingEngine {
    /// Adds a hook observing every evaluation before it is recorded.
    pub fn with_eval_hook(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.eval_hook = Some(Arc::new(hook));
        self
    }

    /// Scripts evaluated so far, in order.
    pub fn evals(&self) -> Vec<String> {
        self.evals.lock().expect("recording poisoned").clone()
    }

    /// Handler invocations so far, as `(source, handler, payload)`.
    pub fn handled(&self) -> Vec<(Rank, String, String)> {
        self.handled.lock().expect("recording poisoned").clone()
    }
}

impl ScriptEngine for RecordingEngine {
    fn eval_global(&mut self, script: &str) -> anyhow::Result<EngineFlow> {
        if let Some(hook) = &self.eval_hook {
            hook(script);
        }
        self.evals
            .lock()
            .expect("recording poisoned")
            .push(script.to_string());
        Ok(if script == "exit" {
            EngineFlow::Shutdown
        } else {
            EngineFlow::Continue
        })
    }

    fn invoke_handler(
        &mut self,
        handler: &str,
        source: Rank,
        payload: &str,
    ) -> anyhow::Result<EngineFlow> {
        self.handled
            .lock()
            .expect("recording poisoned")
            .push((source, handler.to_string(), payload.to_string()));
        Ok(EngineFlow::Continue)
    }
}

/// In-memory data source yielding a fixed run of records, then
/// end-of-data.
pub struct VecSource {
    records: VecDeque<DataRecord>,
}

impl VecSource {
    pub fn new(records: impl IntoIterator<Item = Vec<u8>>) -> Self {
        VecSource {
            records: records.into_iter().map(DataRecord::new).collect(),
        }
    }
}

#[async_trait]
impl DataSource for VecSource {
    async fn read(&mut self) -> Result<DataRecord, CohortError> {
        Ok(self
            .records
            .pop_front()
            .unwrap_or_else(DataRecord::end_of_data))
    }
}
