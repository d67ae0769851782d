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

//! Tracing bootstrap for embedding applications.

use std::sync::Once;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cohort_core::prelude::CONFIG;

// Ensures the global subscriber is installed only once per process.
static INIT: Once = Once::new();

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, falling back to the
/// configured default level. With `behavior.log_to_file` enabled, log
/// lines go through a non-blocking daily-rolling appender under
/// `paths.log_directory`; otherwise they go to stderr.
///
/// Returns the appender guard, which must be kept alive for the process
/// lifetime so buffered lines are flushed on exit. `None` when logging to
/// stderr or when the subscriber was already installed.
pub fn init() -> Option<WorkerGuard> {
    let mut guard = None;
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(CONFIG.tracing.default_level.clone()));
        let builder = FmtSubscriber::builder()
            .with_span_events(FmtSpan::NONE)
            .with_env_filter(filter);

        if CONFIG.behavior.log_to_file
            && std::fs::create_dir_all(&CONFIG.paths.log_directory).is_ok()
        {
            let appender = RollingFileAppender::new(
                Rotation::DAILY,
                &CONFIG.paths.log_directory,
                "cohort.log",
            );
            let (writer, worker_guard) = tracing_appender::non_blocking(appender);
            tracing::subscriber::set_global_default(builder.with_writer(writer).finish())
                .expect("setting default subscriber failed");
            guard = Some(worker_guard);
        } else {
            tracing::subscriber::set_global_default(builder.finish())
                .expect("setting default subscriber failed");
        }
    });
    guard
}
