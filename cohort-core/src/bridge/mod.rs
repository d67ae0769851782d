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

//! Delivery of asynchronous arrivals into a single-threaded engine.
//!
//! The interactive rank uses the [`ReceiverBridge`]'s probe-and-re-arm
//! cycle so its prompt is never blocked; captive worker ranks use the
//! plain foreground loop in [`run_captive`].

mod receiver;
mod worker;

pub use receiver::{ProbeOutcome, ReceiverBridge, ReceiverControl};
pub use worker::run_captive;
