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

//! The pull-based bulk-data protocol: one distributor feeds many getters.
//!
//! A consumer asks for data by sending a zero-length bulk-data message to
//! the distributor rank; the distributor answers every request exactly
//! once: with a record while data lasts, and with a zero-length
//! end-of-data reply during rundown.

mod distributor;
mod getter;
mod pipeline;

pub use distributor::PullDistributor;
pub use getter::PullGetter;
pub use pipeline::pump;
