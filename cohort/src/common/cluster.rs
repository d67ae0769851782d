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

use std::sync::Arc;

use tracing::info;

use cohort_core::prelude::{MemoryFabric, Rank};

use crate::common::CohortNode;

/// A fixed-size in-process group sharing one [`MemoryFabric`].
///
/// This is the launchpad for tests and for embedding a whole group in a
/// single process: every rank runs as its own task over the shared
/// fabric, with the same wire protocol and ordering guarantees the
/// processes would see over a real transport.
#[derive(Debug, Clone)]
pub struct LocalCluster {
    fabric: MemoryFabric,
}

impl LocalCluster {
    /// Launches a local group of `group_size` ranks.
    ///
    /// # Panics
    ///
    /// Panics if `group_size` is zero.
    #[must_use]
    pub fn launch(group_size: usize) -> Self {
        info!(group_size, "launching local cohort");
        LocalCluster {
            fabric: MemoryFabric::new(group_size),
        }
    }

    /// Fixed number of ranks in the group.
    #[must_use]
    pub fn group_size(&self) -> usize {
        self.fabric.group_size()
    }

    /// The shared fabric, exposed for its statistics and queue
    /// observability.
    #[must_use]
    pub fn fabric(&self) -> &MemoryFabric {
        &self.fabric
    }

    /// Creates the node for `rank`.
    ///
    /// Each call creates a fresh node with its own registration state;
    /// clone the returned node to share state between a command surface
    /// and a receive loop.
    ///
    /// # Panics
    ///
    /// Panics if `rank` is outside the group.
    #[must_use]
    pub fn node(&self, rank: Rank) -> CohortNode {
        CohortNode::new(Arc::new(self.fabric.endpoint(rank)))
    }
}
