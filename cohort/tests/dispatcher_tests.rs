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

use std::sync::{Arc, Mutex};

use futures::future::join_all;

use cohort::prelude::*;

use crate::setup::{initialize_tracing, RecordingEngine};

mod setup;

/// Tests that `execute` with an explicit rank evaluates the script on
/// exactly that engine.
///
/// **Scenario:**
/// 1. Launch a group of three ranks; ranks 1 and 2 run captive loops.
/// 2. Rank 0 executes `greet` on rank 1, then `exit` on the others.
///
/// **Verification:**
/// - Rank 1 evaluated `greet` then `exit`; rank 2 only `exit`; rank 0
///   nothing.
#[tokio::test]
async fn execute_targets_exactly_one_engine() -> anyhow::Result<()> {
    initialize_tracing();
    let cluster = LocalCluster::launch(3);
    let mut interactive = RecordingEngine::default();
    let worker_one = RecordingEngine::default();
    let worker_two = RecordingEngine::default();

    let workers: Vec<_> = [(1, worker_one.clone()), (2, worker_two.clone())]
        .into_iter()
        .map(|(rank, mut engine)| {
            let node = cluster.node(rank);
            tokio::spawn(async move { node.run_captive(&mut engine).await })
        })
        .collect();

    let node = cluster.node(0);
    node.execute(&mut interactive, Destination::Rank(1), "greet")
        .await?;
    node.execute(&mut interactive, Destination::Others, "exit")
        .await?;

    for joined in join_all(workers).await {
        joined??;
    }

    assert_eq!(worker_one.evals(), vec!["greet", "exit"]);
    assert_eq!(worker_two.evals(), vec!["exit"]);
    assert!(interactive.evals().is_empty());
    Ok(())
}

/// Tests the group-wide shutdown scenario: `execute("all", "exit")` on a
/// group of three.
///
/// **Scenario:**
/// 1. Ranks 1 and 2 run captive loops; rank 0's engine snapshots the
///    fabric's send counter at evaluation time.
/// 2. Rank 0 executes `exit` on `all`.
///
/// **Verification:**
/// - Every rank evaluated `exit` exactly once.
/// - Both remote sends had been issued before the local evaluation ran.
/// - The local engine reported shutdown to the caller.
#[tokio::test]
async fn execute_all_reaches_every_rank_self_last() -> anyhow::Result<()> {
    initialize_tracing();
    let cluster = LocalCluster::launch(3);
    let stats = cluster.fabric().stats();

    let sends_seen_at_local_eval = Arc::new(Mutex::new(None));
    let observed = Arc::clone(&sends_seen_at_local_eval);
    let observer_stats = Arc::clone(&stats);
    let mut interactive = RecordingEngine::default().with_eval_hook(move |_| {
        *observed.lock().unwrap() = Some(observer_stats.messages_sent());
    });

    let worker_one = RecordingEngine::default();
    let worker_two = RecordingEngine::default();
    let workers: Vec<_> = [(1, worker_one.clone()), (2, worker_two.clone())]
        .into_iter()
        .map(|(rank, mut engine)| {
            let node = cluster.node(rank);
            tokio::spawn(async move { node.run_captive(&mut engine).await })
        })
        .collect();

    let node = cluster.node(0);
    let flow = node
        .execute(&mut interactive, Destination::All, "exit")
        .await?;
    assert_eq!(flow, EngineFlow::Shutdown);

    for joined in join_all(workers).await {
        joined??;
    }

    assert_eq!(interactive.evals(), vec!["exit"]);
    assert_eq!(worker_one.evals(), vec!["exit"]);
    assert_eq!(worker_two.evals(), vec!["exit"]);
    // Both peers already held their copy when the local engine saw it.
    assert_eq!(*sends_seen_at_local_eval.lock().unwrap(), Some(2));
    Ok(())
}

/// Tests that `execute("others", ...)` never evaluates on the calling
/// rank.
#[tokio::test]
async fn execute_others_skips_the_caller() -> anyhow::Result<()> {
    initialize_tracing();
    let cluster = LocalCluster::launch(2);
    let mut interactive = RecordingEngine::default();
    let worker = RecordingEngine::default();

    let node1 = cluster.node(1);
    let mut worker_engine = worker.clone();
    let captive = tokio::spawn(async move { node1.run_captive(&mut worker_engine).await });

    let node = cluster.node(0);
    node.execute(&mut interactive, Destination::Others, "ping")
        .await?;
    node.execute(&mut interactive, Destination::Others, "exit")
        .await?;
    captive.await??;

    assert!(interactive.evals().is_empty());
    assert_eq!(worker.evals(), vec!["ping", "exit"]);
    Ok(())
}

/// Tests that an out-of-range numeric destination fails cleanly with no
/// network traffic, for both `execute` and `send`.
#[tokio::test]
async fn out_of_range_destination_fails_without_traffic() {
    initialize_tracing();
    let cluster = LocalCluster::launch(2);
    let node = cluster.node(0);
    let mut engine = RecordingEngine::default();

    let err = node
        .execute(&mut engine, Destination::Rank(5), "nope")
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CohortError>(),
        Some(CohortError::InvalidDestination(_))
    ));

    let err = node
        .send(&mut engine, Destination::Rank(9), "data")
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CohortError>(),
        Some(CohortError::InvalidDestination(_))
    ));

    assert_eq!(cluster.fabric().stats().messages_sent(), 0);
    assert!(engine.evals().is_empty());
}

/// Tests that a self-addressed `execute` evaluates locally without
/// putting a message on the bus.
#[tokio::test]
async fn self_destination_never_touches_the_bus() -> anyhow::Result<()> {
    initialize_tracing();
    let cluster = LocalCluster::launch(2);
    let node = cluster.node(0);
    let mut engine = RecordingEngine::default();

    node.execute(&mut engine, Destination::Rank(0), "local")
        .await?;

    assert_eq!(engine.evals(), vec!["local"]);
    assert_eq!(cluster.fabric().stats().messages_sent(), 0);
    Ok(())
}
