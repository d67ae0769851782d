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
use std::time::Duration;

use tokio::time::timeout;

use cohort::prelude::*;

use crate::setup::{initialize_tracing, RecordingEngine};

mod setup;

const TEST_DEADLINE: Duration = Duration::from_secs(5);

/// Tests that bridged arrivals are dispatched one at a time, in arrival
/// order, until the stop notifier ends the cycle.
///
/// **Scenario:**
/// 1. Rank 0 starts its receiver bridge and drives the run loop.
/// 2. Rank 1 executes three scripts on rank 0.
/// 3. Rank 0 stops the receiver.
///
/// **Verification:**
/// - The interactive engine evaluated the scripts in send order.
/// - The run loop returned after the stop notifier was consumed.
#[tokio::test]
async fn bridged_events_arrive_in_order() -> anyhow::Result<()> {
    initialize_tracing();
    let cluster = LocalCluster::launch(2);

    let node = cluster.node(0);
    let interactive = RecordingEngine::default();
    let mut bridge = node.receiver()?;
    bridge.start()?;
    let mut loop_engine = interactive.clone();
    let receiver_loop = tokio::spawn(async move { bridge.run(&mut loop_engine).await });

    let node1 = cluster.node(1);
    let mut worker_engine = RecordingEngine::default();
    for script in ["first", "second", "third"] {
        node1
            .execute(&mut worker_engine, Destination::Rank(0), script)
            .await?;
    }
    node.stop_receiver().await?;

    timeout(TEST_DEADLINE, receiver_loop).await???;
    assert_eq!(interactive.evals(), vec!["first", "second", "third"]);
    Ok(())
}

/// Tests that the stop notifier is delivered and consumed while the probe
/// cycle is idle, terminating the loop without dispatching any event.
#[tokio::test]
async fn stop_while_idle_terminates_the_cycle() -> anyhow::Result<()> {
    initialize_tracing();
    let cluster = LocalCluster::launch(2);

    let node = cluster.node(0);
    let interactive = RecordingEngine::default();
    let mut bridge = node.receiver()?;
    bridge.start()?;
    let mut loop_engine = interactive.clone();
    let receiver_loop = tokio::spawn(async move { bridge.run(&mut loop_engine).await });

    // No traffic at all; the self-addressed notifier is the only message.
    node.stop_receiver().await?;

    timeout(TEST_DEADLINE, receiver_loop).await???;
    assert!(interactive.evals().is_empty());
    // The notifier was consumed, not left queued.
    assert_eq!(cluster.fabric().pending(0), 0);
    Ok(())
}

/// Tests that receiver lifecycle operations are refused on captive ranks
/// with no transport action.
#[tokio::test]
async fn receiver_lifecycle_is_rank_zero_only() {
    initialize_tracing();
    let cluster = LocalCluster::launch(2);
    let node1 = cluster.node(1);

    assert!(matches!(
        node1.receiver(),
        Err(CohortError::RoleViolation(_))
    ));
    assert!(matches!(
        node1.stop_receiver().await,
        Err(CohortError::RoleViolation(_))
    ));
    assert_eq!(cluster.fabric().stats().messages_sent(), 0);
}

/// Tests that an evaluated shutdown script ends the bridged loop without
/// a stop notifier.
#[tokio::test]
async fn engine_shutdown_ends_the_bridged_loop() -> anyhow::Result<()> {
    initialize_tracing();
    let cluster = LocalCluster::launch(2);

    let node = cluster.node(0);
    let interactive = RecordingEngine::default();
    let mut bridge = node.receiver()?;
    bridge.start()?;
    let mut loop_engine = interactive.clone();
    let receiver_loop = tokio::spawn(async move { bridge.run(&mut loop_engine).await });

    let node1 = cluster.node(1);
    let mut worker_engine = RecordingEngine::default();
    node1
        .execute(&mut worker_engine, Destination::Rank(0), "exit")
        .await?;

    timeout(TEST_DEADLINE, receiver_loop).await???;
    assert_eq!(interactive.evals(), vec!["exit"]);
    Ok(())
}

/// Tests that arming the bridge while a probe is already outstanding is
/// refused without disturbing the cycle.
#[tokio::test]
async fn double_start_is_refused_harmlessly() -> anyhow::Result<()> {
    initialize_tracing();
    let cluster = LocalCluster::launch(2);

    let node = cluster.node(0);
    let interactive = RecordingEngine::default();
    let mut bridge = node.receiver()?;
    bridge.start()?;
    // A second start is a caller error; it is logged and refused, so the
    // cycle still dispatches each arrival exactly once.
    bridge.start()?;
    let mut loop_engine = interactive.clone();
    let receiver_loop = tokio::spawn(async move { bridge.run(&mut loop_engine).await });

    let node1 = cluster.node(1);
    let mut worker_engine = RecordingEngine::default();
    node1
        .execute(&mut worker_engine, Destination::Rank(0), "once")
        .await?;
    node.stop_receiver().await?;

    timeout(TEST_DEADLINE, receiver_loop).await???;
    assert_eq!(interactive.evals(), vec!["once"]);
    Ok(())
}

/// Tests that bulk arrivals outside the pull protocol reach the
/// registered binary callback with their source and payload.
#[tokio::test]
async fn bulk_data_reaches_the_binary_handler() -> anyhow::Result<()> {
    initialize_tracing();
    let cluster = LocalCluster::launch(2);

    let node = cluster.node(0);
    let blobs: Arc<Mutex<Vec<(Rank, Vec<u8>)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&blobs);
    node.set_binary_handler(Arc::new(move |source: Rank, bytes: &[u8]| {
        sink.lock().unwrap().push((source, bytes.to_vec()));
    }));

    let interactive = RecordingEngine::default();
    let mut bridge = node.receiver()?;
    bridge.start()?;
    let mut loop_engine = interactive.clone();
    let receiver_loop = tokio::spawn(async move { bridge.run(&mut loop_engine).await });

    let peer = cluster.fabric().endpoint(1);
    peer.send(0, Tag::BulkData.wire(), b"blob").await?;
    node.stop_receiver().await?;

    timeout(TEST_DEADLINE, receiver_loop).await???;
    assert_eq!(*blobs.lock().unwrap(), vec![(1, b"blob".to_vec())]);
    Ok(())
}
