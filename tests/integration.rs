//! Integration tests for strata-tui.
//!
//! These tests drive the public API from outside the crate: trees go in through a
//! [`Runtime`], and what reaches the screen is observed through recording sinks.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;

use strata_tui::color::{Capabilities, Color, Theme};
use strata_tui::node::{keys, Address, Node, NodeBuilder, NodeKind};
use strata_tui::reconcile::reconcile;
use strata_tui::render::RenderCommand;
use strata_tui::runtime::{CommitMode, Runtime, RuntimeError, SessionOptions};
use strata_tui::testing::{FailingSink, RecordingSink};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn caps() -> Capabilities {
    Capabilities::none().with_size(20, 6)
}

fn text(content: &str) -> NodeBuilder {
    Node::build(NodeKind::Text).prop(keys::CONTENT, content)
}

fn stack(children: impl IntoIterator<Item = NodeBuilder>) -> Node {
    Node::build(NodeKind::VStack)
        .address("root")
        .children(children)
        .build()
        .unwrap()
}

fn headless() -> SessionOptions {
    SessionOptions::default().with_headless(true)
}

/// Rows addressed by a batch's `MoveCursor` commands.
fn rows_touched(batch: &[RenderCommand]) -> Vec<u16> {
    let mut rows: Vec<u16> = batch
        .iter()
        .filter_map(|c| match c {
            RenderCommand::MoveCursor { row, .. } => Some(*row),
            _ => None,
        })
        .collect();
    rows.dedup();
    rows
}

// ---------------------------------------------------------------------------
// Commit cycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn first_commit_paints_everything() {
    let runtime = Runtime::spawn(caps());
    let recorder = RecordingSink::new(caps());
    runtime.add_sink(recorder.clone()).await.unwrap();

    let report = runtime
        .commit(stack([text("one"), text("two")]), headless())
        .await
        .unwrap();

    assert_eq!(report.mode, CommitMode::Full);
    assert_eq!(report.insertions, 3);
    assert_eq!(report.failed_sinks, 0);
    assert_eq!(recorder.batch_count(), 1);
    assert!(recorder.screen().starts_with("one\ntwo"));
}

#[tokio::test]
async fn leaf_change_repaints_only_its_row() {
    let runtime = Runtime::spawn(caps());
    let recorder = RecordingSink::new(caps());
    runtime.add_sink(recorder.clone()).await.unwrap();

    runtime
        .commit(stack([text("alpha"), text("beta"), text("gamma")]), headless())
        .await
        .unwrap();
    let report = runtime
        .commit(stack([text("alpha"), text("BETA"), text("gamma")]), headless())
        .await
        .unwrap();

    assert_eq!(report.mode, CommitMode::Incremental);
    assert_eq!(report.updates, 1);
    assert_eq!(report.insertions + report.deletions + report.moves, 0);

    let batch = recorder.last_batch().unwrap();
    assert_eq!(rows_touched(&batch), vec![1]);
    assert_eq!(batch.last(), Some(&RenderCommand::Flush));
    assert!(recorder.screen().starts_with("alpha\nBETA\ngamma"));
}

#[tokio::test]
async fn failing_sink_does_not_block_others() {
    let runtime = Runtime::spawn(caps());
    let failing = FailingSink::new();
    let recorder = RecordingSink::new(caps());
    runtime.add_sink(failing.clone()).await.unwrap();
    runtime.add_sink(recorder.clone()).await.unwrap();

    let report = runtime.commit(stack([text("hi")]), headless()).await.unwrap();

    assert_eq!(report.failed_sinks, 1);
    assert_eq!(failing.attempts(), 1);
    assert_eq!(recorder.batch_count(), 1);
}

#[tokio::test]
async fn removed_sink_receives_nothing() {
    let runtime = Runtime::spawn(caps());
    let recorder = RecordingSink::new(caps());
    let id = runtime.add_sink(recorder.clone()).await.unwrap();

    assert!(runtime.remove_sink(id).await.unwrap());
    assert!(!runtime.remove_sink(id).await.unwrap());

    runtime.commit(stack([text("hi")]), headless()).await.unwrap();
    assert_eq!(recorder.batch_count(), 0);
}

#[tokio::test]
async fn capability_change_forces_full_repaint() {
    let runtime = Runtime::spawn(caps());
    runtime.commit(stack([text("a")]), headless()).await.unwrap();

    let wider = caps().with_size(30, 6);
    runtime.set_capabilities(wider).await.unwrap();
    assert_eq!(runtime.capabilities().await.unwrap(), wider);

    let report = runtime.commit(stack([text("b")]), headless()).await.unwrap();
    assert_eq!(report.mode, CommitMode::Full);
    assert_eq!(report.updates, 1);
}

#[tokio::test]
async fn theme_change_forces_full_repaint() {
    let runtime = Runtime::spawn(caps());
    runtime.commit(stack([text("a"), text("b")]), headless()).await.unwrap();

    let recolored = headless().with_theme(Theme::default().with("accent", Color::rgb(1, 2, 3)));
    let report = runtime
        .commit(stack([text("a"), text("B")]), recolored.clone())
        .await
        .unwrap();
    assert_eq!(report.mode, CommitMode::Full);

    let report = runtime
        .commit(stack([text("a"), text("b")]), recolored)
        .await
        .unwrap();
    assert_eq!(report.mode, CommitMode::Incremental);
}

#[tokio::test]
async fn sink_capabilities_are_reported_not_adopted() {
    let runtime = Runtime::spawn(caps());
    let advertised = Capabilities::true_color().with_size(100, 40);
    let id = runtime.add_sink(RecordingSink::new(advertised)).await.unwrap();

    assert_eq!(runtime.sink_capabilities(id).await.unwrap(), Some(advertised));
    assert_eq!(runtime.capabilities().await.unwrap(), caps());

    runtime.remove_sink(id).await.unwrap();
    assert_eq!(runtime.sink_capabilities(id).await.unwrap(), None);
}

#[tokio::test]
async fn apply_terminates_batch_with_flush() {
    let runtime = Runtime::spawn(caps());
    let recorder = RecordingSink::new(caps());
    runtime.add_sink(recorder.clone()).await.unwrap();

    let failed = runtime
        .apply(vec![RenderCommand::move_to(0, 0), RenderCommand::write("raw")])
        .await
        .unwrap();

    assert_eq!(failed, 0);
    assert_eq!(
        recorder.last_batch().unwrap(),
        vec![
            RenderCommand::MoveCursor { row: 0, col: 0 },
            RenderCommand::write("raw"),
            RenderCommand::Flush,
        ]
    );
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[test]
fn reconcile_identical_trees_is_empty() {
    let tree = stack([text("a").id("a"), text("b").id("b")]);
    assert!(!reconcile(Some(&tree), &tree.clone()).has_changes());
}

#[test]
fn reconcile_without_old_tree_inserts_everything() {
    let tree = stack([text("a"), text("b")]);
    let result = reconcile(None, &tree);
    assert_eq!(result.insertions.len(), tree.len());
    assert_eq!(result.insertion_roots().len(), 1);
}

#[test]
fn reconcile_swapped_ids_are_moves() {
    let old = stack([text("a").id("a"), text("b").id("b")]);
    let new = stack([text("b").id("b"), text("a").id("a")]);
    let result = reconcile(Some(&old), &new);

    assert_eq!(result.moves.len(), 2);
    assert!(result.insertions.is_empty());
    assert!(result.deletions.is_empty());
}

// ---------------------------------------------------------------------------
// Animations
// ---------------------------------------------------------------------------

fn recorder_update(log: &Arc<Mutex<Vec<f64>>>) -> impl FnMut(f64) -> Vec<RenderCommand> + Send + 'static {
    let log = Arc::clone(log);
    move |progress| {
        log.lock().unwrap().push(progress);
        vec![RenderCommand::write(format!("{progress:.1}"))]
    }
}

#[tokio::test(start_paused = true)]
async fn animation_runs_to_completion() {
    let runtime = Runtime::spawn(caps());
    let recorder = RecordingSink::new(caps());
    runtime.add_sink(recorder.clone()).await.unwrap();

    let log = Arc::new(Mutex::new(Vec::new()));
    runtime
        .start_animation(
            Address::new("root.spinner.0"),
            Duration::from_millis(100),
            10,
            recorder_update(&log),
        )
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(500)).await;

    let values = log.lock().unwrap().clone();
    assert!(values.len() >= 2);
    assert_eq!(values.first(), Some(&0.0));
    assert_eq!(values.last(), Some(&1.0));
    assert!(values.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(runtime.active_animations().await.unwrap(), 0);
    assert!(recorder.batch_count() >= 2);
}

#[tokio::test(start_paused = true)]
async fn cancelled_animation_skips_final_update() {
    let runtime = Runtime::spawn(caps());
    let address = Address::new("root.spinner.0");
    let log = Arc::new(Mutex::new(Vec::new()));
    runtime
        .start_animation(address.clone(), Duration::from_secs(1), 10, recorder_update(&log))
        .await
        .unwrap();

    assert!(runtime.stop_animation(address.clone()).await.unwrap());
    assert!(!runtime.stop_animation(address).await.unwrap());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(!log.lock().unwrap().contains(&1.0));
    assert_eq!(runtime.active_animations().await.unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn restarting_an_animation_replaces_it() {
    let runtime = Runtime::spawn(caps());
    let address = Address::new("root.spinner.0");
    let first = Arc::new(Mutex::new(Vec::new()));
    let second = Arc::new(Mutex::new(Vec::new()));

    runtime
        .start_animation(address.clone(), Duration::from_secs(10), 10, recorder_update(&first))
        .await
        .unwrap();
    runtime
        .start_animation(address.clone(), Duration::from_secs(10), 10, recorder_update(&second))
        .await
        .unwrap();
    assert_eq!(runtime.active_animations().await.unwrap(), 1);

    runtime
        .start_animation(Address::new("root.spinner.1"), Duration::from_secs(10), 10, |_| Vec::new())
        .await
        .unwrap();
    assert_eq!(runtime.active_animations().await.unwrap(), 2);
    assert_eq!(runtime.stop_all_animations().await.unwrap(), 2);
    assert_eq!(runtime.active_animations().await.unwrap(), 0);

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert!(!first.lock().unwrap().contains(&1.0));
    assert!(!second.lock().unwrap().contains(&1.0));
}

// ---------------------------------------------------------------------------
// Shutdown
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shutdown_resets_sinks_and_closes_worker() {
    let runtime = Runtime::spawn(caps());
    let recorder = RecordingSink::new(caps());
    runtime.add_sink(recorder.clone()).await.unwrap();
    runtime.commit(stack([text("bye")]), headless()).await.unwrap();

    runtime.shutdown().await.unwrap();
    assert_eq!(recorder.resets(), 1);

    let err = runtime.commit(stack([text("late")]), headless()).await.unwrap_err();
    assert_eq!(err, RuntimeError::WorkerClosed);
    assert_eq!(recorder.batch_count(), 1);
}
