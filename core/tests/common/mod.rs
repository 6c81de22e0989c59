// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use parking_lot::Mutex;
use sluice::{next_fn, Action, Next, PipelineMiddleware, PipelineRegistry, StoreContext};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

pub const ACTION1: &str = "ACTION/ACTION1";
pub const ACTION2: &str = "ACTION/ACTION2";
pub const ACTION3: &str = "ACTION/ACTION3";

pub fn action1(param: bool) -> Action {
  Action::new(ACTION1).with("param", param)
}

pub fn action2(param: bool) -> Action {
  Action::new(ACTION2).with("param", param)
}

pub fn action3(param: bool) -> Action {
  Action::new(ACTION3).with("param", param)
}

// --- Common State ---
#[derive(Clone, Debug, Default)]
pub struct TestState {
  pub user: Option<String>,
  pub counter: i32,
}

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Test pipeline failed: {0}")]
  Pipeline(String),

  #[error("Test sequence failed: {0}")]
  Sequence(String),

  #[error("Test deferred value failed: {0}")]
  Deferred(String),
}

// --- Recording forward target ---

/// `Next` that records every forwarded action, in order.
#[derive(Clone, Default)]
pub struct Recorder {
  seen: Arc<Mutex<Vec<Action>>>,
}

impl Recorder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn next(&self) -> Next {
    let seen = self.seen.clone();
    next_fn(move |action| seen.lock().push(action))
  }

  pub fn len(&self) -> usize {
    self.seen.lock().len()
  }

  pub fn actions(&self) -> Vec<Action> {
    self.seen.lock().clone()
  }

  /// `(type, param)` pairs, which is what most assertions care about.
  pub fn calls(&self) -> Vec<(String, Option<bool>)> {
    self
      .seen
      .lock()
      .iter()
      .map(|a| (a.action_type().to_string(), a.get("param").and_then(|v| v.as_bool())))
      .collect()
  }

  /// Waits until at least `count` actions were forwarded. Panics after two seconds.
  pub async fn wait_for(&self, count: usize) {
    let waited = tokio::time::timeout(Duration::from_secs(2), async {
      while self.len() < count {
        tokio::time::sleep(Duration::from_millis(5)).await;
      }
    })
    .await;
    assert!(
      waited.is_ok(),
      "timed out waiting for {} forwarded actions, got {:?}",
      count,
      self.calls()
    );
  }

  /// Lets spawned continuations run, for asserting that nothing else arrives.
  pub async fn settle(&self) {
    for _ in 0..10 {
      tokio::task::yield_now().await;
    }
    tokio::time::sleep(Duration::from_millis(20)).await;
  }
}

pub fn call(action_type: &str, param: bool) -> (String, Option<bool>) {
  (action_type.to_string(), Some(param))
}

/// Middleware bound to a fresh default state and forwarding into `recorder`.
pub fn dispatcher_for(
  registry: PipelineRegistry<TestState>,
  recorder: &Recorder,
) -> sluice::Dispatcher<TestState> {
  PipelineMiddleware::new(registry)
    .bind(StoreContext::new(TestState::default()))
    .forward_to(recorder.next())
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
