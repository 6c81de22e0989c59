// sluice/src/pipeline/runtime.rs

//! Where deferred continuations run, and what happens when a deferred outcome fails.

use crate::core::action::Action;
use crate::error::{SluiceError, SluiceResult};
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{event, Level};

/// Schedules the continuation of a deferred outcome.
///
/// The continuation is detached: once spawned it runs to completion (or failure)
/// and cannot be cancelled from the outside.
pub trait DeferredExecutor: Send + Sync {
  fn spawn(&self, task: BoxFuture<'static, ()>) -> SluiceResult<()>;
}

/// Spawns continuations on a tokio runtime.
///
/// Without an explicit handle, the runtime of the dispatching thread is used;
/// dispatching a deferred outcome outside any runtime fails with
/// `SluiceError::ExecutorUnavailable`.
#[derive(Debug, Clone, Default)]
pub struct TokioExecutor {
  handle: Option<Handle>,
}

impl TokioExecutor {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_handle(handle: Handle) -> Self {
    Self { handle: Some(handle) }
  }
}

impl DeferredExecutor for TokioExecutor {
  fn spawn(&self, task: BoxFuture<'static, ()>) -> SluiceResult<()> {
    let handle = match &self.handle {
      Some(handle) => handle.clone(),
      None => Handle::try_current().map_err(|e| SluiceError::ExecutorUnavailable { reason: e.to_string() })?,
    };
    // JoinHandle is dropped on purpose; the task keeps running detached.
    drop(handle.spawn(task));
    Ok(())
  }
}

pub type FailureHook = Arc<dyn Fn(&Action, &SluiceError) + Send + Sync>;

/// What to do when a deferred outcome fails.
///
/// A failed deferred outcome means its triggering action is dropped for good, so
/// every policy surfaces the failure somewhere.
#[derive(Clone, Default)]
pub enum DeferredFailurePolicy {
  /// Emit an ERROR event with the action type and error chain, then drop the action.
  #[default]
  Log,
  /// Panic inside the continuation task.
  Panic,
  /// Hand the failure to a user hook (a WARN event is emitted as well).
  Report(FailureHook),
}

impl DeferredFailurePolicy {
  pub fn report(hook: impl Fn(&Action, &SluiceError) + Send + Sync + 'static) -> Self {
    DeferredFailurePolicy::Report(Arc::new(hook))
  }

  pub(crate) fn surface(&self, trigger: &Action, err: SluiceError) {
    match self {
      DeferredFailurePolicy::Log => {
        event!(
          Level::ERROR,
          action_type = trigger.action_type(),
          error = ?anyhow::Error::new(err),
          "Deferred outcome failed; triggering action dropped."
        );
      }
      DeferredFailurePolicy::Panic => {
        panic!(
          "sluice: deferred outcome for action '{}' failed: {}",
          trigger.action_type(),
          err
        );
      }
      DeferredFailurePolicy::Report(hook) => {
        event!(
          Level::WARN,
          action_type = trigger.action_type(),
          error = %err,
          "Deferred outcome failed; reporting to hook."
        );
        hook(trigger, &err);
      }
    }
  }
}

impl fmt::Debug for DeferredFailurePolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DeferredFailurePolicy::Log => f.write_str("Log"),
      DeferredFailurePolicy::Panic => f.write_str("Panic"),
      DeferredFailurePolicy::Report(_) => f.write_str("Report(<hook>)"),
    }
  }
}
