// sluice/src/pipeline/resolver.rs

//! Contains the `Resolver`, which walks a pipeline's `Outcome`, forwards every
//! derived action it reaches, and decides whether the triggering action may follow.
//!
//! Resolution rules, by variant:
//!  - `None`: nothing intercepted, `Verdict::Proceed`.
//!  - `Action`: forwarded unconditionally, then `Halted` if it carries `halt`, else `Proceed`.
//!  - `Thunk`: called, and its result resolved in its place.
//!  - `Sequence`: pulled and resolved one element at a time; the first non-`Proceed`
//!    verdict stops pulling and becomes the verdict of the sequence.
//!  - `Deferred`: `Verdict::Deferred` right away. A continuation resolves the settled
//!    outcome later and forwards the triggering action itself if that yields `Proceed`.

use crate::core::action::Action;
use crate::core::control::Verdict;
use crate::core::next::Next;
use crate::core::outcome::{DeferredOutcome, Outcome, OutcomeSequence};
use crate::error::SluiceResult;
use crate::pipeline::runtime::{DeferredExecutor, DeferredFailurePolicy, TokioExecutor};
use futures::FutureExt;
use std::sync::Arc;
use tracing::{event, instrument, Instrument, Level};

#[derive(Clone)]
pub struct Resolver {
  executor: Arc<dyn DeferredExecutor>,
  on_deferred_failure: DeferredFailurePolicy,
}

impl Default for Resolver {
  fn default() -> Self {
    Self {
      executor: Arc::new(TokioExecutor::new()),
      on_deferred_failure: DeferredFailurePolicy::default(),
    }
  }
}

impl std::fmt::Debug for Resolver {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Resolver")
      .field("on_deferred_failure", &self.on_deferred_failure)
      .finish_non_exhaustive()
  }
}

impl Resolver {
  /// Resolver spawning deferred continuations on the ambient tokio runtime and
  /// logging deferred failures.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_executor(mut self, executor: impl DeferredExecutor + 'static) -> Self {
    self.executor = Arc::new(executor);
    self
  }

  pub fn on_deferred_failure(mut self, policy: DeferredFailurePolicy) -> Self {
    self.on_deferred_failure = policy;
    self
  }

  /// Resolves `outcome` produced for `trigger`, forwarding derived actions through `next`.
  ///
  /// Errors raised by thunks and sequence pulls are returned as-is; the resolver
  /// never catches them. The returned verdict only concerns `trigger`: the caller
  /// forwards it when `verdict.should_forward()`.
  #[instrument(
        name = "Resolver::resolve",
        skip_all,
        fields(
            action_type = trigger.action_type(),
            outcome = %outcome.kind(),
        ),
        err(Display)
    )]
  pub fn resolve(&self, outcome: Outcome, trigger: &Action, next: &Next) -> SluiceResult<Verdict> {
    let verdict = self.resolve_outcome(outcome, trigger, next)?;
    event!(Level::DEBUG, ?verdict, "Outcome resolved.");
    Ok(verdict)
  }

  fn resolve_outcome(&self, mut outcome: Outcome, trigger: &Action, next: &Next) -> SluiceResult<Verdict> {
    // Thunk chains are unwound in this loop, so nesting depth costs no stack.
    loop {
      match outcome {
        Outcome::None => {
          event!(Level::TRACE, "No outcome, proceeding.");
          return Ok(Verdict::Proceed);
        }
        Outcome::Action(action) => {
          let verdict = Verdict::from_halt(action.is_halt());
          event!(
            Level::TRACE,
            derived_type = action.action_type(),
            halt = action.is_halt(),
            "Forwarding derived action."
          );
          next(action);
          return Ok(verdict);
        }
        Outcome::Thunk(thunk) => {
          event!(Level::TRACE, "Invoking thunk.");
          outcome = thunk().map_err(|e| e.in_pipeline(trigger.action_type()))?;
        }
        Outcome::Sequence(sequence) => return self.resolve_sequence(sequence, trigger, next),
        Outcome::Deferred(deferred) => return self.defer(deferred, trigger, next),
      }
    }
  }

  fn resolve_sequence(&self, sequence: OutcomeSequence, trigger: &Action, next: &Next) -> SluiceResult<Verdict> {
    for (index, pulled) in sequence.enumerate() {
      let element = pulled.map_err(|e| e.in_sequence(trigger.action_type()))?;
      let verdict = self.resolve_outcome(element, trigger, next)?;
      if !verdict.should_forward() {
        // Remaining elements are never pulled.
        event!(Level::DEBUG, index, ?verdict, "Sequence stopped.");
        return Ok(verdict);
      }
    }
    event!(Level::TRACE, "Sequence exhausted without halt.");
    Ok(Verdict::Proceed)
  }

  fn defer(&self, deferred: DeferredOutcome, trigger: &Action, next: &Next) -> SluiceResult<Verdict> {
    let resolver = self.clone();
    let trigger = trigger.clone();
    let next = Arc::clone(next);

    let continuation = async move {
      let settled = deferred
        .await
        .and_then(|outcome| resolver.resolve_outcome(outcome, &trigger, &next));
      match settled {
        Ok(Verdict::Proceed) => {
          event!(Level::DEBUG, "Deferred outcome settled, forwarding triggering action.");
          next(trigger);
        }
        Ok(verdict) => {
          event!(Level::DEBUG, ?verdict, "Deferred outcome settled, triggering action stays suppressed.");
        }
        Err(err) => {
          let err = err.in_deferred(trigger.action_type());
          resolver.on_deferred_failure.surface(&trigger, err);
        }
      }
    };

    self.executor.spawn(continuation.in_current_span().boxed())?;
    event!(Level::TRACE, "Deferred continuation scheduled.");
    Ok(Verdict::Deferred)
  }
}
