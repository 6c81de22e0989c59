// sluice/src/core/outcome.rs

//! Defines `Outcome`, the value a pipeline returns, and the helpers used to
//! build one. Outcomes are classified once, when they are constructed, and the
//! resolver matches on the variant.

use crate::core::action::Action;
use crate::error::SluiceResult;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::fmt;
use std::future::Future;

/// Zero-argument function producing a nested outcome.
pub type Thunk = Box<dyn FnOnce() -> SluiceResult<Outcome> + Send>;

/// Lazy, possibly infinite sequence of outcomes. Pulled one element at a time
/// and never restarted; a failed pull propagates.
pub type OutcomeSequence = Box<dyn Iterator<Item = SluiceResult<Outcome>> + Send>;

/// Asynchronous value that settles to a nested outcome, or fails.
pub type DeferredOutcome = BoxFuture<'static, SluiceResult<Outcome>>;

/// Everything a pipeline may return.
#[derive(Default)]
pub enum Outcome {
  /// No interception happened; the triggering action flows on.
  #[default]
  None,
  /// A derived action to forward.
  Action(Action),
  /// A function to call for the real outcome. May nest arbitrarily deep.
  Thunk(Thunk),
  /// Outcomes pulled and resolved in order, stopping at the first halt.
  Sequence(OutcomeSequence),
  /// An outcome that is only known later.
  Deferred(DeferredOutcome),
}

/// Variant label, used in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
  None,
  Action,
  Thunk,
  Sequence,
  Deferred,
}

impl fmt::Display for OutcomeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      OutcomeKind::None => "none",
      OutcomeKind::Action => "action",
      OutcomeKind::Thunk => "thunk",
      OutcomeKind::Sequence => "sequence",
      OutcomeKind::Deferred => "deferred",
    };
    f.write_str(label)
  }
}

impl Outcome {
  pub fn none() -> Self {
    Outcome::None
  }

  pub fn action(action: Action) -> Self {
    Outcome::Action(action)
  }

  /// Wraps an infallible closure.
  pub fn thunk<F, O>(f: F) -> Self
  where
    F: FnOnce() -> O + Send + 'static,
    O: Into<Outcome>,
  {
    Outcome::Thunk(Box::new(move || -> SluiceResult<Outcome> { Ok(f().into()) }))
  }

  /// Wraps a closure that may fail. The error propagates out of `resolve`.
  pub fn try_thunk<F>(f: F) -> Self
  where
    F: FnOnce() -> SluiceResult<Outcome> + Send + 'static,
  {
    Outcome::Thunk(Box::new(f))
  }

  /// Lazy sequence over any iterator of outcome-like items.
  pub fn sequence<I>(items: I) -> Self
  where
    I: IntoIterator,
    I::Item: Into<Outcome>,
    I::IntoIter: Send + 'static,
  {
    Outcome::Sequence(Box::new(items.into_iter().map(|item| -> SluiceResult<Outcome> { Ok(item.into()) })))
  }

  /// Lazy sequence whose pulls may fail.
  pub fn try_sequence<I>(items: I) -> Self
  where
    I: IntoIterator<Item = SluiceResult<Outcome>>,
    I::IntoIter: Send + 'static,
  {
    Outcome::Sequence(Box::new(items.into_iter()))
  }

  /// Deferred outcome from any future that settles to something outcome-like.
  pub fn deferred<F, O>(fut: F) -> Self
  where
    F: Future<Output = SluiceResult<O>> + Send + 'static,
    O: Into<Outcome>,
  {
    Outcome::Deferred(fut.map(|settled| settled.map(Into::<Outcome>::into)).boxed())
  }

  /// Classifies an untyped value. Only an object with a string `type` field is
  /// an action; every other shape is ignored and behaves as `Outcome::None`.
  pub fn from_value(value: Value) -> Self {
    match Action::from_value(value) {
      Some(action) => Outcome::Action(action),
      None => Outcome::None,
    }
  }

  pub fn kind(&self) -> OutcomeKind {
    match self {
      Outcome::None => OutcomeKind::None,
      Outcome::Action(_) => OutcomeKind::Action,
      Outcome::Thunk(_) => OutcomeKind::Thunk,
      Outcome::Sequence(_) => OutcomeKind::Sequence,
      Outcome::Deferred(_) => OutcomeKind::Deferred,
    }
  }
}

impl fmt::Debug for Outcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Outcome::Action(action) => f.debug_tuple("Action").field(action).finish(),
      other => write!(f, "Outcome::{}", other.kind()),
    }
  }
}

impl From<Action> for Outcome {
  fn from(action: Action) -> Self {
    Outcome::Action(action)
  }
}

impl From<Option<Action>> for Outcome {
  fn from(action: Option<Action>) -> Self {
    action.map_or(Outcome::None, Outcome::Action)
  }
}

impl From<Option<Outcome>> for Outcome {
  fn from(outcome: Option<Outcome>) -> Self {
    outcome.unwrap_or_default()
  }
}

impl From<()> for Outcome {
  fn from(_: ()) -> Self {
    Outcome::None
  }
}

impl From<Value> for Outcome {
  fn from(value: Value) -> Self {
    Outcome::from_value(value)
  }
}

/// An eager list of outcomes is resolved like a sequence.
impl From<Vec<Outcome>> for Outcome {
  fn from(items: Vec<Outcome>) -> Self {
    Outcome::sequence(items)
  }
}
