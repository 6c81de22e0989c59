// sluice/src/pipeline/definition.rs

//! Defines the `Pipeline<S>` handler type bound to an action type.

use crate::core::action::Action;
use crate::core::outcome::Outcome;
use crate::core::store_context::StoreContext;
use crate::error::SluiceResult;
use std::sync::Arc;

/// A handler bound to an action type.
///
/// Called with the triggering action and the dispatch context; returns the
/// `Outcome` the resolver interprets. An `Err` propagates out of `dispatch`
/// untouched, so pipeline bugs are never masked.
pub type Pipeline<S> = Arc<dyn Fn(&Action, &StoreContext<S>) -> SluiceResult<Outcome> + Send + Sync>;

/// Wraps an infallible closure returning anything outcome-like.
pub fn pipeline<S, F, O>(f: F) -> Pipeline<S>
where
  S: Send + Sync + 'static,
  F: Fn(&Action, &StoreContext<S>) -> O + Send + Sync + 'static,
  O: Into<Outcome>,
{
  Arc::new(move |action: &Action, ctx: &StoreContext<S>| -> SluiceResult<Outcome> {
    Ok(f(action, ctx).into())
  })
}

/// Wraps a fallible closure. Any error convertible into `SluiceError` (including
/// `anyhow::Error`) is accepted.
pub fn try_pipeline<S, F, O, E>(f: F) -> Pipeline<S>
where
  S: Send + Sync + 'static,
  F: Fn(&Action, &StoreContext<S>) -> Result<O, E> + Send + Sync + 'static,
  O: Into<Outcome>,
  E: Into<crate::error::SluiceError>,
{
  Arc::new(move |action: &Action, ctx: &StoreContext<S>| -> SluiceResult<Outcome> {
    f(action, ctx).map(Into::into).map_err(Into::into)
  })
}
