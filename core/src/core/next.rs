// sluice/src/core/next.rs

//! The forwarding callback that hands actions to the next stage.

use crate::core::action::Action;
use std::sync::Arc;

/// Forwards an action to the next stage of the dispatch system.
///
/// Shared (`Arc`) because a deferred continuation keeps calling it after the
/// dispatch that created it has returned.
pub type Next = Arc<dyn Fn(Action) + Send + Sync>;

pub fn next_fn(f: impl Fn(Action) + Send + Sync + 'static) -> Next {
  Arc::new(f)
}
