// sluice/src/core/store_context.rs
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Dispatch context handed to every pipeline alongside the triggering action.
///
/// Wraps the application state in shared ownership with interior mutability, so
/// pipelines can read the current state (and deferred pipelines can read it again
/// when they settle).
///
/// IMPORTANT: Lock guards obtained from this struct are blocking and MUST NOT
/// be held across `.await` suspension points in asynchronous code.
#[derive(Debug)]
pub struct StoreContext<S: Send + Sync + 'static>(Arc<RwLock<S>>);

impl<S: Send + Sync + 'static> StoreContext<S> {
  pub fn new(state: S) -> Self {
    StoreContext(Arc::new(RwLock::new(state)))
  }

  /// Read access to the current state.
  pub fn state(&self) -> RwLockReadGuard<'_, S> {
    self.0.read()
  }

  /// Write access to the state. The downstream consumer is usually the one
  /// doing this; pipelines should prefer forwarding actions.
  pub fn state_mut(&self) -> RwLockWriteGuard<'_, S> {
    self.0.write()
  }

  /// Guard over one part of the state, e.g. `ctx.map_state(|s| &s.user)`.
  pub fn map_state<F, U: ?Sized>(&self, f: F) -> MappedRwLockReadGuard<'_, U>
  where
    F: FnOnce(&S) -> &U,
  {
    RwLockReadGuard::map(self.state(), f)
  }

  /// Owned copy of the state, safe to move into a deferred outcome.
  pub fn snapshot(&self) -> S
  where
    S: Clone,
  {
    self.state().clone()
  }
}

impl<S: Send + Sync + 'static> Clone for StoreContext<S> {
  fn clone(&self) -> Self {
    StoreContext(Arc::clone(&self.0))
  }
}

impl<S: Send + Sync + 'static + Default> Default for StoreContext<S> {
  fn default() -> Self {
    Self::new(Default::default())
  }
}
