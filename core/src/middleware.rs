// sluice/src/middleware.rs

//! Defines `PipelineMiddleware<S>`, the dispatch interceptor.
//!
//! The middleware follows the usual three-stage shape of dispatch middleware:
//! it is bound to a dispatch context, then to the `Next` it forwards to, and the
//! resulting `Dispatcher` handles one action per `dispatch` call.
//!
//! ```ignore
//! let dispatcher = PipelineMiddleware::new(registry).bind(ctx).forward_to(next);
//! dispatcher.dispatch(Action::new("USER/LOGIN"))?;
//! ```

use crate::core::action::Action;
use crate::core::next::Next;
use crate::core::store_context::StoreContext;
use crate::error::SluiceResult;
use crate::pipeline::resolver::Resolver;
use crate::pipeline::runtime::{DeferredExecutor, DeferredFailurePolicy};
use crate::registry::PipelineRegistry;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Intercepts dispatched actions and runs the pipeline registered for their type.
pub struct PipelineMiddleware<S: Send + Sync + 'static> {
  registry: Option<Arc<PipelineRegistry<S>>>,
  resolver: Resolver,
}

impl<S: Send + Sync + 'static> PipelineMiddleware<S> {
  pub fn new(registry: PipelineRegistry<S>) -> Self {
    Self::from_shared(Arc::new(registry))
  }

  /// Shares one registry between several middleware instances.
  pub fn from_shared(registry: Arc<PipelineRegistry<S>>) -> Self {
    event!(Level::DEBUG, pipelines = registry.len(), "Creating pipeline middleware.");
    Self {
      registry: Some(registry),
      resolver: Resolver::new(),
    }
  }

  /// Middleware without a registry: every action is forwarded unchanged.
  pub fn passthrough() -> Self {
    Self {
      registry: None,
      resolver: Resolver::new(),
    }
  }

  pub fn with_resolver(mut self, resolver: Resolver) -> Self {
    self.resolver = resolver;
    self
  }

  /// Where deferred continuations are spawned. Defaults to `TokioExecutor`.
  pub fn with_executor(mut self, executor: impl DeferredExecutor + 'static) -> Self {
    self.resolver = self.resolver.with_executor(executor);
    self
  }

  /// What happens when a deferred outcome fails. Defaults to `DeferredFailurePolicy::Log`.
  pub fn on_deferred_failure(mut self, policy: DeferredFailurePolicy) -> Self {
    self.resolver = self.resolver.on_deferred_failure(policy);
    self
  }

  pub fn registry(&self) -> Option<&PipelineRegistry<S>> {
    self.registry.as_deref()
  }

  /// First stage: bind the dispatch context handed to every pipeline.
  pub fn bind(&self, ctx: StoreContext<S>) -> BoundMiddleware<S> {
    BoundMiddleware {
      middleware: self.clone(),
      ctx,
    }
  }
}

impl<S: Send + Sync + 'static> Clone for PipelineMiddleware<S> {
  fn clone(&self) -> Self {
    Self {
      registry: self.registry.clone(),
      resolver: self.resolver.clone(),
    }
  }
}

/// Middleware bound to a dispatch context.
pub struct BoundMiddleware<S: Send + Sync + 'static> {
  middleware: PipelineMiddleware<S>,
  ctx: StoreContext<S>,
}

impl<S: Send + Sync + 'static> BoundMiddleware<S> {
  /// Second stage: bind the next stage actions are forwarded to.
  pub fn forward_to(&self, next: Next) -> Dispatcher<S> {
    Dispatcher {
      registry: self.middleware.registry.clone(),
      resolver: self.middleware.resolver.clone(),
      ctx: self.ctx.clone(),
      next,
    }
  }
}

/// Fully bound middleware. Cheap to clone.
pub struct Dispatcher<S: Send + Sync + 'static> {
  registry: Option<Arc<PipelineRegistry<S>>>,
  resolver: Resolver,
  ctx: StoreContext<S>,
  next: Next,
}

impl<S: Send + Sync + 'static> Clone for Dispatcher<S> {
  fn clone(&self) -> Self {
    Self {
      registry: self.registry.clone(),
      resolver: self.resolver.clone(),
      ctx: self.ctx.clone(),
      next: Arc::clone(&self.next),
    }
  }
}

impl<S: Send + Sync + 'static> Dispatcher<S> {
  /// Third stage: handle one action.
  ///
  /// Without a pipeline for its type the action is forwarded unchanged. Otherwise
  /// the pipeline runs, its outcome is resolved (forwarding derived actions), and
  /// the action itself is forwarded last unless the outcome halted or deferred.
  ///
  /// Pipeline, thunk and sequence-pull failures are returned to the caller.
  #[instrument(
        name = "Dispatcher::dispatch",
        skip_all,
        fields(action_type = action.action_type()),
        err(Display)
    )]
  pub fn dispatch(&self, action: Action) -> SluiceResult<()> {
    let Some(pipeline) = self.registry.as_deref().and_then(|r| r.get(action.action_type())) else {
      event!(Level::TRACE, "No pipeline registered, passing through.");
      (self.next)(action);
      return Ok(());
    };

    event!(Level::DEBUG, "Running pipeline.");
    let outcome = pipeline(&action, &self.ctx).map_err(|e| e.in_pipeline(action.action_type()))?;
    let verdict = self.resolver.resolve(outcome, &action, &self.next)?;

    if verdict.should_forward() {
      event!(Level::TRACE, "Forwarding triggering action.");
      (self.next)(action);
    } else {
      event!(Level::DEBUG, ?verdict, "Triggering action suppressed.");
    }
    Ok(())
  }

  pub fn context(&self) -> &StoreContext<S> {
    &self.ctx
  }

  /// Turns this dispatcher into a `Next`, so it can be the forward target of an
  /// outer middleware. `Next` cannot fail, so dispatch errors are logged instead.
  pub fn into_next(self) -> Next {
    Arc::new(move |action: Action| {
      let action_type = action.action_type().to_string();
      if let Err(err) = self.dispatch(action) {
        event!(Level::ERROR, action_type = %action_type, error = %err, "Dispatch through chained middleware failed.");
      }
    })
  }
}
