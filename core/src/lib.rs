// src/lib.rs

//! Sluice: pipeline middleware for action dispatch.
//!
//! Sluice sits between whoever dispatches actions and whoever consumes them, and
//! lets side-effect pipelines run when an action of a given type goes by:
//!  - Pipelines are registered per action type in a `PipelineRegistry`.
//!  - A pipeline returns an `Outcome`: nothing, a derived action, a thunk, a lazy
//!    sequence of outcomes, or a deferred (async) outcome.
//!  - Every derived action reached is forwarded. A derived action marked `halt`
//!    stops the chain and suppresses the triggering action.
//!  - Otherwise the triggering action is forwarded last, after everything the
//!    pipeline produced. Deferred outcomes forward it when they settle.

pub mod core;
pub mod error;
pub mod middleware;
pub mod pipeline;
pub mod registry;

// --- Re-exports for the Public API ---

pub use crate::core::action::Action;
pub use crate::core::control::Verdict;
pub use crate::core::next::{next_fn, Next};
pub use crate::core::outcome::{Outcome, OutcomeKind};
pub use crate::core::store_context::StoreContext;

pub use crate::pipeline::definition::{pipeline, try_pipeline, Pipeline};
pub use crate::pipeline::resolver::Resolver;
pub use crate::pipeline::runtime::{DeferredExecutor, DeferredFailurePolicy, FailureHook, TokioExecutor};

pub use crate::middleware::{BoundMiddleware, Dispatcher, PipelineMiddleware};
pub use crate::registry::{PipelineRegistry, PipelineRegistryBuilder};

pub use crate::error::{SluiceError, SluiceResult};

/*
    Core Workflow:
    1. Build a `PipelineRegistry<MyState>`:
       `PipelineRegistry::builder().on("USER/LOGIN", |action, ctx| ...).build()`.
    2. Wrap it in `PipelineMiddleware::new(registry)`, optionally choosing an executor
       for deferred outcomes (`.with_executor(...)`) and a failure policy
       (`.on_deferred_failure(...)`).
    3. Bind it: `.bind(StoreContext::new(state)).forward_to(next)` gives a `Dispatcher`.
    4. Call `dispatcher.dispatch(action)` for every action. Deferred outcomes need a
       tokio runtime (or a custom `DeferredExecutor`).
*/
