// sluice/src/pipeline/mod.rs

//! Pipelines, the outcome resolver, and the runtime knobs for deferred outcomes.

pub mod definition;
pub mod resolver;
pub mod runtime;

pub use definition::{pipeline, try_pipeline, Pipeline};
pub use resolver::Resolver;
pub use runtime::{DeferredExecutor, DeferredFailurePolicy, TokioExecutor};
