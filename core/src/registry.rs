// sluice/src/registry.rs

//! Defines `PipelineRegistry<S>`, the action-type keyed map of pipelines.
//! A registry is assembled once through `PipelineRegistryBuilder` and is
//! read-only afterwards.

use crate::core::action::Action;
use crate::core::outcome::Outcome;
use crate::core::store_context::StoreContext;
use crate::error::SluiceError;
use crate::pipeline::definition::{pipeline, try_pipeline, Pipeline};
use std::collections::HashMap;
use tracing::{event, Level};

/// Maps action types to pipelines.
///
/// Missing entries are legal and mean "no interception". An entry can also be
/// registered as explicitly unbound, which behaves the same way.
pub struct PipelineRegistry<S: Send + Sync + 'static> {
  pipelines: HashMap<String, Option<Pipeline<S>>>,
}

impl<S: Send + Sync + 'static> PipelineRegistry<S> {
  pub fn builder() -> PipelineRegistryBuilder<S> {
    PipelineRegistryBuilder::new()
  }

  /// Registry with no pipelines: every action passes through.
  pub fn empty() -> Self {
    Self {
      pipelines: HashMap::new(),
    }
  }

  /// Pipeline bound to `action_type`, if any.
  pub fn get(&self, action_type: &str) -> Option<&Pipeline<S>> {
    self.pipelines.get(action_type).and_then(Option::as_ref)
  }

  pub fn contains(&self, action_type: &str) -> bool {
    self.get(action_type).is_some()
  }

  /// Number of bound pipelines. Unbound entries are not counted.
  pub fn len(&self) -> usize {
    self.pipelines.values().filter(|p| p.is_some()).count()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Action types with a bound pipeline, in no particular order.
  pub fn action_types(&self) -> impl Iterator<Item = &str> {
    self
      .pipelines
      .iter()
      .filter(|(_, p)| p.is_some())
      .map(|(action_type, _)| action_type.as_str())
  }
}

impl<S: Send + Sync + 'static> Default for PipelineRegistry<S> {
  fn default() -> Self {
    Self::empty()
  }
}

impl<S: Send + Sync + 'static> std::fmt::Debug for PipelineRegistry<S> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut bound: Vec<&str> = self.action_types().collect();
    bound.sort_unstable();
    f.debug_struct("PipelineRegistry").field("bound", &bound).finish()
  }
}

pub struct PipelineRegistryBuilder<S: Send + Sync + 'static> {
  pipelines: HashMap<String, Option<Pipeline<S>>>,
}

impl<S: Send + Sync + 'static> PipelineRegistryBuilder<S> {
  pub fn new() -> Self {
    Self {
      pipelines: HashMap::new(),
    }
  }

  /// Binds an infallible pipeline to `action_type`.
  pub fn on<F, O>(self, action_type: impl Into<String>, f: F) -> Self
  where
    F: Fn(&Action, &StoreContext<S>) -> O + Send + Sync + 'static,
    O: Into<Outcome>,
  {
    self.insert(action_type.into(), Some(pipeline(f)))
  }

  /// Binds a fallible pipeline to `action_type`. Its errors propagate out of `dispatch`.
  pub fn try_on<F, O, E>(self, action_type: impl Into<String>, f: F) -> Self
  where
    F: Fn(&Action, &StoreContext<S>) -> Result<O, E> + Send + Sync + 'static,
    O: Into<Outcome>,
    E: Into<SluiceError>,
  {
    self.insert(action_type.into(), Some(try_pipeline(f)))
  }

  /// Binds an already built `Pipeline`.
  pub fn with_pipeline(self, action_type: impl Into<String>, pipeline: Pipeline<S>) -> Self {
    self.insert(action_type.into(), Some(pipeline))
  }

  /// Records `action_type` with no pipeline. Such actions pass through.
  pub fn unbound(self, action_type: impl Into<String>) -> Self {
    self.insert(action_type.into(), None)
  }

  pub fn build(self) -> PipelineRegistry<S> {
    event!(Level::DEBUG, entries = self.pipelines.len(), "Pipeline registry built.");
    PipelineRegistry {
      pipelines: self.pipelines,
    }
  }

  fn insert(mut self, action_type: String, pipeline: Option<Pipeline<S>>) -> Self {
    event!(
      Level::DEBUG,
      action_type = %action_type,
      bound = pipeline.is_some(),
      "Registering pipeline."
    );
    if self.pipelines.insert(action_type.clone(), pipeline).is_some() {
      // Last registration wins.
      event!(Level::WARN, action_type = %action_type, "Replacing previously registered pipeline.");
    }
    self
  }
}

impl<S: Send + Sync + 'static> Default for PipelineRegistryBuilder<S> {
  fn default() -> Self {
    Self::new()
  }
}
