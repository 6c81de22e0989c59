// sluice/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SluiceError {
  #[error("Pipeline for action '{action_type}' failed. Source: {source}")]
  PipelineFailure {
    action_type: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Pulling the next outcome of a sequence failed for action '{action_type}'. Source: {source}")]
  SequencePull {
    action_type: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Deferred outcome for action '{action_type}' failed; the action was dropped. Source: {source}")]
  DeferredFailure {
    action_type: String,
    #[source]
    source: AnyhowError,
  },

  #[error("No executor available to run a deferred outcome: {reason}")]
  ExecutorUnavailable { reason: String },

  #[error("Error in user-provided pipeline, thunk or deferred value. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Value is not an action: it needs an object with a string `type` field")]
  NotAnAction,
}

impl SluiceError {
  /// Attaches the triggering action type to a failure that surfaced while
  /// invoking its pipeline. Errors already carrying context are left alone.
  pub(crate) fn in_pipeline(self, action_type: &str) -> Self {
    match self {
      SluiceError::HandlerError { source } => SluiceError::PipelineFailure {
        action_type: action_type.to_string(),
        source,
      },
      other => other,
    }
  }

  /// Same as `in_pipeline`, for failures raised while pulling a sequence.
  pub(crate) fn in_sequence(self, action_type: &str) -> Self {
    match self {
      SluiceError::HandlerError { source } => SluiceError::SequencePull {
        action_type: action_type.to_string(),
        source,
      },
      other => other,
    }
  }

  /// Wraps a failed deferred value. Nested sluice errors are kept as the source.
  pub(crate) fn in_deferred(self, action_type: &str) -> Self {
    match self {
      SluiceError::DeferredFailure { .. } => self,
      SluiceError::HandlerError { source } => SluiceError::DeferredFailure {
        action_type: action_type.to_string(),
        source,
      },
      other => SluiceError::DeferredFailure {
        action_type: action_type.to_string(),
        source: AnyhowError::new(other),
      },
    }
  }
}

// External errors raised by user code become `HandlerError`; the resolver
// adds the action type once it knows where the failure came from.
impl From<AnyhowError> for SluiceError {
  fn from(err: AnyhowError) -> Self {
    match err.downcast::<SluiceError>() {
      Ok(sluice_err) => sluice_err,
      Err(err) => SluiceError::HandlerError { source: err },
    }
  }
}

pub type SluiceResult<T, E = SluiceError> = std::result::Result<T, E>;
