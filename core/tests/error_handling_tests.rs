// tests/error_handling_tests.rs
mod common;

use common::*;
use serde_json::json;
use sluice::{Action, PipelineRegistry, SluiceError};

#[test]
fn test_pipeline_failure_propagates_with_action_type() {
  setup_tracing();
  let recorder = Recorder::new();
  let registry = PipelineRegistry::builder()
    .try_on(ACTION1, |_, _| Err::<sluice::Action, _>(anyhow::Error::new(TestError::Pipeline("boom".into()))))
    .build();
  let dispatcher = dispatcher_for(registry, &recorder);

  let result = dispatcher.dispatch(action1(false));

  match result {
    Err(SluiceError::PipelineFailure { action_type, source }) => {
      assert_eq!(action_type, ACTION1);
      assert_eq!(source.downcast_ref::<TestError>(), Some(&TestError::Pipeline("boom".into())));
    }
    other => panic!("Expected SluiceError::PipelineFailure, got {:?}", other),
  }
  // Neither derived nor triggering action reached the next stage.
  assert_eq!(recorder.len(), 0);
}

#[test]
fn test_pipeline_returning_sluice_error_keeps_it() {
  setup_tracing();
  let recorder = Recorder::new();
  // The pipeline decodes a follow-up action from the payload; `next` is not an action.
  let registry = PipelineRegistry::builder()
    .try_on(ACTION1, |action, _| Action::try_from(action.get("next").cloned().unwrap_or_default()))
    .build();
  let dispatcher = dispatcher_for(registry, &recorder);

  match dispatcher.dispatch(action1(false).with("next", json!({ "type": 7 }))) {
    Err(SluiceError::NotAnAction) => {}
    other => panic!("Expected SluiceError::NotAnAction, got {:?}", other),
  }
  assert_eq!(recorder.len(), 0);
}

#[test]
fn test_failing_pipeline_does_not_affect_other_types() {
  setup_tracing();
  let recorder = Recorder::new();
  let registry = PipelineRegistry::builder()
    .try_on(ACTION1, |_, _| Err::<sluice::Action, _>(anyhow::anyhow!("broken")))
    .on(ACTION2, |_, _| action3(true))
    .build();
  let dispatcher = dispatcher_for(registry, &recorder);

  assert!(dispatcher.dispatch(action1(false)).is_err());
  dispatcher.dispatch(action2(false)).unwrap();

  assert_eq!(recorder.calls(), vec![call(ACTION3, true), call(ACTION2, false)]);
}

#[test]
fn test_anyhow_wrapped_sluice_error_is_unwrapped() {
  let original = SluiceError::ExecutorUnavailable {
    reason: "none".to_string(),
  };
  let converted = SluiceError::from(anyhow::Error::new(original));
  assert!(matches!(converted, SluiceError::ExecutorUnavailable { .. }));
}
