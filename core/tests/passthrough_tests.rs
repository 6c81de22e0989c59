// tests/passthrough_tests.rs
mod common;

use common::*;
use serde_json::json;
use sluice::{Outcome, PipelineMiddleware, PipelineRegistry, StoreContext};

#[test]
fn test_unrelated_actions_pass_through_without_pipelines() {
  setup_tracing();
  let recorder = Recorder::new();
  let dispatcher = dispatcher_for(PipelineRegistry::empty(), &recorder);

  dispatcher.dispatch(action1(false)).unwrap();
  dispatcher.dispatch(action2(true)).unwrap();

  assert_eq!(recorder.calls(), vec![call(ACTION1, false), call(ACTION2, true)]);
  // Forwarded unmodified.
  assert_eq!(recorder.actions()[0], action1(false));
}

#[test]
fn test_unbound_entries_pass_through() {
  setup_tracing();
  let recorder = Recorder::new();
  let registry = PipelineRegistry::<TestState>::builder().unbound(ACTION1).unbound(ACTION2).build();
  assert!(registry.is_empty());
  let dispatcher = dispatcher_for(registry, &recorder);

  dispatcher.dispatch(action1(false)).unwrap();
  dispatcher.dispatch(action2(true)).unwrap();

  assert_eq!(recorder.calls(), vec![call(ACTION1, false), call(ACTION2, true)]);
}

#[test]
fn test_none_outcome_passes_through() {
  setup_tracing();
  let recorder = Recorder::new();
  let registry = PipelineRegistry::builder()
    .on(ACTION1, |_, _| Outcome::none())
    .on(ACTION2, |_, _| ())
    .build();
  let dispatcher = dispatcher_for(registry, &recorder);

  dispatcher.dispatch(action1(false)).unwrap();
  dispatcher.dispatch(action2(true)).unwrap();

  assert_eq!(recorder.calls(), vec![call(ACTION1, false), call(ACTION2, true)]);
}

#[test]
fn test_untyped_outcomes_are_ignored() {
  setup_tracing();
  let recorder = Recorder::new();
  let registry = PipelineRegistry::builder()
    .on(ACTION1, |_, _| json!([0, 1, 2]))
    .on(ACTION2, |_, _| json!(12))
    .on(ACTION3, |_, _| json!({ "random": 1, "object": true }))
    .build();
  let dispatcher = dispatcher_for(registry, &recorder);

  dispatcher.dispatch(action1(false)).unwrap();
  dispatcher.dispatch(action2(true)).unwrap();
  dispatcher.dispatch(action3(false)).unwrap();

  assert_eq!(
    recorder.calls(),
    vec![call(ACTION1, false), call(ACTION2, true), call(ACTION3, false)]
  );
}

#[test]
fn test_non_string_type_is_not_an_action() {
  setup_tracing();
  let recorder = Recorder::new();
  let registry = PipelineRegistry::builder()
    .on(ACTION1, |_, _| json!({ "type": 7, "halt": true }))
    .build();
  let dispatcher = dispatcher_for(registry, &recorder);

  dispatcher.dispatch(action1(true)).unwrap();

  assert_eq!(recorder.calls(), vec![call(ACTION1, true)]);
}

#[test]
fn test_passthrough_middleware_forwards_everything() {
  setup_tracing();
  let recorder = Recorder::new();
  let middleware = PipelineMiddleware::<TestState>::passthrough();
  assert!(middleware.registry().is_none());
  let dispatcher = middleware
    .bind(StoreContext::new(TestState::default()))
    .forward_to(recorder.next());

  dispatcher.dispatch(action3(true)).unwrap();

  assert_eq!(recorder.calls(), vec![call(ACTION3, true)]);
}
