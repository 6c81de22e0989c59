// tests/middleware_chain_tests.rs
mod common;

use common::*;
use sluice::{Outcome, PipelineMiddleware, PipelineRegistry, StoreContext};

#[test]
fn test_dispatcher_chains_into_outer_middleware() {
  setup_tracing();
  let recorder = Recorder::new();
  let ctx = StoreContext::new(TestState::default());

  // Inner middleware sees what the outer one forwards, derived actions included.
  let inner = PipelineMiddleware::new(PipelineRegistry::builder().on(ACTION2, |_, _| action3(true)).build())
    .bind(ctx.clone())
    .forward_to(recorder.next());
  let outer = PipelineMiddleware::new(PipelineRegistry::builder().on(ACTION1, |_, _| action2(false)).build())
    .bind(ctx)
    .forward_to(inner.into_next());

  outer.dispatch(action1(true)).unwrap();

  assert_eq!(
    recorder.calls(),
    vec![call(ACTION3, true), call(ACTION2, false), call(ACTION1, true)]
  );
}

#[test]
fn test_halt_in_outer_middleware_stops_at_derived_action() {
  setup_tracing();
  let recorder = Recorder::new();
  let ctx = StoreContext::new(TestState::default());

  let inner = PipelineMiddleware::new(PipelineRegistry::builder().on(ACTION2, |_, _| Outcome::none()).build())
    .bind(ctx.clone())
    .forward_to(recorder.next());
  let outer = PipelineMiddleware::new(
    PipelineRegistry::builder()
      .on(ACTION1, |_, _| Outcome::sequence(vec![action2(true), action2(false).halted(), action3(true)]))
      .build(),
  )
  .bind(ctx)
  .forward_to(inner.into_next());

  outer.dispatch(action1(true)).unwrap();

  assert_eq!(recorder.calls(), vec![call(ACTION2, true), call(ACTION2, false)]);
}

#[test]
fn test_inner_failure_is_logged_not_propagated() {
  setup_tracing();
  let recorder = Recorder::new();
  let ctx = StoreContext::new(TestState::default());

  let inner = PipelineMiddleware::new(
    PipelineRegistry::builder()
      .try_on(ACTION2, |_, _| Err::<Outcome, _>(anyhow::anyhow!("inner broke")))
      .build(),
  )
  .bind(ctx.clone())
  .forward_to(recorder.next());
  let outer = PipelineMiddleware::new(PipelineRegistry::builder().on(ACTION1, |_, _| action2(true)).build())
    .bind(ctx)
    .forward_to(inner.into_next());

  outer.dispatch(action1(false)).unwrap();

  // ACTION2 failed inside the inner middleware; ACTION1 still flowed through it.
  assert_eq!(recorder.calls(), vec![call(ACTION1, false)]);
}
