// sluice/examples/pipeline_halt.rs

use parking_lot::Mutex;
use sluice::{next_fn, Action, Outcome, PipelineMiddleware, PipelineRegistry, SluiceError, StoreContext};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone, Debug, Default)]
struct CartState {
  items: u32,
  limit: u32,
}

const ADD_ITEM: &str = "CART/ADD_ITEM";
const LIMIT_REACHED: &str = "CART/LIMIT_REACHED";

fn main() -> Result<(), SluiceError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Pipeline Halt Example ---");

  // Reject additions past the limit: the rejection is forwarded with `halt`,
  // which keeps ADD_ITEM itself from reaching the next stage.
  let registry = PipelineRegistry::builder()
    .on(ADD_ITEM, |_: &Action, ctx: &StoreContext<CartState>| {
      let state = ctx.state();
      if state.items >= state.limit {
        Outcome::action(Action::new(LIMIT_REACHED).with("limit", state.limit).halted())
      } else {
        Outcome::none()
      }
    })
    .build();

  let ctx = StoreContext::new(CartState { items: 0, limit: 2 });
  let received = Arc::new(Mutex::new(Vec::new()));
  let sink = received.clone();
  let reducer_ctx = ctx.clone();
  let dispatcher = PipelineMiddleware::new(registry)
    .bind(ctx.clone())
    .forward_to(next_fn(move |action| {
      // A tiny reducer standing in for the real consumer.
      if action.action_type() == ADD_ITEM {
        reducer_ctx.state_mut().items += 1;
      }
      sink.lock().push(action.action_type().to_string());
    }));

  for _ in 0..3 {
    dispatcher.dispatch(Action::new(ADD_ITEM))?;
  }

  let received = received.lock();
  info!("next stage received: {:?}", *received);
  if received.as_slice() != [ADD_ITEM, ADD_ITEM, LIMIT_REACHED] {
    error!("Unexpected forwarding order!");
  }
  assert_eq!(ctx.state().items, 2, "Halted addition reached the reducer.");
  Ok(())
}
