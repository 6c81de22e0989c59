// sluice/examples/deferred_outcome.rs

use sluice::{
  next_fn, Action, DeferredFailurePolicy, Outcome, PipelineMiddleware, PipelineRegistry, SluiceError, StoreContext,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

const FETCH_PROFILE: &str = "PROFILE/FETCH";
const PROFILE_LOADED: &str = "PROFILE/LOADED";

async fn load_profile(id: u64) -> Result<Action, SluiceError> {
  // Pretend to call a backend.
  tokio::time::sleep(Duration::from_millis(50)).await;
  if id == 0 {
    return Err(anyhow::anyhow!("profile {} not found", id).into());
  }
  Ok(Action::new(PROFILE_LOADED).with("id", id).with("name", "Ada"))
}

#[tokio::main]
async fn main() -> Result<(), SluiceError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Deferred Outcome Example ---");

  let registry = PipelineRegistry::builder()
    .on(FETCH_PROFILE, |action: &Action, _: &StoreContext<()>| {
      let id = action.get("id").and_then(|v| v.as_u64()).unwrap_or_default();
      Outcome::deferred(load_profile(id))
    })
    .build();

  let (tx, mut rx) = mpsc::unbounded_channel();
  let dispatcher = PipelineMiddleware::new(registry)
    .on_deferred_failure(DeferredFailurePolicy::report(|trigger, err| {
      info!(action_type = trigger.action_type(), "profile fetch failed: {}", err);
    }))
    .bind(StoreContext::new(()))
    .forward_to(next_fn(move |action| {
      let _ = tx.send(action);
    }));

  // Returns immediately; FETCH_PROFILE is forwarded after PROFILE_LOADED.
  dispatcher.dispatch(Action::new(FETCH_PROFILE).with("id", 7))?;
  // Fails later; FETCH_PROFILE with id 0 is dropped and reported.
  dispatcher.dispatch(Action::new(FETCH_PROFILE).with("id", 0))?;

  for _ in 0..2 {
    if let Some(action) = rx.recv().await {
      info!("next stage received {}", action.to_value());
    }
  }
  tokio::time::sleep(Duration::from_millis(100)).await;
  Ok(())
}
