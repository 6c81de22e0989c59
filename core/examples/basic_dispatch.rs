// sluice/examples/basic_dispatch.rs

use sluice::{next_fn, Action, Outcome, PipelineMiddleware, PipelineRegistry, SluiceError, StoreContext};
use tracing::info;

// 1. Define the application state pipelines can read
#[derive(Clone, Debug, Default)]
struct AppState {
  user: Option<String>,
}

const LOGIN: &str = "USER/LOGIN";
const WELCOME: &str = "UI/WELCOME";
const AUDIT: &str = "AUDIT/RECORD";

fn main() -> Result<(), SluiceError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Basic Dispatch Example ---");

  // 2. Register pipelines per action type
  let registry = PipelineRegistry::builder()
    .on(LOGIN, |action: &Action, ctx: &StoreContext<AppState>| {
      let user = action.get("user").cloned().unwrap_or_default();
      let returning = ctx.state().user.is_some();
      // Derived actions are forwarded first, then LOGIN itself.
      Outcome::sequence(vec![
        Action::new(AUDIT).with("event", "login").with("user", user.clone()),
        Action::new(WELCOME).with("user", user).with("returning", returning),
      ])
    })
    .build();

  // 3. Bind the middleware to a context and a next stage
  let dispatcher = PipelineMiddleware::new(registry)
    .bind(StoreContext::new(AppState::default()))
    .forward_to(next_fn(|action| {
      info!("next stage received {}", action.to_value());
    }));

  // 4. Dispatch
  dispatcher.dispatch(Action::new(LOGIN).with("user", "ada"))?;
  // No pipeline for AUDIT: passes straight through.
  dispatcher.dispatch(Action::new(AUDIT).with("event", "manual"))?;
  Ok(())
}
