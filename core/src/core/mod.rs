pub mod action;
pub mod control;
pub mod next;
pub mod outcome;
pub mod store_context;

// Re-export key types for easier access from other sluice modules (and lib.rs)
pub use action::Action;
pub use control::Verdict;
pub use next::{next_fn, Next};
pub use outcome::{Outcome, OutcomeKind};
pub use store_context::StoreContext;
