// sluice/src/core/control.rs

//! Defines the verdict produced by resolving an outcome.

/// Decision about the *triggering* action after an outcome has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
  /// Nothing halted. The caller should forward the triggering action.
  Proceed,
  /// A halting action was forwarded. The triggering action is suppressed and
  /// no further outcomes of the enclosing chain are resolved.
  Halted,
  /// A deferred outcome took over the decision. The caller must not forward the
  /// triggering action; the deferred continuation forwards it later if nothing
  /// inside it halts.
  Deferred,
}

impl Verdict {
  /// `true` only for `Proceed`.
  pub fn should_forward(self) -> bool {
    matches!(self, Verdict::Proceed)
  }

  pub(crate) fn from_halt(halt: bool) -> Self {
    if halt {
      Verdict::Halted
    } else {
      Verdict::Proceed
    }
  }
}

impl From<Verdict> for bool {
  fn from(verdict: Verdict) -> Self {
    verdict.should_forward()
  }
}
