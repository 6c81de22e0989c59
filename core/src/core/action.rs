// sluice/src/core/action.rs

//! Defines the `Action` record that flows through the dispatch system.

use crate::error::SluiceError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{event, Level};

/// A named event flowing through the dispatch system.
///
/// Only `action_type` and `halt` are inspected by sluice. Everything else lives in
/// the payload and is handed to the next stage untouched. On the wire an action is
/// a flat object: `{"type": "...", "halt": true, ...payload}`. Deserializing
/// applies the same rules as `Action::from_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Action {
  #[serde(rename = "type")]
  action_type: String,
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  halt: bool,
  #[serde(flatten)]
  payload: Map<String, Value>,
}

impl Action {
  pub fn new(action_type: impl Into<String>) -> Self {
    Self {
      action_type: action_type.into(),
      halt: false,
      payload: Map::new(),
    }
  }

  /// Adds (or replaces) a payload field.
  ///
  /// `"halt"` sets the halt flag instead (only boolean `true` halts) and
  /// `"type"` is ignored, so neither key ever ends up in the payload.
  pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    let key = key.into();
    let value = value.into();
    match key.as_str() {
      "halt" => self.halt = matches!(value, Value::Bool(true)),
      "type" => {
        event!(Level::WARN, action_type = %self.action_type, ignored = %value, "Action type cannot be changed through `with`.");
      }
      _ => {
        self.payload.insert(key, value);
      }
    }
    self
  }

  /// Marks the action as halting: it is still forwarded, but resolution of
  /// the enclosing chain stops after it.
  pub fn halted(self) -> Self {
    self.with_halt(true)
  }

  pub fn with_halt(mut self, halt: bool) -> Self {
    self.halt = halt;
    self
  }

  pub fn action_type(&self) -> &str {
    &self.action_type
  }

  pub fn is_halt(&self) -> bool {
    self.halt
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.payload.get(key)
  }

  pub fn payload(&self) -> &Map<String, Value> {
    &self.payload
  }

  /// Classifies an untyped value as an action.
  ///
  /// Returns `Some` if and only if `value` is an object with a string `type` field.
  /// `halt` is only honoured when it is literally `true`; any other value is
  /// treated as absent and stays out of the payload.
  pub fn from_value(value: Value) -> Option<Action> {
    let Value::Object(mut fields) = value else {
      return None;
    };
    let action_type = match fields.remove("type") {
      Some(Value::String(action_type)) => action_type,
      _ => return None,
    };
    let halt = matches!(fields.remove("halt"), Some(Value::Bool(true)));
    Some(Action {
      action_type,
      halt,
      payload: fields,
    })
  }

  pub fn to_value(&self) -> Value {
    let mut fields = self.payload.clone();
    fields.insert("type".to_string(), Value::String(self.action_type.clone()));
    if self.halt {
      fields.insert("halt".to_string(), Value::Bool(true));
    }
    Value::Object(fields)
  }
}

impl TryFrom<Value> for Action {
  type Error = SluiceError;

  fn try_from(value: Value) -> Result<Self, Self::Error> {
    Action::from_value(value).ok_or(SluiceError::NotAnAction)
  }
}
