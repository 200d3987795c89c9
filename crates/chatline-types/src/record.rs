use serde::Serialize;
use serde_json::Value;

use crate::event::StreamEvent;

/// The JSON object carried by one `data: ` line.
///
/// All three fields are optional on the wire:
///
/// ```text
/// ┌───────┬─────────┬──────────────────────────────────────────────┐
/// │ Key   │ Type    │ Meaning                                      │
/// ├───────┼─────────┼──────────────────────────────────────────────┤
/// │ chunk │ string  │ Text fragment to append (ignored when empty) │
/// │ done  │ boolean │ Stream complete (any truthy value counts)    │
/// │ error │ string  │ Server failure message (ignored when empty)  │
/// └───────┴─────────┴──────────────────────────────────────────────┘
/// ```
///
/// Producers in the wild are loose about types, so decoding never rejects
/// a record for a mistyped field. `done` follows JavaScript truthiness. A
/// non-string truthy `error` is kept as its JSON text so the failure is
/// not lost. A non-string `chunk` is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk: Option<String>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub done: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Record {
    /// Interpret a parsed JSON payload.
    ///
    /// Values that are not objects (arrays, numbers, `null`) carry no
    /// fields and produce an empty record.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let chunk = match value.get("chunk") {
            Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
            _ => None,
        };

        let done = value.get("done").is_some_and(is_truthy);

        let error = match value.get("error") {
            Some(Value::String(message)) if !message.is_empty() => Some(message.clone()),
            Some(Value::String(_)) | None => None,
            Some(other) if is_truthy(other) => Some(other.to_string()),
            Some(_) => None,
        };

        Self { chunk, done, error }
    }

    /// Serialize to the compact JSON text used on the wire.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }

    /// Events this record produces, in emission order.
    ///
    /// The chunk comes first. `done` is checked before `error`, so a record
    /// carrying both ends the stream successfully.
    #[must_use]
    pub fn into_events(self) -> Vec<StreamEvent> {
        let mut events = Vec::with_capacity(2);
        if let Some(text) = self.chunk {
            events.push(StreamEvent::Chunk { text });
        }
        if self.done {
            events.push(StreamEvent::Done);
        } else if let Some(message) = self.error {
            events.push(StreamEvent::Failure { message });
        }
        events
    }
}

/// JavaScript truthiness for a JSON value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
