//! Payload decoding — raw request bytes into a typed [`Submission`].
//!
//! Decoding is lenient: only a body that is empty, not JSON, or not a JSON
//! object is an error. Individual fields are coerced to strings and any key
//! that is missing or of an unusable type becomes `""`.

use crate::types::{Column, Customization, Submission};
use serde_json::{Map, Value};

/// Failure to turn a request body into a [`Submission`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("request body is empty")]
    Empty,
    #[error("request body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("request body must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Decode a request body into a [`Submission`].
pub fn decode(body: &[u8]) -> Result<Submission, DecodeError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(DecodeError::Empty);
    }
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(fields) => Ok(from_fields(&fields)),
        other => Err(DecodeError::NotAnObject(kind(&other))),
    }
}

/// Build a [`Submission`] from an already-parsed JSON object.
pub fn from_fields(fields: &Map<String, Value>) -> Submission {
    let field = |column: Column| coerce(fields.get(column.key()));

    let customization = match field(Column::CustomizationType).as_str() {
        Customization::CUSTOM_BUILD => Customization::CustomBuild {
            build_type: field(Column::BuildType),
            build_style: field(Column::BuildStyle),
            caliber: field(Column::Caliber),
            budget: field(Column::Budget),
        },
        Customization::CERAKOTE => Customization::Cerakote {
            firearm_type: field(Column::FirearmType),
            location: field(Column::Location),
            colors: field(Column::Colors),
        },
        Customization::ENGRAVING => Customization::Engraving {
            firearm_type: field(Column::FirearmType),
            location: field(Column::Location),
            engraving_type: field(Column::EngravingType),
        },
        other => Customization::Other(other.to_string()),
    };

    Submission {
        full_name: field(Column::FullName),
        email: field(Column::Email),
        phone: field(Column::Phone),
        company: field(Column::Company),
        request_type: field(Column::RequestType),
        customization,
        subject: field(Column::Subject),
        description: field(Column::Description),
        contact_method: field(Column::ContactMethod),
        comments: field(Column::Comments),
    }
}

/// Coerce one payload value to cell text.
///
/// Strings pass through verbatim, numbers keep their JSON text and `true`
/// becomes `"true"`. Everything else (absent, `null`, `false`, arrays,
/// objects) is the empty string.
fn coerce(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => String::new(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
