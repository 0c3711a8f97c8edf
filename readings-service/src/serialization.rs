//! Structural checks that turn an untrusted JSON payload into a [`CustomerReading`].
//!
//! Only shape is checked here: presence and primitive type of every field plus the
//! timestamp format. Business rules (blank ids, empty `read`, the date floor) are a
//! separate pass in `readings_core::domain`, with a distinct error type.

use std::collections::HashMap;

use readings_core::domain::{CustomerReading, RegisterValue};
use readings_core::timestamp;
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// The payload cannot be interpreted as the domain shape.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SerializationError(pub String);

type Object = Map<String, Value>;

fn require_property<'a>(object: &'a Object, key: &str) -> Result<&'a Value, SerializationError> {
    object
        .get(key)
        .ok_or_else(|| SerializationError(format!("{key} is required")))
}

fn require_string(object: &Object, key: &str) -> Result<String, SerializationError> {
    match require_property(object, key)? {
        Value::String(s) => Ok(s.clone()),
        _ => Err(SerializationError(format!("{key} must be a string"))),
    }
}

fn require_array<'a>(object: &'a Object, key: &str) -> Result<&'a [Value], SerializationError> {
    match require_property(object, key)? {
        Value::Array(items) => Ok(items),
        _ => Err(SerializationError(format!("{key} must be an array"))),
    }
}

fn require_timestamp(object: &Object, key: &str) -> Result<OffsetDateTime, SerializationError> {
    let s = require_string(object, key)?;
    timestamp::parse(&s)
        .map_err(|_| SerializationError(format!("{key} must be in format {}", timestamp::WIRE_FORMAT)))
}

fn require_register_value(element: &Value) -> Result<RegisterValue, SerializationError> {
    let object = element
        .as_object()
        .ok_or_else(|| SerializationError("read elements must be objects".to_string()))?;

    Ok(RegisterValue {
        register_id: require_string(object, "registerId")?,
        register_type: require_string(object, "type")?,
        value: require_string(object, "value")?,
    })
}

/// Parse a reading payload. An empty `read` array is structurally fine here.
pub fn parse_customer_reading(payload: &str) -> Result<CustomerReading, SerializationError> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| SerializationError(format!("payload must be valid JSON: {e}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| SerializationError("payload must be a JSON object".to_string()))?;

    Ok(CustomerReading {
        customer_id: require_string(object, "customerId")?,
        serial_number: require_string(object, "serialNumber")?,
        mpxn: require_string(object, "mpxn")?,
        read: require_array(object, "read")?
            .iter()
            .map(require_register_value)
            .collect::<Result<_, _>>()?,
        read_date: require_timestamp(object, "readDate")?,
    })
}

/// Raw request body variant of [`parse_customer_reading`]; non-UTF-8 bodies are malformed too.
pub fn parse_customer_reading_bytes(payload: &[u8]) -> Result<CustomerReading, SerializationError> {
    let payload = std::str::from_utf8(payload)
        .map_err(|e| SerializationError(format!("payload must be valid UTF-8: {e}")))?;
    parse_customer_reading(payload)
}

/// Optional integer query parameter, read from its leading digits (`"10abc"` is 10).
/// Values without leading digits count as absent.
pub fn optional_int(params: &HashMap<String, String>, key: &str) -> Option<i64> {
    params.get(key).and_then(|v| leading_int(v))
}

fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, unsigned) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let n: i64 = unsigned[..end].parse().ok()?;
    Some(if negative { -n } else { n })
}
