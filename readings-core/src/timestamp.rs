//! The single boundary where reading timestamps cross the wire.
//!
//! Inbound timestamps carry second precision and an explicit zone (`Z` or `±hh:mm`).
//! Outbound timestamps are always rendered in UTC with second precision, whatever
//! sub-second part the value holds.

use serde::Serializer;
use time::{macros::format_description, OffsetDateTime, PrimitiveDateTime, UtcOffset};

#[derive(thiserror::Error, Debug)]
pub enum TimestampError {
    #[error("timestamp must start with a four-digit year")]
    Year,
    #[error(transparent)]
    Parse(#[from] time::error::Parse),
}

/// Human-readable description of the accepted wire format, used in error messages.
pub const WIRE_FORMAT: &str = "yyyy-MM-dd'T'HH:mm:ssXXX";

pub fn parse(s: &str) -> Result<OffsetDateTime, TimestampError> {
    // `[year]` tolerates a sign, the wire format does not.
    if !s.get(..4).is_some_and(|year| year.bytes().all(|b| b.is_ascii_digit())) {
        return Err(TimestampError::Year);
    }

    let parsed = match s.strip_suffix('Z') {
        Some(local) => PrimitiveDateTime::parse(
            local,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        )
        .map(PrimitiveDateTime::assume_utc),
        None => OffsetDateTime::parse(
            s,
            format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
            ),
        ),
    };
    Ok(parsed?)
}

pub fn format(ts: OffsetDateTime) -> Result<String, time::error::Format> {
    ts.to_offset(UtcOffset::UTC)
        .format(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z"))
}

/// `serialize_with` adapter so every serialized timestamp goes through [`format`].
pub fn serialize<S>(ts: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let formatted = format(*ts).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}
