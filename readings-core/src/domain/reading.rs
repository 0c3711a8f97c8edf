use serde::{Deserialize, Serialize};
use time::{macros::datetime, OffsetDateTime};

use super::invariant::{invariant, not_blank, not_empty, InvariantResult};

// Arbitrary floor, mostly to catch clients sending zeroed dates.
pub const EARLIEST_READING_DATE: OffsetDateTime = datetime!(2000-01-01 00:00:00 UTC);
pub const EARLIEST_READING_DATE_MESSAGE: &str = "reading must have been taken after 2000-01-01T00:00:00Z";

/// One register's value within a meter reading.
///
/// `value` stays an opaque string; numeric interpretation is up to consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterValue {
    pub register_id: String,
    // could be an enum once register types are well-defined
    #[serde(rename = "type")]
    pub register_type: String,
    pub value: String,
}

/// A simultaneous reading of all registers on a meter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterReading {
    pub read: Vec<RegisterValue>,
    pub read_date: OffsetDateTime,
}

pub trait HasMeterReading {
    fn read(&self) -> &[RegisterValue];
    fn read_date(&self) -> OffsetDateTime;
}

impl HasMeterReading for MeterReading {
    fn read(&self) -> &[RegisterValue] {
        &self.read
    }

    fn read_date(&self) -> OffsetDateTime {
        self.read_date
    }
}

pub fn validate_register_value(register_value: &RegisterValue) -> InvariantResult {
    invariant("registerId must not be blank", not_blank(&register_value.register_id))?;
    invariant("type must not be blank", not_blank(&register_value.register_type))?;
    invariant("value must not be blank", not_blank(&register_value.value))
}

pub fn validate_meter_reading(meter_reading: &impl HasMeterReading) -> InvariantResult {
    let read = meter_reading.read();

    invariant("must have at least one register reading", not_empty(read))?;
    read.iter().try_for_each(validate_register_value)?;

    invariant(
        EARLIEST_READING_DATE_MESSAGE,
        meter_reading.read_date() >= EARLIEST_READING_DATE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn register(register_id: &str, register_type: &str, value: &str) -> RegisterValue {
        RegisterValue {
            register_id: register_id.to_string(),
            register_type: register_type.to_string(),
            value: value.to_string(),
        }
    }

    fn reading_at(read_date: OffsetDateTime) -> MeterReading {
        MeterReading {
            read: vec![register("reg", "ANYTIME", "123")],
            read_date,
        }
    }

    #[test]
    fn register_value_requires_every_field() {
        assert!(validate_register_value(&register("reg", "ANYTIME", "1")).is_ok());

        let cases = [
            (register(" ", "ANYTIME", "1"), "registerId must not be blank"),
            (register("reg", "\t", "1"), "type must not be blank"),
            (register("reg", "ANYTIME", ""), "value must not be blank"),
        ];
        for (rv, expected) in cases {
            let err = validate_register_value(&rv).unwrap_err();
            assert_eq!(err.message(), expected);
        }
    }

    #[test]
    fn register_value_reports_first_blank_field() {
        let err = validate_register_value(&register("", "", "")).unwrap_err();
        assert_eq!(err.message(), "registerId must not be blank");
    }

    #[test]
    fn meter_reading_requires_a_register() {
        let reading = MeterReading {
            read: vec![],
            read_date: datetime!(2017-01-01 01:01:01 UTC),
        };
        let err = validate_meter_reading(&reading).unwrap_err();
        assert_eq!(err.message(), "must have at least one register reading");
    }

    #[test]
    fn meter_reading_validates_each_register() {
        let reading = MeterReading {
            read: vec![register("a", "DAY", "1"), register("b", "NIGHT", " ")],
            read_date: datetime!(2017-01-01 01:01:01 UTC),
        };
        let err = validate_meter_reading(&reading).unwrap_err();
        assert_eq!(err.message(), "value must not be blank");
    }

    #[test]
    fn meter_reading_accepts_the_earliest_date() {
        assert!(validate_meter_reading(&reading_at(EARLIEST_READING_DATE)).is_ok());
        // same instant, different offset
        assert!(validate_meter_reading(&reading_at(datetime!(2000-01-01 01:00:00 +01:00))).is_ok());
    }

    #[test]
    fn meter_reading_rejects_a_millisecond_before_the_earliest_date() {
        let err = validate_meter_reading(&reading_at(EARLIEST_READING_DATE - Duration::milliseconds(1)))
            .unwrap_err();
        assert_eq!(err.message(), "reading must have been taken after 2000-01-01T00:00:00Z");
    }

    #[test]
    fn earliest_date_message_names_the_floor() {
        let floor = crate::timestamp::format(EARLIEST_READING_DATE).unwrap();
        assert_eq!(EARLIEST_READING_DATE_MESSAGE, format!("reading must have been taken after {floor}"));
    }

    #[test]
    fn register_value_uses_wire_field_names() {
        let json = serde_json::to_value(register("reg", "TYPE", "123")).unwrap();
        assert_eq!(json, serde_json::json!({"registerId": "reg", "type": "TYPE", "value": "123"}));
    }
}
