use serde::Serialize;
use time::OffsetDateTime;

use super::invariant::{invariant, not_blank, InvariantResult};
use super::reading::{validate_meter_reading, HasMeterReading, RegisterValue};

/// Identifies a meter used by a customer.
///
/// `customer_id` is globally unique, `serial_number` is not: a physical meter
/// may be reassigned between customers over time, so lookups always use the pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerMeter {
    pub customer_id: String,
    pub serial_number: String,
}

/// Identifies a supply point used by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerSupply {
    pub customer_id: String,
    pub mpxn: String,
}

/// A reading submitted by a customer: meter, supply point and register values in one record.
///
/// Readings are append-only facts and are never mutated once accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerReading {
    pub customer_id: String,
    pub serial_number: String,
    pub mpxn: String,
    pub read: Vec<RegisterValue>,
    #[serde(serialize_with = "crate::timestamp::serialize")]
    pub read_date: OffsetDateTime,
}

impl CustomerReading {
    pub fn customer_meter(&self) -> CustomerMeter {
        CustomerMeter {
            customer_id: self.customer_id.clone(),
            serial_number: self.serial_number.clone(),
        }
    }

    pub fn customer_supply(&self) -> CustomerSupply {
        CustomerSupply {
            customer_id: self.customer_id.clone(),
            mpxn: self.mpxn.clone(),
        }
    }
}

pub trait HasCustomerMeter {
    fn customer_id(&self) -> &str;
    fn serial_number(&self) -> &str;
}

pub trait HasCustomerSupply {
    fn customer_id(&self) -> &str;
    fn mpxn(&self) -> &str;
}

impl HasCustomerMeter for CustomerMeter {
    fn customer_id(&self) -> &str {
        &self.customer_id
    }

    fn serial_number(&self) -> &str {
        &self.serial_number
    }
}

impl HasCustomerSupply for CustomerSupply {
    fn customer_id(&self) -> &str {
        &self.customer_id
    }

    fn mpxn(&self) -> &str {
        &self.mpxn
    }
}

impl HasCustomerMeter for CustomerReading {
    fn customer_id(&self) -> &str {
        &self.customer_id
    }

    fn serial_number(&self) -> &str {
        &self.serial_number
    }
}

impl HasCustomerSupply for CustomerReading {
    fn customer_id(&self) -> &str {
        &self.customer_id
    }

    fn mpxn(&self) -> &str {
        &self.mpxn
    }
}

impl HasMeterReading for CustomerReading {
    fn read(&self) -> &[RegisterValue] {
        &self.read
    }

    fn read_date(&self) -> OffsetDateTime {
        self.read_date
    }
}

pub fn validate_customer_meter(customer_meter: &impl HasCustomerMeter) -> InvariantResult {
    invariant("customerId must not be blank", not_blank(customer_meter.customer_id()))?;
    invariant("serialNumber must not be blank", not_blank(customer_meter.serial_number()))
}

pub fn validate_customer_supply(customer_supply: &impl HasCustomerSupply) -> InvariantResult {
    invariant("customerId must not be blank", not_blank(customer_supply.customer_id()))?;
    invariant("mpxn must not be blank", not_blank(customer_supply.mpxn()))
}

/// Runs meter, supply and reading validation in that order, stopping at the first violation.
pub fn validate_customer_reading(customer_reading: &CustomerReading) -> InvariantResult {
    validate_customer_meter(customer_reading)?;
    validate_customer_supply(customer_reading)?;
    validate_meter_reading(customer_reading)
}
