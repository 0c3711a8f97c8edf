pub mod customer;
pub mod invariant;
pub mod reading;

pub use customer::{
    validate_customer_meter, validate_customer_reading, validate_customer_supply, CustomerMeter,
    CustomerReading, CustomerSupply, HasCustomerMeter, HasCustomerSupply,
};
pub use invariant::{invariant, not_blank, not_empty, InvariantViolation};
pub use reading::{
    validate_meter_reading, validate_register_value, HasMeterReading, MeterReading, RegisterValue,
    EARLIEST_READING_DATE, EARLIEST_READING_DATE_MESSAGE,
};
