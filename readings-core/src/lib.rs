pub mod db;
pub mod domain;
pub mod error;
pub mod pagination;
pub mod repository;
pub mod timestamp;

pub use domain::{CustomerMeter, CustomerReading, CustomerSupply, InvariantViolation, MeterReading, RegisterValue};
pub use pagination::{Page, Paginator};
pub use repository::{CustomerReadingRepository, InMemoryCustomerReadingRepository};
