pub mod api;
pub mod config;
pub mod metrics_server;
pub mod observability;
pub mod serialization;

pub use serialization::{parse_customer_reading, SerializationError};
