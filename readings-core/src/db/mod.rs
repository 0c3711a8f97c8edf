pub mod connection;
pub mod customer_reading_queries;

pub use connection::{Database, DatabaseConfig};
pub use customer_reading_queries::PgCustomerReadingRepository;
