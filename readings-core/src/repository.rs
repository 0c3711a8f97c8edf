//! Port trait for reading storage, plus an in-memory implementation.
//!
//! Implementations return readings newest-first by `read_date`. Readings sharing a
//! `read_date` are ordered by insertion, most recent insertion first, so repeated
//! queries against unchanged data always produce the same windows.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{CustomerMeter, CustomerReading, CustomerSupply};
use crate::error::StorageResult;
use crate::pagination::{Page, Paginator};

#[async_trait]
pub trait CustomerReadingRepository: Send + Sync {
    /// Persist one validated reading. Errors when the write is not confirmed durable.
    async fn save(&self, customer_reading: &CustomerReading) -> StorageResult<()>;

    /// Readings for a `(customer_id, serial_number)` pair. `None` uses the default paginator.
    async fn find_by_customer_meter(
        &self,
        customer_meter: &CustomerMeter,
        paginator: Option<Paginator>,
    ) -> StorageResult<Page<CustomerReading>>;

    /// Readings for a `(customer_id, mpxn)` pair. `None` uses the default paginator.
    async fn find_by_customer_supply(
        &self,
        customer_supply: &CustomerSupply,
        paginator: Option<Paginator>,
    ) -> StorageResult<Page<CustomerReading>>;
}

/// Vec-backed repository for tests and database-less runs.
#[derive(Default)]
pub struct InMemoryCustomerReadingRepository {
    readings: RwLock<Vec<CustomerReading>>,
}

impl InMemoryCustomerReadingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn find<F>(&self, paginator: Paginator, matches: F) -> Page<CustomerReading>
    where
        F: Fn(&CustomerReading) -> bool,
    {
        let readings = self.readings.read().await;

        // Vec position doubles as insertion sequence for the tie-break.
        let mut matching: Vec<(usize, &CustomerReading)> =
            readings.iter().enumerate().filter(|(_, r)| matches(r)).collect();
        matching.sort_by(|(seq_a, a), (seq_b, b)| {
            b.read_date.cmp(&a.read_date).then(seq_b.cmp(seq_a))
        });

        let results = paginator.window(matching.into_iter().map(|(_, r)| r.clone()));
        paginator.create_page(results)
    }
}

#[async_trait]
impl CustomerReadingRepository for InMemoryCustomerReadingRepository {
    async fn save(&self, customer_reading: &CustomerReading) -> StorageResult<()> {
        self.readings.write().await.push(customer_reading.clone());
        Ok(())
    }

    async fn find_by_customer_meter(
        &self,
        customer_meter: &CustomerMeter,
        paginator: Option<Paginator>,
    ) -> StorageResult<Page<CustomerReading>> {
        let page = self
            .find(paginator.unwrap_or_default(), |r| {
                r.customer_id == customer_meter.customer_id
                    && r.serial_number == customer_meter.serial_number
            })
            .await;
        Ok(page)
    }

    async fn find_by_customer_supply(
        &self,
        customer_supply: &CustomerSupply,
        paginator: Option<Paginator>,
    ) -> StorageResult<Page<CustomerReading>> {
        let page = self
            .find(paginator.unwrap_or_default(), |r| {
                r.customer_id == customer_supply.customer_id && r.mpxn == customer_supply.mpxn
            })
            .await;
        Ok(page)
    }
}
