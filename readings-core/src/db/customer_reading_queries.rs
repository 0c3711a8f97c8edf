use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use time::OffsetDateTime;

use crate::domain::{CustomerMeter, CustomerReading, CustomerSupply, RegisterValue};
use crate::error::{StorageError, StorageResult};
use crate::pagination::{Page, Paginator};
use crate::repository::CustomerReadingRepository;

const SCHEMA: &str = include_str!("../../sql/schema/01_customer_reading.sql");

#[derive(Debug, Clone, sqlx::FromRow)]
struct CustomerReadingRow {
    customer_id: String,
    serial_number: String,
    mpxn: String,
    registers: Json<Vec<RegisterValue>>,
    read_date: OffsetDateTime,
}

impl From<CustomerReadingRow> for CustomerReading {
    fn from(row: CustomerReadingRow) -> Self {
        CustomerReading {
            customer_id: row.customer_id,
            serial_number: row.serial_number,
            mpxn: row.mpxn,
            read: row.registers.0,
            read_date: row.read_date,
        }
    }
}

/// Which identity pair a lookup filters on.
#[derive(Debug, Clone, Copy)]
enum Axis {
    Meter,
    Supply,
}

impl Axis {
    fn column(self) -> &'static str {
        match self {
            Axis::Meter => "serial_number",
            Axis::Supply => "mpxn",
        }
    }
}

/// PostgreSQL-backed reading store.
///
/// Writes run in a transaction whose `synchronous_commit` is set to the configured
/// durability policy, so a save only returns once the commit is confirmed.
pub struct PgCustomerReadingRepository {
    pool: PgPool,
    synchronous_commit: String,
}

impl PgCustomerReadingRepository {
    pub fn new(pool: PgPool, synchronous_commit: impl Into<String>) -> Self {
        Self {
            pool,
            synchronous_commit: synchronous_commit.into(),
        }
    }

    /// Create the table and lookup indexes if they are missing.
    pub async fn initialize(&self) -> StorageResult<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    async fn find(
        &self,
        axis: Axis,
        customer_id: &str,
        key: &str,
        paginator: Paginator,
    ) -> StorageResult<Page<CustomerReading>> {
        let sql = format!(
            r#"
            SELECT
                customer_id,
                serial_number,
                mpxn,
                registers,
                read_date
            FROM customer_reading
            WHERE customer_id = $1
              AND {column} = $2
            ORDER BY read_date DESC, id DESC
            LIMIT $3
            OFFSET $4
            "#,
            column = axis.column()
        );

        let rows = sqlx::query_as::<_, CustomerReadingRow>(&sql)
            .bind(customer_id)
            .bind(key)
            .bind(paginator.limit())
            .bind(paginator.skip())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, ?axis, "customer_reading lookup failed");
                StorageError::from(e)
            })?;

        Ok(paginator.create_page(rows.into_iter().map(CustomerReading::from).collect()))
    }
}

#[async_trait]
impl CustomerReadingRepository for PgCustomerReadingRepository {
    async fn save(&self, customer_reading: &CustomerReading) -> StorageResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Transaction(e.to_string()))?;

        sqlx::query("SELECT set_config('synchronous_commit', $1, true)")
            .bind(&self.synchronous_commit)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO customer_reading (customer_id, serial_number, mpxn, registers, read_date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&customer_reading.customer_id)
        .bind(&customer_reading.serial_number)
        .bind(&customer_reading.mpxn)
        .bind(Json(&customer_reading.read))
        .bind(customer_reading.read_date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await.map_err(|e| {
            tracing::error!(error = %e, "customer_reading commit failed");
            StorageError::Transaction(e.to_string())
        })
    }

    async fn find_by_customer_meter(
        &self,
        customer_meter: &CustomerMeter,
        paginator: Option<Paginator>,
    ) -> StorageResult<Page<CustomerReading>> {
        self.find(
            Axis::Meter,
            &customer_meter.customer_id,
            &customer_meter.serial_number,
            paginator.unwrap_or_default(),
        )
        .await
    }

    async fn find_by_customer_supply(
        &self,
        customer_supply: &CustomerSupply,
        paginator: Option<Paginator>,
    ) -> StorageResult<Page<CustomerReading>> {
        self.find(
            Axis::Supply,
            &customer_supply.customer_id,
            &customer_supply.mpxn,
            paginator.unwrap_or_default(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, DatabaseConfig};
    use time::{macros::datetime, Duration};

    async fn repository() -> PgCustomerReadingRepository {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = Database::new(DatabaseConfig::new(url, 2)).connect().await.unwrap();
        let repo = PgCustomerReadingRepository::new(pool, "on");
        repo.initialize().await.unwrap();
        repo
    }

    fn reading(customer_id: &str, read_date: OffsetDateTime) -> CustomerReading {
        CustomerReading {
            customer_id: customer_id.to_string(),
            serial_number: "sn".to_string(),
            mpxn: "m".to_string(),
            read: vec![RegisterValue {
                register_id: "reg".to_string(),
                register_type: "TYPE".to_string(),
                value: "123".to_string(),
            }],
            read_date,
        }
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn saves_and_pages_newest_first() {
        let repo = repository().await;
        let customer_id = format!("it-{}", OffsetDateTime::now_utc().unix_timestamp_nanos());
        let base = datetime!(2021-03-01 00:00:00 UTC);
        for day in [2, 0, 1] {
            repo.save(&reading(&customer_id, base + Duration::days(day))).await.unwrap();
        }

        let meter = CustomerMeter {
            customer_id: customer_id.clone(),
            serial_number: "sn".to_string(),
        };
        let first = repo
            .find_by_customer_meter(&meter, Some(Paginator::new(Some(2), None)))
            .await
            .unwrap();
        let dates: Vec<_> = first.results.iter().map(|r| r.read_date).collect();
        assert_eq!(dates, vec![base + Duration::days(2), base + Duration::days(1)]);

        let rest = repo
            .find_by_customer_meter(&meter, Some(first.paginator.of_next_page()))
            .await
            .unwrap();
        assert_eq!(rest.results, vec![reading(&customer_id, base)]);

        let supply = CustomerSupply {
            customer_id,
            mpxn: "m".to_string(),
        };
        let all = repo.find_by_customer_supply(&supply, None).await.unwrap();
        assert_eq!(all.len(), 3);
    }
}
