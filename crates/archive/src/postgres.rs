use async_trait::async_trait;
use common::OrderId;
use domain::{ArchiveError, ArchiveSink, Order};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::Result;

/// PostgreSQL-backed archive of finished orders.
#[derive(Clone)]
pub struct PostgresArchive {
    pool: PgPool,
}

impl PostgresArchive {
    /// Creates a new archive over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    /// Writes one finished order. Writing the same order twice is a no-op.
    #[tracing::instrument(skip(self, order), fields(order_id = %order.id()))]
    pub async fn insert(&self, order: &Order) -> Result<()> {
        let payload = serde_json::to_value(order)?;

        let result = sqlx::query(
            r#"
            INSERT INTO finished_orders
                (id, order_number, table_id, total_price_cents, status, note, created_at, payload)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(order.id().as_str())
        .bind(i64::from(order.order_number()))
        .bind(order.table_id())
        .bind(order.total_price().cents())
        .bind(order.status().as_str())
        .bind(order.note())
        .bind(order.created_at())
        .bind(payload)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!("order already archived");
        } else {
            metrics::counter!("orders_archived_total").increment(1);
        }

        Ok(())
    }

    /// Loads an archived order.
    ///
    /// Returns None if the order was never archived.
    pub async fn get_finished_order(&self, order_id: &OrderId) -> Result<Option<Order>> {
        let payload: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT payload FROM finished_orders WHERE id = $1")
                .bind(order_id.as_str())
                .fetch_optional(&self.pool)
                .await?;

        payload
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    /// Returns the number of archived orders.
    pub async fn finished_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM finished_orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ArchiveSink for PostgresArchive {
    async fn archive(&self, order: &Order) -> std::result::Result<(), ArchiveError> {
        self.insert(order).await.map_err(ArchiveError::from)
    }
}
