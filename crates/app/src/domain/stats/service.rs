//! Stats service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::stats::{
        aggregate::SalesByDate,
        errors::StatsServiceError,
        records::{CustomerSpend, DashboardStats, DateRange},
        repository::PgStatsRepository,
    },
};

/// Rows shown in each dashboard list.
const DASHBOARD_LIST_SIZE: i64 = 5;

#[derive(Debug, Clone)]
pub struct PgStatsService {
    db: Db,
    repository: PgStatsRepository,
}

impl PgStatsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgStatsRepository::new(),
        }
    }
}

#[async_trait]
impl StatsService for PgStatsService {
    async fn dashboard(&self) -> Result<DashboardStats, StatsServiceError> {
        let mut tx = self.db.begin().await?;

        let counts = self.repository.dashboard_counts(&mut tx).await?;

        let recent_orders = self
            .repository
            .recent_orders(&mut tx, DASHBOARD_LIST_SIZE)
            .await?;

        let top_products = self
            .repository
            .top_products(&mut tx, DASHBOARD_LIST_SIZE)
            .await?;

        let category_sales = self.repository.category_sales(&mut tx).await?;

        tx.commit().await?;

        Ok(DashboardStats {
            product_count: counts.product_count,
            order_count: counts.order_count,
            user_count: counts.user_count,
            revenue: counts.revenue,
            recent_orders,
            top_products,
            category_sales,
        })
    }

    async fn sales_by_date(&self, range: DateRange) -> Result<SalesByDate, StatsServiceError> {
        if !range.is_valid() {
            return Err(StatsServiceError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }

        let mut tx = self.db.begin().await?;

        let orders = self.repository.revenue_orders_between(&mut tx, range).await?;

        tx.commit().await?;

        Ok(SalesByDate::from_orders(range, orders))
    }

    async fn top_customers(&self, limit: usize) -> Result<Vec<CustomerSpend>, StatsServiceError> {
        let mut tx = self.db.begin().await?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let customers = self.repository.customer_spend(&mut tx, limit).await?;

        tx.commit().await?;

        Ok(customers)
    }
}

#[automock]
#[async_trait]
pub trait StatsService: Send + Sync {
    /// Counters, revenue and the short lists shown on the dashboard.
    async fn dashboard(&self) -> Result<DashboardStats, StatsServiceError>;

    /// Revenue per UTC day within an inclusive date range.
    async fn sales_by_date(&self, range: DateRange) -> Result<SalesByDate, StatsServiceError>;

    /// Customers ranked by spend, at most `limit` of them.
    async fn top_customers(&self, limit: usize) -> Result<Vec<CustomerSpend>, StatsServiceError>;
}
