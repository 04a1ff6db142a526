//! Stats Repository

use jiff::Timestamp;
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{try_get_amount, try_get_count, try_get_parsed},
    domain::{
        categories::records::CategoryUuid,
        orders::records::{OrderStatus, OrderUuid},
        products::records::ProductUuid,
        stats::records::{CategorySales, CustomerSpend, DateRange, RecentOrder, TopProduct},
        users::records::UserUuid,
    },
};

const DASHBOARD_COUNTS_SQL: &str = include_str!("sql/dashboard_counts.sql");
const RECENT_ORDERS_SQL: &str = include_str!("sql/recent_orders.sql");
const TOP_PRODUCTS_SQL: &str = include_str!("sql/top_products.sql");
const CATEGORY_SALES_SQL: &str = include_str!("sql/category_sales.sql");
const REVENUE_ORDERS_BETWEEN_SQL: &str = include_str!("sql/revenue_orders_between.sql");
const CUSTOMER_SPEND_SQL: &str = include_str!("sql/customer_spend.sql");

/// Headline counters for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DashboardCounts {
    pub product_count: u64,
    pub order_count: u64,
    pub user_count: u64,
    pub revenue: u64,
}

fn revenue_statuses() -> Vec<String> {
    OrderStatus::REVENUE_BEARING
        .iter()
        .map(|status| status.as_str().to_string())
        .collect()
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgStatsRepository;

impl PgStatsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn dashboard_counts(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<DashboardCounts, sqlx::Error> {
        let row = query(DASHBOARD_COUNTS_SQL)
            .bind(revenue_statuses())
            .fetch_one(&mut **tx)
            .await?;

        Ok(DashboardCounts {
            product_count: try_get_amount(&row, "product_count")?,
            order_count: try_get_amount(&row, "order_count")?,
            user_count: try_get_amount(&row, "user_count")?,
            revenue: try_get_amount(&row, "revenue")?,
        })
    }

    pub(crate) async fn recent_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        limit: i64,
    ) -> Result<Vec<RecentOrder>, sqlx::Error> {
        query_as::<Postgres, RecentOrder>(RECENT_ORDERS_SQL)
            .bind(limit)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn top_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        limit: i64,
    ) -> Result<Vec<TopProduct>, sqlx::Error> {
        query_as::<Postgres, TopProduct>(TOP_PRODUCTS_SQL)
            .bind(limit)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn category_sales(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<CategorySales>, sqlx::Error> {
        query_as::<Postgres, CategorySales>(CATEGORY_SALES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// `(created_at, total_price)` of revenue-bearing orders whose UTC date
    /// falls inside `range`.
    pub(crate) async fn revenue_orders_between(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        range: DateRange,
    ) -> Result<Vec<(Timestamp, u64)>, sqlx::Error> {
        let rows = query(REVENUE_ORDERS_BETWEEN_SQL)
            .bind(revenue_statuses())
            .bind(SqlxDate::from(range.start))
            .bind(SqlxDate::from(range.end))
            .fetch_all(&mut **tx)
            .await?;

        rows.iter()
            .map(|row| -> Result<(Timestamp, u64), sqlx::Error> {
                Ok((
                    row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
                    try_get_amount(row, "total_price")?,
                ))
            })
            .collect()
    }

    /// Customers by revenue-bearing spend, highest first.
    pub(crate) async fn customer_spend(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        limit: i64,
    ) -> Result<Vec<CustomerSpend>, sqlx::Error> {
        query_as::<Postgres, CustomerSpend>(CUSTOMER_SPEND_SQL)
            .bind(revenue_statuses())
            .bind(limit)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for RecentOrder {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
            total_price: try_get_amount(row, "total_price")?,
            status: try_get_parsed(row, "status")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for TopProduct {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            sold_count: try_get_count(row, "sold_count")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CategorySales {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CategoryUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            total_sales: try_get_amount(row, "total_sales")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CustomerSpend {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user_uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            total_spent: try_get_amount(row, "total_spent")?,
            order_count: try_get_amount(row, "order_count")?,
        })
    }
}
