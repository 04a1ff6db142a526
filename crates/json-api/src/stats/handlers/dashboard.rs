//! Dashboard Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::stats::records::{
    CategorySales, DashboardStats, RecentOrder, TopProduct,
};

use crate::{extensions::*, state::State, stats::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DashboardResponse {
    pub product_count: u64,
    pub order_count: u64,
    pub user_count: u64,

    /// Total of confirmed, processing, shipped and delivered orders
    pub revenue: u64,

    /// The five most recent orders
    pub recent_orders: Vec<RecentOrderResponse>,

    /// The five best-selling products
    pub top_products: Vec<TopProductResponse>,

    /// Sales per category, including categories that sold nothing
    pub category_sales: Vec<CategorySalesResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RecentOrderResponse {
    pub uuid: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub total_price: u64,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TopProductResponse {
    pub uuid: Uuid,
    pub name: String,
    pub price: u64,
    pub sold_count: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategorySalesResponse {
    pub uuid: Uuid,
    pub name: String,
    pub total_sales: u64,
}

impl From<RecentOrder> for RecentOrderResponse {
    fn from(order: RecentOrder) -> Self {
        RecentOrderResponse {
            uuid: order.uuid.into(),
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            total_price: order.total_price,
            status: order.status.to_string(),
            created_at: order.created_at.to_string(),
        }
    }
}

impl From<TopProduct> for TopProductResponse {
    fn from(product: TopProduct) -> Self {
        TopProductResponse {
            uuid: product.uuid.into(),
            name: product.name,
            price: product.price,
            sold_count: product.sold_count,
        }
    }
}

impl From<CategorySales> for CategorySalesResponse {
    fn from(category: CategorySales) -> Self {
        CategorySalesResponse {
            uuid: category.uuid.into(),
            name: category.name,
            total_sales: category.total_sales,
        }
    }
}

impl From<DashboardStats> for DashboardResponse {
    fn from(stats: DashboardStats) -> Self {
        DashboardResponse {
            product_count: stats.product_count,
            order_count: stats.order_count,
            user_count: stats.user_count,
            revenue: stats.revenue,
            recent_orders: stats.recent_orders.into_iter().map(Into::into).collect(),
            top_products: stats.top_products.into_iter().map(Into::into).collect(),
            category_sales: stats.category_sales.into_iter().map(Into::into).collect(),
        }
    }
}

/// Dashboard Handler
#[endpoint(tags("stats"), summary = "Dashboard Statistics")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<DashboardResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let stats = state
        .app
        .stats
        .dashboard()
        .await
        .map_err(into_status_error)?;

    Ok(Json(stats.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::{
        categories::records::CategoryUuid,
        orders::records::{OrderStatus, OrderUuid},
        products::records::ProductUuid,
        stats::{MockStatsService, StatsServiceError},
    };

    use crate::test_helpers::TestApp;

    use super::*;

    fn make_service(stats: MockStatsService) -> Service {
        TestApp::new()
            .stats(stats)
            .service(Router::with_path("stats/dashboard").get(handler))
    }

    #[tokio::test]
    async fn test_dashboard_renders_stats() -> TestResult {
        let order = OrderUuid::new();

        let dashboard = DashboardStats {
            product_count: 3,
            order_count: 2,
            user_count: 4,
            revenue: 450_000,
            recent_orders: vec![RecentOrder {
                uuid: order,
                customer_name: "Nguyen Van A".to_string(),
                customer_email: "a@example.com".to_string(),
                total_price: 300_000,
                status: OrderStatus::Confirmed,
                created_at: Timestamp::UNIX_EPOCH,
            }],
            top_products: vec![TopProduct {
                uuid: ProductUuid::new(),
                name: "Ao thun".to_string(),
                price: 150_000,
                sold_count: 3,
            }],
            category_sales: vec![CategorySales {
                uuid: CategoryUuid::new(),
                name: "Ao".to_string(),
                total_sales: 0,
            }],
        };

        let mut stats = MockStatsService::new();

        stats.expect_dashboard().once().return_once(move || Ok(dashboard));
        stats.expect_sales_by_date().never();
        stats.expect_top_customers().never();

        let mut res = TestClient::get("http://example.com/stats/dashboard")
            .send(&make_service(stats))
            .await;

        let body: DashboardResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.revenue, 450_000);
        assert_eq!(body.user_count, 4);
        assert_eq!(
            body.recent_orders.first().map(|o| (o.uuid, o.status.as_str())),
            Some((order.into_uuid(), "CONFIRMED"))
        );
        assert_eq!(body.category_sales.first().map(|c| c.total_sales), Some(0));

        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_storage_error_returns_500() -> TestResult {
        let mut stats = MockStatsService::new();

        stats
            .expect_dashboard()
            .once()
            .return_once(|| Err(StatsServiceError::Sql(sqlx::Error::PoolTimedOut)));
        stats.expect_sales_by_date().never();
        stats.expect_top_customers().never();

        let res = TestClient::get("http://example.com/stats/dashboard")
            .send(&make_service(stats))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
