//! Order Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::orders::{
    data::{DEFAULT_PAGE_LIMIT, OrdersFilter, OrdersPage},
    records::OrderStatus,
};

use crate::{
    extensions::*,
    orders::{OrderResponse, errors::into_status_error},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersPageResponse {
    pub orders: Vec<OrderResponse>,

    /// Orders matching the filter across all pages
    pub total: u64,

    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl From<OrdersPage> for OrdersPageResponse {
    fn from(page: OrdersPage) -> Self {
        OrdersPageResponse {
            orders: page.orders.into_iter().map(Into::into).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
        }
    }
}

/// Order Index Handler
///
/// One page of all orders, newest first, optionally filtered by status.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    responses(
        (status_code = StatusCode::OK, description = "A page of orders"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersPageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let status = status
        .into_inner()
        .map(|status| status.parse::<OrderStatus>())
        .transpose()
        .or_400("could not parse \"status\" query parameter")?;

    let filter = OrdersFilter {
        status,
        page: page.into_inner().unwrap_or(1),
        limit: limit.into_inner().unwrap_or(DEFAULT_PAGE_LIMIT),
    }
    .normalized();

    let page = state
        .app
        .orders
        .list_orders(filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}
