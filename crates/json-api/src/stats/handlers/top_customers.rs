//! Top Customers Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::stats::records::{CustomerSpend, DEFAULT_TOP_CUSTOMERS};

use crate::{extensions::*, state::State, stats::errors::into_status_error};

/// Largest ranking a caller may request.
const MAX_TOP_CUSTOMERS: usize = 100;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TopCustomersResponse {
    pub customers: Vec<CustomerSpendResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomerSpendResponse {
    pub user_uuid: Uuid,
    pub name: String,
    pub email: String,
    pub total_spent: u64,
    pub order_count: u64,
}

impl From<CustomerSpend> for CustomerSpendResponse {
    fn from(customer: CustomerSpend) -> Self {
        CustomerSpendResponse {
            user_uuid: customer.user_uuid.into(),
            name: customer.name,
            email: customer.email,
            total_spent: customer.total_spent,
            order_count: customer.order_count,
        }
    }
}

fn clamp_limit(limit: Option<usize>) -> usize {
    limit
        .unwrap_or(DEFAULT_TOP_CUSTOMERS)
        .clamp(1, MAX_TOP_CUSTOMERS)
}

/// Top Customers Handler
///
/// Customers ranked by spend on revenue-bearing orders.
#[endpoint(tags("stats"), summary = "Top Customers")]
pub(crate) async fn handler(
    limit: QueryParam<usize, false>,
    depot: &mut Depot,
) -> Result<Json<TopCustomersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let customers = state
        .app
        .stats
        .top_customers(clamp_limit(limit.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(TopCustomersResponse {
        customers: customers.into_iter().map(Into::into).collect(),
    }))
}
