//! User Orders Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{OrderResponse, errors::into_status_error},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserOrdersResponse {
    /// The user's orders, newest first
    pub orders: Vec<OrderResponse>,
}

/// User Orders Handler
#[endpoint(tags("orders"), summary = "List User Orders")]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<UserOrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let orders = state
        .app
        .orders
        .list_user_orders(user.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(UserOrdersResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}
