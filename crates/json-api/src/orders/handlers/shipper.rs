//! Assign Shipper Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{OrderResponse, errors::into_status_error},
    state::State,
};

/// Assign Shipper Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AssignShipperRequest {
    /// A user with the `DELIVERY` role
    pub shipper_uuid: Uuid,
}

/// Assign Shipper Handler
#[endpoint(
    tags("orders"),
    summary = "Assign Shipper",
    responses(
        (status_code = StatusCode::OK, description = "Shipper assigned"),
        (status_code = StatusCode::BAD_REQUEST, description = "Not a delivery user"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<AssignShipperRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .orders
        .assign_shipper(order.into_inner().into(), json.into_inner().shipper_uuid.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
