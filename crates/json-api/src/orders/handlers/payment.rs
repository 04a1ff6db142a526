//! Update Payment Status Handler

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

use storefront_app::domain::orders::{
    data::PaymentUpdate,
    records::{OrderUuid, PaymentStatus},
};

use crate::{
    extensions::*,
    orders::{PaymentResponse, checkout, errors::into_status_error},
    state::State,
};

/// Update Payment Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdatePaymentStatusRequest {
    /// `PENDING`, `COMPLETED` or `FAILED`
    pub status: String,

    /// Gateway transaction reference; kept as is when omitted
    #[serde(default)]
    pub transaction_id: Option<String>,
}

impl TryFrom<UpdatePaymentStatusRequest> for PaymentUpdate {
    type Error = StatusError;

    fn try_from(request: UpdatePaymentStatusRequest) -> Result<Self, Self::Error> {
        Ok(PaymentUpdate {
            status: request
                .status
                .parse::<PaymentStatus>()
                .or_400("unknown payment status")?,
            transaction_id: request
                .transaction_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        })
    }
}

/// Update Payment Status Handler
///
/// Called by admins or by the payment gateway's callback. A settled payment
/// ends the order's checkout countdown.
#[endpoint(
    tags("orders"),
    summary = "Update Payment Status",
    responses(
        (status_code = StatusCode::OK, description = "Payment updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Transition not allowed"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.update_payment",
    skip(order, json, depot),
    fields(order_uuid = tracing::field::Empty, payment_status = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdatePaymentStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<PaymentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let order = OrderUuid::from(order.into_inner());
    let update = PaymentUpdate::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("order_uuid", tracing::field::display(order));
    span.record("payment_status", update.status.as_str());

    let payment = state
        .app
        .orders
        .update_payment_status(order, update)
        .await
        .map_err(into_status_error)?;

    checkout::finish_on_payment(&state.app, order, payment.status);

    Ok(Json(payment.into()))
}
