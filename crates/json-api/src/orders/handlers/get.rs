//! Get Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{OrderResponse, errors::into_status_error},
    state::State,
};

/// Get Order Handler
///
/// Returns an order with its items, payment and customer.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .orders
        .get_order(order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::orders::{
        MockOrdersService, OrdersServiceError,
        records::{OrderUuid, PaymentMethod},
    };

    use crate::test_helpers::{TestApp, make_order};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        TestApp::new()
            .orders(orders)
            .service(Router::with_path("orders/{order}").get(handler))
    }

    fn forbid_others(orders: &mut MockOrdersService) {
        orders.expect_create_order().never();
        orders.expect_list_user_orders().never();
        orders.expect_list_orders().never();
        orders.expect_update_order_status().never();
        orders.expect_update_payment_status().never();
        orders.expect_assign_shipper().never();
        orders.expect_expire_checkout().never();
    }

    #[tokio::test]
    async fn test_get_order_returns_items_and_payment() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |requested| *requested == uuid)
            .return_once(move |_| Ok(make_order(uuid, PaymentMethod::BankTransfer)));

        forbid_others(&mut orders);

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(orders))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.status, "PENDING");
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.payment.method, "BANK_TRANSFER");
        assert_eq!(body.payment.order_uuid, uuid.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_get_order_not_found_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_| Err(OrdersServiceError::NotFound));

        forbid_others(&mut orders);

        let res = TestClient::get(format!("http://example.com/orders/{}", OrderUuid::new()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
