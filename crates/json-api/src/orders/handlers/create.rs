//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::{
    OrdersServiceError,
    data::{NewOrder, OrderLineRequest, OrderRequest},
};

use crate::{
    extensions::*,
    observability,
    orders::{OrderResponse, checkout, errors::into_status_error},
    state::State,
};

/// Create Order Request
///
/// Every field is optional here so that each omission is reported as its own
/// validation error.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    pub user_uuid: Option<Uuid>,
    #[serde(default)]
    pub items: Vec<CreateOrderItemRequest>,
    pub shipping_address: Option<String>,
    pub shipping_phone: Option<String>,
    pub shipping_name: Option<String>,
    pub note: Option<String>,

    /// `COD`, `VNPAY` or `BANK_TRANSFER`
    pub payment_method: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderItemRequest {
    pub product_uuid: Option<Uuid>,
    pub quantity: Option<i64>,

    /// Unit price in VND
    pub price: Option<u64>,
}

impl From<CreateOrderItemRequest> for OrderLineRequest {
    fn from(item: CreateOrderItemRequest) -> Self {
        OrderLineRequest {
            product_uuid: item.product_uuid.map(Into::into),
            quantity: item.quantity,
            price: item.price,
        }
    }
}

impl From<CreateOrderRequest> for OrderRequest {
    fn from(request: CreateOrderRequest) -> Self {
        OrderRequest {
            user_uuid: request.user_uuid.map(Into::into),
            items: request.items.into_iter().map(Into::into).collect(),
            shipping_address: request.shipping_address,
            shipping_phone: request.shipping_phone,
            shipping_name: request.shipping_name,
            note: request.note,
            payment_method: request.payment_method,
        }
    }
}

/// Create Order Handler
///
/// Places an order: stock is checked and reserved, and the order, its items
/// and a pending payment are stored together. Gateway orders start a payment
/// countdown.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid order or insufficient stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(json, depot, res),
    fields(
        order_uuid = tracing::field::Empty,
        payment_method = tracing::field::Empty,
        items_count = tracing::field::Empty,
        total_price = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = NewOrder::try_from(OrderRequest::from(json.into_inner()))
        .map_err(|error| into_status_error(OrdersServiceError::Validation(error)))?;

    let span = tracing::Span::current();

    span.record("payment_method", order.payment_method.as_str());
    span.record("items_count", order.items.len());

    let order = state
        .app
        .orders
        .create_order(order)
        .await
        .map_err(into_status_error)?;

    span.record("order_uuid", tracing::field::display(order.uuid));
    span.record("total_price", order.total_price);

    observability::record_order_created(order.payment.method.as_str());

    checkout::begin(&state.app, &order);

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use storefront_app::domain::{
        orders::{
            MockOrdersService,
            data::{NewOrderItem, ShippingDetails},
            records::{OrderUuid, PaymentMethod},
        },
        products::records::ProductUuid,
        users::records::UserUuid,
    };

    use crate::test_helpers::{TestApp, make_order, strict_orders_mock};

    use super::*;

    fn forbid_others(orders: &mut MockOrdersService) {
        orders.expect_get_order().never();
        orders.expect_list_user_orders().never();
        orders.expect_list_orders().never();
        orders.expect_update_order_status().never();
        orders.expect_update_payment_status().never();
        orders.expect_assign_shipper().never();
        orders.expect_expire_checkout().never();
    }

    fn request_body(user: UserUuid, product: ProductUuid, method: &str) -> Value {
        json!({
            "user_uuid": user.into_uuid(),
            "items": [
                { "product_uuid": product.into_uuid(), "quantity": 2, "price": 150_000 },
            ],
            "shipping_address": " 1 Le Loi, District 1 ",
            "shipping_phone": "0900000000",
            "shipping_name": "Nguyen Van A",
            "note": "   ",
            "payment_method": method,
        })
    }

    #[tokio::test]
    async fn test_create_order_success() -> TestResult {
        let user = UserUuid::new();
        let product = ProductUuid::new();
        let uuid = OrderUuid::new();

        let expected = NewOrder {
            user_uuid: user,
            items: vec![NewOrderItem {
                product_uuid: product,
                quantity: 2,
                price: 150_000,
            }],
            shipping: ShippingDetails {
                address: "1 Le Loi, District 1".to_string(),
                phone: "0900000000".to_string(),
                name: "Nguyen Van A".to_string(),
            },
            note: None,
            payment_method: PaymentMethod::Cod,
        };

        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .withf(move |order| *order == expected)
            .return_once(move |_| Ok(make_order(uuid, PaymentMethod::Cod)));

        forbid_others(&mut orders);

        let app = TestApp::new().orders(orders);

        let mut res = TestClient::post("http://example.com/orders")
            .json(&request_body(user, product, "cod"))
            .send(&app.service(Router::with_path("orders").post(handler)))
            .await;

        let body: OrderResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/orders/{uuid}").as_str()));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.total_price, 300_000);
        assert_eq!(body.payment.status, "PENDING");
        assert_eq!(body.payment.currency, "VND");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_gateway_order_starts_checkout() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .withf(|order| order.payment_method == PaymentMethod::Vnpay)
            .return_once(move |_| Ok(make_order(uuid, PaymentMethod::Vnpay)));

        forbid_others(&mut orders);

        let checkouts = Arc::new(storefront_app::domain::checkout::CheckoutSessions::default());

        let res = TestClient::post("http://example.com/orders")
            .json(&request_body(UserUuid::new(), ProductUuid::new(), "VNPAY"))
            .send(
                &TestApp::new()
                    .orders(orders)
                    .checkouts(Arc::clone(&checkouts))
                    .service(Router::with_path("orders").post(handler)),
            )
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert!(
            checkouts.remaining(uuid).is_some(),
            "expected a running checkout for the gateway order"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_empty_items_returns_400_without_storage() -> TestResult {
        let mut res = TestClient::post("http://example.com/orders")
            .add_header("accept", "application/json", true)
            .json(&json!({
                "user_uuid": Uuid::now_v7(),
                "items": [],
                "shipping_address": "1 Le Loi",
                "shipping_phone": "0900000000",
                "shipping_name": "Nguyen Van A",
                "payment_method": "COD",
            }))
            .send(
                &TestApp::new()
                    .orders(strict_orders_mock())
                    .service(Router::with_path("orders").post(handler)),
            )
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body["error"]["brief"], "Invalid order");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_zero_quantity_returns_400() -> TestResult {
        let mut body = request_body(UserUuid::new(), ProductUuid::new(), "COD");
        body["items"][0]["quantity"] = json!(0);

        let res = TestClient::post("http://example.com/orders")
            .json(&body)
            .send(
                &TestApp::new()
                    .orders(strict_orders_mock())
                    .service(Router::with_path("orders").post(handler)),
            )
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_price_beyond_storage_range_returns_400() -> TestResult {
        let mut body = request_body(UserUuid::new(), ProductUuid::new(), "COD");
        body["items"][0]["quantity"] = json!(1);
        body["items"][0]["price"] = json!(10_000_000_000_000_000_000_u64);

        let mut res = TestClient::post("http://example.com/orders")
            .add_header("accept", "application/json", true)
            .json(&body)
            .send(
                &TestApp::new()
                    .orders(strict_orders_mock())
                    .service(Router::with_path("orders").post(handler)),
            )
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body["error"]["brief"], "Invalid order");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_unknown_payment_method_returns_400() -> TestResult {
        let res = TestClient::post("http://example.com/orders")
            .json(&request_body(UserUuid::new(), ProductUuid::new(), "PAYPAL"))
            .send(
                &TestApp::new()
                    .orders(strict_orders_mock())
                    .service(Router::with_path("orders").post(handler)),
            )
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_insufficient_stock_returns_400() -> TestResult {
        let product = ProductUuid::new();

        let mut orders = MockOrdersService::new();

        orders.expect_create_order().once().return_once(move |_| {
            Err(OrdersServiceError::InsufficientStock {
                product,
                available: 1,
                requested: 2,
            })
        });

        forbid_others(&mut orders);

        let mut res = TestClient::post("http://example.com/orders")
            .add_header("accept", "application/json", true)
            .json(&request_body(UserUuid::new(), product, "COD"))
            .send(
                &TestApp::new()
                    .orders(orders)
                    .service(Router::with_path("orders").post(handler)),
            )
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body["error"]["brief"], "Insufficient stock");

        Ok(())
    }
}
