//! Payment Countdown Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CountdownResponse {
    /// Whole seconds left before the checkout expires
    pub remaining_seconds: u64,
}

/// Payment Countdown Handler
///
/// Time left to pay for a gateway checkout. Orders without a running checkout
/// are not found.
#[endpoint(
    tags("orders"),
    summary = "Payment Countdown",
    responses(
        (status_code = StatusCode::OK, description = "Checkout running"),
        (status_code = StatusCode::NOT_FOUND, description = "No running checkout"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CountdownResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let remaining = state
        .app
        .checkouts
        .remaining(order.into_inner().into())
        .ok_or_else(|| StatusError::not_found().brief("No running checkout for this order"))?;

    Ok(Json(CountdownResponse {
        remaining_seconds: remaining.as_secs(),
    }))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::{checkout::CheckoutSessions, orders::records::OrderUuid};

    use crate::test_helpers::TestApp;

    use super::*;

    fn make_service(checkouts: Arc<CheckoutSessions>) -> Service {
        TestApp::new()
            .checkouts(checkouts)
            .service(Router::with_path("orders/{order}/payment/countdown").get(handler))
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_reports_remaining_seconds() -> TestResult {
        let uuid = OrderUuid::new();
        let checkouts = Arc::new(CheckoutSessions::new(Duration::from_secs(900)));

        checkouts.begin(uuid, || {});

        tokio::time::sleep(Duration::from_secs(60)).await;

        let mut res = TestClient::get(format!(
            "http://example.com/orders/{uuid}/payment/countdown"
        ))
        .send(&make_service(Arc::clone(&checkouts)))
        .await;

        let body: CountdownResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!((839..=840).contains(&body.remaining_seconds));

        Ok(())
    }

    #[tokio::test]
    async fn test_countdown_without_checkout_returns_404() -> TestResult {
        let res = TestClient::get(format!(
            "http://example.com/orders/{}/payment/countdown",
            OrderUuid::new()
        ))
        .send(&make_service(Arc::new(CheckoutSessions::default())))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
