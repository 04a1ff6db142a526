//! Checkout sessions for gateway payments.

use std::sync::Arc;

use tracing::{error, info, warn};

use storefront_app::{
    context::AppContext,
    domain::orders::records::{OrderRecord, OrderStatus, OrderUuid, PaymentStatus},
};

use crate::observability;

/// Start the payment window for a newly placed gateway order.
///
/// When the window elapses before the gateway reports back, the order's
/// payment is failed and the order cancelled.
pub(crate) fn begin(app: &AppContext, order: &OrderRecord) {
    if !order.payment.method.is_gateway() {
        return;
    }

    let uuid = order.uuid;
    let orders = Arc::clone(&app.orders);

    app.checkouts.begin(uuid, move || {
        tokio::spawn(async move {
            match orders.expire_checkout(uuid).await {
                Ok(true) => {
                    observability::record_checkout_expired();

                    info!(order_uuid = %uuid, "checkout expired");
                }
                Ok(false) => info!(order_uuid = %uuid, "checkout already settled"),
                Err(source) => error!(order_uuid = %uuid, "failed to expire checkout: {source}"),
            }
        });
    });

    info!(
        order_uuid = %uuid,
        window_seconds = app.checkouts.window().as_secs(),
        "checkout started"
    );
}

/// End the payment window once the payment has settled.
pub(crate) fn finish_on_payment(app: &AppContext, order: OrderUuid, status: PaymentStatus) {
    if status.is_settled() && app.checkouts.finish(order) {
        info!(order_uuid = %order, payment_status = %status, "checkout finished");
    }
}

/// End the payment window of a cancelled order.
pub(crate) fn finish_on_status(app: &AppContext, order: OrderUuid, status: OrderStatus) {
    if status == OrderStatus::Cancelled && app.checkouts.finish(order) {
        warn!(order_uuid = %order, "checkout abandoned by cancellation");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testresult::TestResult;
    use tokio::{sync::oneshot, time::timeout};

    use storefront_app::domain::{
        checkout::CheckoutSessions,
        orders::{MockOrdersService, records::PaymentMethod},
    };

    use crate::test_helpers::{TestApp, make_order, strict_orders_mock};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn gateway_checkout_expires_through_the_service() -> TestResult {
        let uuid = OrderUuid::new();
        let (expired_tx, expired_rx) = oneshot::channel();

        let mut orders = MockOrdersService::new();

        orders
            .expect_expire_checkout()
            .once()
            .withf(move |order| *order == uuid)
            .return_once(move |_| {
                _ = expired_tx.send(());
                Ok(true)
            });

        let app = TestApp::new()
            .orders(orders)
            .checkouts(Arc::new(CheckoutSessions::new(Duration::from_secs(5))))
            .into_context();

        begin(&app, &make_order(uuid, PaymentMethod::Vnpay));

        assert!(app.checkouts.remaining(uuid).is_some());

        timeout(Duration::from_secs(60), expired_rx).await??;

        assert_eq!(app.checkouts.remaining(uuid), None);

        Ok(())
    }

    #[tokio::test]
    async fn cash_orders_have_no_checkout() {
        let app = TestApp::new().orders(strict_orders_mock()).into_context();
        let uuid = OrderUuid::new();

        begin(&app, &make_order(uuid, PaymentMethod::Cod));

        assert!(app.checkouts.is_empty());
    }

    #[tokio::test]
    async fn settled_payment_finishes_checkout() {
        let app = TestApp::new().into_context();
        let uuid = OrderUuid::new();

        begin(&app, &make_order(uuid, PaymentMethod::Vnpay));

        finish_on_payment(&app, uuid, PaymentStatus::Pending);
        assert!(app.checkouts.remaining(uuid).is_some());

        finish_on_payment(&app, uuid, PaymentStatus::Completed);
        assert_eq!(app.checkouts.remaining(uuid), None);
    }

    #[tokio::test]
    async fn cancelled_order_finishes_checkout() {
        let app = TestApp::new().into_context();
        let uuid = OrderUuid::new();

        begin(&app, &make_order(uuid, PaymentMethod::Vnpay));

        finish_on_status(&app, uuid, OrderStatus::Confirmed);
        assert!(app.checkouts.remaining(uuid).is_some());

        finish_on_status(&app, uuid, OrderStatus::Cancelled);
        assert!(app.checkouts.is_empty());
    }
}
