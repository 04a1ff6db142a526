//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::Validation(source) => StatusError::bad_request()
            .brief("Invalid order")
            .detail(source.to_string()),
        OrdersServiceError::ProductNotFound(product) => StatusError::bad_request()
            .brief("Unknown product")
            .detail(format!("product={product}")),
        OrdersServiceError::InsufficientStock {
            product,
            available,
            requested,
        } => StatusError::bad_request()
            .brief("Insufficient stock")
            .detail(format!(
                "product={product} available={available} requested={requested}"
            )),
        error @ (OrdersServiceError::InvalidOrderTransition { .. }
        | OrdersServiceError::InvalidPaymentTransition { .. }) => StatusError::conflict()
            .brief("Status change not allowed")
            .detail(error.to_string()),
        OrdersServiceError::InvalidShipper => {
            StatusError::bad_request().brief("Shipper must be a delivery user")
        }
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::InvalidReference => {
            StatusError::bad_request().brief("Unknown user or product")
        }
        OrdersServiceError::MissingRequiredData | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
