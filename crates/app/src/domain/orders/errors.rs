//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{
    orders::records::{OrderStatus, PaymentStatus},
    products::records::ProductUuid,
};

/// Reasons an order request is rejected before any storage access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderValidationError {
    #[error("missing user")]
    MissingUser,

    #[error("order has no items")]
    EmptyItems,

    #[error("item {index} is missing a product")]
    MissingProduct { index: usize },

    #[error("item {index} must have a quantity greater than zero")]
    InvalidQuantity { index: usize },

    #[error("item {index} is missing a price")]
    MissingPrice { index: usize },

    #[error("item {index} has a price above the supported maximum")]
    PriceTooLarge { index: usize },

    #[error("missing shipping address")]
    MissingShippingAddress,

    #[error("missing shipping phone")]
    MissingShippingPhone,

    #[error("missing shipping name")]
    MissingShippingName,

    #[error("missing payment method")]
    MissingPaymentMethod,

    #[error("unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    #[error("order total is too large")]
    TotalOverflow,
}

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error(transparent)]
    Validation(#[from] OrderValidationError),

    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("insufficient stock for product {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: ProductUuid,
        available: u32,
        requested: u64,
    },

    #[error("order cannot move from {from} to {to}")]
    InvalidOrderTransition { from: OrderStatus, to: OrderStatus },

    #[error("payment cannot move from {from} to {to}")]
    InvalidPaymentTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },

    #[error("shipper must be a delivery user")]
    InvalidShipper,

    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
