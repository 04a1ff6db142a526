//! Orders

pub mod data;
pub mod errors;
pub mod records;
mod repositories;
pub mod service;
mod validation;

pub use errors::{OrderValidationError, OrdersServiceError};
pub use service::*;
