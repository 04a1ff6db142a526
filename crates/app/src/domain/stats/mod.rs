//! Dashboard statistics

pub mod aggregate;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use aggregate::SalesByDate;
pub use errors::StatsServiceError;
pub use service::*;
