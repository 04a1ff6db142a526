//! Storefront Domain Concerns

pub mod categories;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod stats;
pub mod users;
