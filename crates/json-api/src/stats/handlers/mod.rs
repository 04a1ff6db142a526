//! Stats Handlers

pub(crate) mod dashboard;
pub(crate) mod sales;
pub(crate) mod top_customers;
