//! Orders

mod checkout;
mod errors;
mod handlers;

pub(crate) use handlers::*;
