//! Checkout payment windows
//!
//! Gateway payments get a fixed window to complete. Each pending checkout
//! owns a [`PaymentCountdown`]; [`CheckoutSessions`] keeps them per order.

mod countdown;
mod sessions;

pub use countdown::PaymentCountdown;
pub use sessions::CheckoutSessions;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the guard if a holder panicked. The guarded
/// state stays consistent because every critical section is a plain field
/// update.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
