//! Checkout Config

use std::time::Duration;

use clap::Args;

/// Checkout settings.
#[derive(Debug, Args)]
pub struct CheckoutConfig {
    /// Seconds a gateway checkout may stay unpaid before it is expired
    #[arg(
        long,
        env = "CHECKOUT_PAYMENT_WINDOW_SECONDS",
        default_value_t = 900_u64
    )]
    pub checkout_payment_window_seconds: u64,
}

impl CheckoutConfig {
    /// The payment window as a duration.
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.checkout_payment_window_seconds)
    }
}
