//! Per-order checkout sessions.

use std::{
    sync::{Arc, Mutex, Weak},
    time::Duration,
};

use rustc_hash::FxHashMap;

use crate::domain::{checkout::PaymentCountdown, orders::records::OrderUuid};

use super::lock;

type Sessions = Mutex<FxHashMap<OrderUuid, PaymentCountdown>>;

/// Payment countdowns for checkouts still waiting on their gateway.
///
/// Each order gets its own countdown, so concurrent checkouts never share
/// timer state. Dropping the sessions stops every countdown.
#[derive(Debug)]
pub struct CheckoutSessions {
    window: Duration,
    sessions: Arc<Sessions>,
}

impl CheckoutSessions {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            sessions: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Start the payment window for `order`, replacing any session it
    /// already has.
    ///
    /// When the window elapses the session is removed and `on_expire` runs.
    pub fn begin<F>(&self, order: OrderUuid, on_expire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let countdown = PaymentCountdown::new(self.window);
        let sessions: Weak<Sessions> = Arc::downgrade(&self.sessions);

        let mut guard = lock(&self.sessions);

        countdown.start(move || {
            if let Some(sessions) = sessions.upgrade() {
                let expired = lock(&sessions).remove(&order);

                drop(expired);
            }

            on_expire();
        });

        let previous = guard.insert(order, countdown);

        drop(guard);
        drop(previous);
    }

    /// Time left on `order`'s payment window, if it has a running session.
    #[must_use]
    pub fn remaining(&self, order: OrderUuid) -> Option<Duration> {
        lock(&self.sessions)
            .get(&order)
            .map(PaymentCountdown::remaining)
    }

    /// End `order`'s session without expiring it. Returns whether one existed.
    pub fn finish(&self, order: OrderUuid) -> bool {
        let finished = lock(&self.sessions).remove(&order);

        finished.is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.sessions).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.sessions).is_empty()
    }
}

impl Default for CheckoutSessions {
    fn default() -> Self {
        Self::new(PaymentCountdown::DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::time::sleep;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn expired_session_removes_itself_then_fires() {
        let sessions = Arc::new(CheckoutSessions::new(Duration::from_secs(30)));
        let order = OrderUuid::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let observed = Arc::clone(&sessions);
        let counter = Arc::clone(&fired);

        sessions.begin(order, move || {
            assert_eq!(observed.remaining(order), None);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        sleep(Duration::from_secs(10)).await;

        assert_eq!(sessions.remaining(order), Some(Duration::from_secs(20)));

        sleep(Duration::from_secs(25)).await;
        tokio::task::yield_now().await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(sessions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn finished_session_never_expires() {
        let sessions = CheckoutSessions::new(Duration::from_secs(30));
        let order = OrderUuid::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);

        sessions.begin(order, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(sessions.finish(order));
        assert!(!sessions.finish(order));
        assert_eq!(sessions.remaining(order), None);

        sleep(Duration::from_secs(60)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn sessions_are_independent_per_order() {
        let sessions = CheckoutSessions::new(Duration::from_secs(30));
        let first = OrderUuid::new();
        let second = OrderUuid::new();

        sessions.begin(first, || {});

        sleep(Duration::from_secs(20)).await;

        sessions.begin(second, || {});

        assert_eq!(sessions.len(), 2);

        sleep(Duration::from_secs(15)).await;
        tokio::task::yield_now().await;

        assert_eq!(sessions.remaining(first), None);
        assert_eq!(sessions.remaining(second), Some(Duration::from_secs(15)));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_sessions_stops_countdowns() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);

        {
            let sessions = CheckoutSessions::new(Duration::from_secs(5));
            sessions.begin(OrderUuid::new(), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        sleep(Duration::from_secs(10)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
