//! Payment countdown timer.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{
    task::JoinHandle,
    time::{Instant, interval},
};

use super::lock;

#[derive(Debug, Default)]
struct CountdownState {
    /// Bumped on every start and stop so a superseded ticker never reports
    /// expiry.
    generation: u64,
    started_at: Option<Instant>,
    ticker: Option<JoinHandle<()>>,
}

/// A restartable countdown that fires a callback once its window elapses.
///
/// Remaining time is recomputed on every tick from the start instant, so a
/// late tick never extends the window. Dropping the countdown stops it.
#[derive(Debug)]
pub struct PaymentCountdown {
    window: Duration,
    tick: Duration,
    state: Arc<Mutex<CountdownState>>,
}

impl PaymentCountdown {
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);
    pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self::with_tick(window, Self::DEFAULT_TICK)
    }

    /// A countdown re-evaluated every `tick`. A zero tick is raised to one
    /// millisecond.
    #[must_use]
    pub fn with_tick(window: Duration, tick: Duration) -> Self {
        Self {
            window,
            tick: tick.max(Duration::from_millis(1)),
            state: Arc::new(Mutex::new(CountdownState::default())),
        }
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Start counting down, cancelling any countdown already running.
    ///
    /// `on_expire` runs on the tokio runtime exactly once, after the ticker
    /// has stopped, unless the countdown is stopped, restarted or dropped
    /// first. Must be called from within a tokio runtime.
    pub fn start<F>(&self, on_expire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = lock(&self.state);

        if let Some(ticker) = state.ticker.take() {
            ticker.abort();
        }

        state.generation = state.generation.wrapping_add(1);

        let generation = state.generation;
        let started_at = Instant::now();
        let window = self.window;
        let tick = self.tick;
        let shared = Arc::clone(&self.state);

        state.started_at = Some(started_at);

        state.ticker = Some(tokio::spawn(async move {
            let mut ticks = interval(tick);

            loop {
                ticks.tick().await;

                if window.saturating_sub(started_at.elapsed()).is_zero() {
                    break;
                }
            }

            {
                let mut state = lock(&shared);

                if state.generation != generation {
                    return;
                }

                state.ticker = None;
                state.started_at = None;
            }

            on_expire();
        }));
    }

    /// Stop the countdown without firing its callback.
    pub fn stop(&self) {
        let mut state = lock(&self.state);

        state.generation = state.generation.wrapping_add(1);
        state.started_at = None;

        if let Some(ticker) = state.ticker.take() {
            ticker.abort();
        }
    }

    /// Time left in the window; zero when stopped or expired.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        lock(&self.state)
            .started_at
            .map_or(Duration::ZERO, |started_at| {
                self.window.saturating_sub(started_at.elapsed())
            })
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        lock(&self.state).ticker.is_some()
    }
}

impl Default for PaymentCountdown {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}

impl Drop for PaymentCountdown {
    fn drop(&mut self) {
        self.stop();
    }
}
