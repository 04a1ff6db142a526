//! Tracing subscriber lifecycle management.

use crate::config::ServerConfig;

use super::{ObservabilityError, logging, settings};

/// Runtime observability state.
#[derive(Debug)]
pub(crate) struct Observability {
    slow_request_threshold_ms: u64,
}

impl Observability {
    /// Initialize structured logging and request observability settings.
    pub(crate) fn init(config: &ServerConfig) -> Result<Self, ObservabilityError> {
        settings::apply_runtime_config(config);

        logging::init_subscriber(config)?;

        Ok(Self {
            slow_request_threshold_ms: settings::slow_request_threshold_ms(),
        })
    }

    /// Requests slower than this are logged as warnings.
    pub(crate) fn slow_request_threshold_ms(&self) -> u64 {
        self.slow_request_threshold_ms
    }
}
