//! Stats service errors.

use jiff::civil::Date;
use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsServiceError {
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: Date, end: Date },

    #[error("storage error")]
    Sql(#[from] Error),
}
