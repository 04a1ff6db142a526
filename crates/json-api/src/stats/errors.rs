//! Stats Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::stats::StatsServiceError;

pub(crate) fn into_status_error(error: StatsServiceError) -> StatusError {
    match error {
        StatsServiceError::InvalidRange { start, end } => StatusError::bad_request()
            .brief("Start date must not be after end date")
            .detail(format!("start={start} end={end}")),
        StatsServiceError::Sql(source) => {
            error!("stats query failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
