//! Sales By Date Handler

use std::{collections::BTreeMap, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::stats::{SalesByDate, records::DateRange};

use crate::{extensions::*, state::State, stats::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SalesResponse {
    pub start: String,
    pub end: String,

    /// Revenue keyed by UTC date (`YYYY-MM-DD`); days without sales are absent
    pub sales: BTreeMap<String, u64>,
}

impl SalesResponse {
    fn new(range: DateRange, sales: &SalesByDate) -> Self {
        SalesResponse {
            start: range.start.to_string(),
            end: range.end.to_string(),
            sales: sales
                .iter()
                .map(|(date, total)| (date.to_string(), total))
                .collect(),
        }
    }
}

/// Sales By Date Handler
///
/// Revenue per UTC day between two inclusive dates.
#[endpoint(
    tags("stats"),
    summary = "Sales By Date",
    responses(
        (status_code = StatusCode::OK, description = "Daily sales"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid date range"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    start: QueryParam<String, true>,
    end: QueryParam<String, true>,
    depot: &mut Depot,
) -> Result<Json<SalesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let range = DateRange {
        start: start.into_date("start")?,
        end: end.into_date("end")?,
    };

    let sales = state
        .app
        .stats
        .sales_by_date(range)
        .await
        .map_err(into_status_error)?;

    Ok(Json(SalesResponse::new(range, &sales)))
}
