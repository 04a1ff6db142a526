//! Calendar date query parsing helpers.

use jiff::civil::Date;
use salvo::{oapi::extract::QueryParam, prelude::StatusError};

use crate::extensions::*;

pub(crate) trait DateParamExt {
    /// Parse a required `YYYY-MM-DD` query parameter.
    fn into_date(self, name: &str) -> Result<Date, StatusError>;
}

impl DateParamExt for QueryParam<String, true> {
    fn into_date(self, name: &str) -> Result<Date, StatusError> {
        self.into_inner()
            .trim()
            .parse::<Date>()
            .or_400(&format!("could not parse \"{name}\" query parameter"))
    }
}
