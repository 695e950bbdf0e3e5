//! HTTP schedule source.

use chrono::{Datelike, NaiveDate};
use daybook_core::{MonthAvailabilityEntry, YearMonth};
use tracing::debug;

use crate::error::ProviderResult;
use crate::raw::RawAppointment;
use crate::source::{BoxFuture, ScheduleSource};

use super::client::HttpClient;
use super::config::HttpConfig;

/// Schedule source backed by the booking REST API.
#[derive(Debug)]
pub struct HttpSource {
    client: HttpClient,
}

impl HttpSource {
    /// Creates a new HTTP source with the given configuration.
    pub fn new(config: HttpConfig) -> ProviderResult<Self> {
        Ok(Self {
            client: HttpClient::new(config)?,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HttpConfig {
        self.client.config()
    }
}

/// Path of the month availability endpoint for a provider.
pub(crate) fn availability_path(provider_id: &str) -> String {
    format!(
        "providers/{}/month-availability",
        urlencoding::encode(provider_id)
    )
}

/// Query of the month availability endpoint. Months are 1-based on the wire.
pub(crate) fn availability_query(month: YearMonth) -> Vec<(&'static str, String)> {
    vec![
        ("year", month.year().to_string()),
        ("month", month.month().to_string()),
    ]
}

/// Query of the day appointments endpoint.
pub(crate) fn appointments_query(date: NaiveDate) -> Vec<(&'static str, String)> {
    vec![
        ("year", date.year().to_string()),
        ("month", date.month().to_string()),
        ("day", date.day().to_string()),
    ]
}

const APPOINTMENTS_PATH: &str = "appointments/me";

impl ScheduleSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    fn month_availability(
        &self,
        provider_id: &str,
        month: YearMonth,
    ) -> BoxFuture<'_, ProviderResult<Vec<MonthAvailabilityEntry>>> {
        let path = availability_path(provider_id);
        let query = availability_query(month);
        Box::pin(async move {
            debug!(%month, "fetching month availability");
            self.client
                .get_json::<Vec<MonthAvailabilityEntry>>(&path, &query)
                .await
                .map_err(|e| e.with_source_name(self.name()))
        })
    }

    fn day_appointments(
        &self,
        provider_id: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, ProviderResult<Vec<RawAppointment>>> {
        // The endpoint scopes by the session token; the id is only logged.
        let provider_id = provider_id.to_string();
        let query = appointments_query(date);
        Box::pin(async move {
            debug!(provider = %provider_id, %date, "fetching day appointments");
            self.client
                .get_json::<Vec<RawAppointment>>(APPOINTMENTS_PATH, &query)
                .await
                .map_err(|e| e.with_source_name(self.name()))
        })
    }
}
