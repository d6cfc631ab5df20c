use std::time::Duration;

use reqwest::{Client, Response};
use serde::Deserialize;
use stadsgids_core::TransitConfig;
use tracing::{debug, error, info};

use crate::error::TransitError;
use crate::types::{DisruptionReport, ScheduleBoard, ScheduleSelector};

/// Header carrying the De Lijn subscription key.
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
/// Maximum upstream body length echoed into the operator log.
const LOG_BODY_LIMIT: usize = 500;

/// HTTP client proxying disruption and schedule lookups to the De Lijn API.
#[derive(Debug)]
pub struct TransitClient {
    http: Client,
    api_key: String,
    base_url: String,
    area: String,
    deadline: Duration,
}

impl TransitClient {
    /// Create a client from transit configuration.
    ///
    /// # Errors
    /// Returns `TransitError::MissingApiKey` if no subscription key is configured
    pub fn new(config: &TransitConfig) -> Result<Self, TransitError> {
        let api_key = config.api_key.clone().ok_or(TransitError::MissingApiKey)?;

        Ok(Self {
            http: Client::default(),
            api_key,
            base_url: config.base_url.clone(),
            area: config.area.clone(),
            deadline: config.request_timeout,
        })
    }

    /// Fetch current disruptions for the service area, optionally narrowed
    /// by a free-text filter.
    ///
    /// # Errors
    /// Returns a `TransitError` describing the upstream condition
    pub async fn disruptions(
        &self,
        filter: Option<&str>,
    ) -> Result<DisruptionReport, TransitError> {
        let url = format!("{}/disruptions", self.base_url);
        let mut request = self
            .http
            .get(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .timeout(self.deadline)
            .query(&[("area", self.area.as_str())]);
        if let Some(filter) = filter {
            request = request.query(&[("query", filter)]);
        }

        debug!("Requesting De Lijn disruptions: {url}");
        let response = request
            .send()
            .await
            .map_err(|transport_error| Self::map_transport_error(&transport_error))?;
        let response = Self::check_status(response, "disruption").await?;

        let payload: DisruptionsPayload = response.json().await.map_err(|decode_error| {
            error!("Unreadable disruptions payload: {decode_error}");
            TransitError::MalformedPayload
        })?;

        let mut entries = payload.interruptions;
        entries.extend(payload.detours);
        let disruptions: Vec<String> = entries.iter().map(format_disruption).collect();

        let message = if disruptions.is_empty() {
            Some(match filter {
                Some(filter) => format!(
                    "No current disruptions reported for {} matching filter: '{filter}'.",
                    self.area
                ),
                None => format!("No current disruptions reported for {}.", self.area),
            })
        } else {
            None
        };

        info!("Found {} disruptions", disruptions.len());
        Ok(DisruptionReport {
            disruptions,
            message,
        })
    }

    /// Fetch upcoming departures for a stop or a line.
    ///
    /// # Errors
    /// Returns a `TransitError` describing the upstream condition
    pub async fn schedule(
        &self,
        selector: &ScheduleSelector,
    ) -> Result<ScheduleBoard, TransitError> {
        let url = format!("{}/schedule", self.base_url);
        let request = self
            .http
            .get(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .timeout(self.deadline)
            .query(&[("area", self.area.as_str())]);
        let request = match selector {
            ScheduleSelector::Stop(stop) => request.query(&[("stopIdentifier", stop.as_str())]),
            ScheduleSelector::Line(line) => request.query(&[("lineFilter", line.as_str())]),
        };

        debug!("Requesting De Lijn schedule: {url}");
        let response = request
            .send()
            .await
            .map_err(|transport_error| Self::map_transport_error(&transport_error))?;
        let response = Self::check_status(response, "schedule").await?;

        let payload: SchedulePayload = response.json().await.map_err(|decode_error| {
            error!("Unreadable schedule payload: {decode_error}");
            TransitError::MalformedPayload
        })?;

        let departures: Vec<String> = payload.departures.iter().map(format_departure).collect();
        let message = departures
            .is_empty()
            .then(|| "No schedule information found matching your query.".to_owned());

        info!("Found {} schedule entries", departures.len());
        Ok(ScheduleBoard {
            departures,
            message,
        })
    }

    /// Distinguish a hung upstream from an unreachable one.
    fn map_transport_error(transport_error: &reqwest::Error) -> TransitError {
        if transport_error.is_timeout() {
            error!("De Lijn API request timed out: {transport_error}");
            TransitError::Timeout
        } else {
            error!("Could not connect to De Lijn API: {transport_error}");
            TransitError::Connect
        }
    }

    /// Pass a successful response through, mapping everything else to a
    /// status-specific error. The raw body goes to the log, truncated.
    async fn check_status(response: Response, subject: &str) -> Result<Response, TransitError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let preview: String = body.chars().take(LOG_BODY_LIMIT).collect();
        error!("De Lijn API request failed: status {status}, response: {preview}");

        Err(TransitError::for_status(status.as_u16(), subject))
    }
}

/// Upstream disruptions payload: interruptions and planned detours.
#[derive(Debug, Default, Deserialize)]
struct DisruptionsPayload {
    /// Unplanned service interruptions.
    #[serde(default)]
    interruptions: Vec<DisruptionEntry>,
    /// Planned detours.
    #[serde(default)]
    detours: Vec<DisruptionEntry>,
}

/// A single upstream disruption record.
#[derive(Debug, Deserialize)]
struct DisruptionEntry {
    /// Disruption category as reported upstream.
    #[serde(default, rename = "type")]
    kind: Option<String>,
    /// Free-text details.
    #[serde(default)]
    details: Option<String>,
}

/// Upstream schedule payload.
#[derive(Debug, Default, Deserialize)]
struct SchedulePayload {
    /// Upcoming departures.
    #[serde(default)]
    departures: Vec<DepartureEntry>,
}

/// A single upstream departure record.
#[derive(Debug, Deserialize)]
struct DepartureEntry {
    /// Line number.
    #[serde(default)]
    line: Option<String>,
    /// Departure time.
    #[serde(default)]
    time: Option<String>,
    /// Destination shown on the vehicle.
    #[serde(default)]
    direction: Option<String>,
}

fn format_disruption(entry: &DisruptionEntry) -> String {
    format!(
        "{}: {}",
        entry.kind.as_deref().unwrap_or("Disruption"),
        entry
            .details
            .as_deref()
            .unwrap_or("No specific details provided")
    )
}

fn format_departure(entry: &DepartureEntry) -> String {
    format!(
        "Line {} at {} towards {}",
        entry.line.as_deref().unwrap_or("?"),
        entry.time.as_deref().unwrap_or("?"),
        entry.direction.as_deref().unwrap_or("?")
    )
}
