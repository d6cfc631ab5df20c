use serde::Serialize;

use crate::error::TransitError;

/// What to look up departures for: exactly one of a stop or a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleSelector {
    /// Stop identifier (ID or name).
    Stop(String),
    /// Line identifier.
    Line(String),
}

impl ScheduleSelector {
    /// Validate the exactly-one-of parameter contract.
    ///
    /// Blank strings count as absent. Neither or both present is a caller
    /// error, surfaced as a 400.
    ///
    /// # Errors
    /// Returns `TransitError::MissingParameter` when the contract is violated
    pub fn from_parts(
        stop: Option<String>,
        line: Option<String>,
    ) -> Result<Self, TransitError> {
        let stop = stop.filter(|value| !value.trim().is_empty());
        let line = line.filter(|value| !value.trim().is_empty());

        match (stop, line) {
            (Some(stop), None) => Ok(Self::Stop(stop)),
            (None, Some(line)) => Ok(Self::Line(line)),
            (None, None) => Err(TransitError::MissingParameter(
                "Missing required parameter: provide a stop identifier or a line identifier."
                    .to_owned(),
            )),
            (Some(_), Some(_)) => Err(TransitError::MissingParameter(
                "Provide either a stop identifier or a line identifier, not both.".to_owned(),
            )),
        }
    }
}

/// Formatted disruption lookup outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisruptionReport {
    /// One formatted string per disruption, possibly empty.
    pub disruptions: Vec<String>,
    /// Human message accompanying an empty list.
    pub message: Option<String>,
}

/// Formatted departure board outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleBoard {
    /// One formatted string per upcoming departure, possibly empty.
    pub departures: Vec<String>,
    /// Human message accompanying an empty list.
    pub message: Option<String>,
}

/// Boundary reply for disruption lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DisruptionReply {
    Success {
        disruptions: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Error {
        error_message: String,
    },
}

impl From<Result<DisruptionReport, TransitError>> for DisruptionReply {
    fn from(result: Result<DisruptionReport, TransitError>) -> Self {
        match result {
            Ok(report) => Self::Success {
                disruptions: report.disruptions,
                message: report.message,
            },
            Err(proxy_error) => Self::Error {
                error_message: proxy_error.to_string(),
            },
        }
    }
}

/// Boundary reply for schedule lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScheduleReply {
    Success {
        schedule: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Error {
        error_message: String,
    },
}

impl From<Result<ScheduleBoard, TransitError>> for ScheduleReply {
    fn from(result: Result<ScheduleBoard, TransitError>) -> Self {
        match result {
            Ok(board) => Self::Success {
                schedule: board.departures,
                message: board.message,
            },
            Err(proxy_error) => Self::Error {
                error_message: proxy_error.to_string(),
            },
        }
    }
}
