use crate::config::ConfigError;
use crate::leads::{LeadId, LeadSourceError, OutreachError, OutreachSkipped};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    LeadSource(LeadSourceError),
    Outreach(OutreachError),
    OutreachSkipped(OutreachSkipped),
    LeadNotFound(LeadId),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::LeadSource(err) => write!(f, "lead fetch failed: {}", err),
            AppError::Outreach(err) => write!(f, "outreach failed: {}", err),
            AppError::OutreachSkipped(reason) => write!(f, "outreach not triggered: {}", reason),
            AppError::LeadNotFound(id) => write!(f, "lead {} not found", id),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::LeadSource(err) => Some(err),
            AppError::Outreach(err) => Some(err),
            AppError::OutreachSkipped(reason) => Some(reason),
            AppError::LeadNotFound(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::LeadNotFound(_) => StatusCode::NOT_FOUND,
            AppError::OutreachSkipped(_) => StatusCode::CONFLICT,
            AppError::LeadSource(_) | AppError::Outreach(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<LeadSourceError> for AppError {
    fn from(value: LeadSourceError) -> Self {
        Self::LeadSource(value)
    }
}

impl From<OutreachError> for AppError {
    fn from(value: OutreachError) -> Self {
        Self::Outreach(value)
    }
}

impl From<OutreachSkipped> for AppError {
    fn from(value: OutreachSkipped) -> Self {
        Self::OutreachSkipped(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_failures_map_to_bad_gateway() {
        let response = AppError::from(LeadSourceError::Network("refused".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = AppError::LeadNotFound(LeadId::from("lead-9")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::from(OutreachSkipped::NoSelection).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
