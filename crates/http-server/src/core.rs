use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use registry::services::{
    directory::Directory,
    error::{ResolutionFailure, ServiceError},
    resolver::EmailResolver,
    validation::ValidationErrors,
};
use serde_json::json;
use std::{env, sync::Arc, time::Duration};
use thiserror::Error;
use tracing::error;

const DEFAULT_DOMAIN: &str = "aiesec.org.br";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_DIRECTORY_TIMEOUT_SECS: u64 = 10;

// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn Directory>,
    pub resolver: EmailResolver,
}

impl AppState {
    pub fn new(directory: Arc<dyn Directory>, domain: &str) -> Self {
        Self {
            directory,
            resolver: EmailResolver::new(domain),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub domain: String,
    pub directory_api_url: String,
    pub port: u16,
    pub directory_timeout: Duration,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

fn parse_var<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let directory_api_url = env::var("DIRECTORY_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DIRECTORY_API_URL"))?;
        let domain = env::var("DOMAIN")
            .ok()
            .map(|d| d.trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_DOMAIN.to_string());
        let port = parse_var("PORT", DEFAULT_PORT)?;
        let timeout_secs = parse_var("DIRECTORY_TIMEOUT_SECS", DEFAULT_DIRECTORY_TIMEOUT_SECS)?;

        Ok(Self {
            domain,
            directory_api_url,
            port,
            directory_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// Custom error type for our API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Malformed request body: {0}")]
    Body(#[from] JsonRejection),

    #[error(transparent)]
    Resolution(#[from] ResolutionFailure),

    #[error(transparent)]
    Directory(#[from] ServiceError),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
            ApiError::Body(rejection) => (rejection.status(), "invalid_body"),
            ApiError::Resolution(ResolutionFailure::EmptyTokenSequence(_)) => {
                (StatusCode::BAD_REQUEST, "empty_name")
            }
            ApiError::Resolution(ResolutionFailure::ConflictBothSingleToken) => {
                (StatusCode::CONFLICT, "name_pair_taken")
            }
            ApiError::Resolution(ResolutionFailure::Exhausted) => {
                (StatusCode::CONFLICT, "combinations_exhausted")
            }
            ApiError::Resolution(ResolutionFailure::LookupFailed) => {
                (StatusCode::SERVICE_UNAVAILABLE, "directory_unavailable")
            }
            ApiError::Directory(ServiceError::AlreadyRegistered(_)) => {
                (StatusCode::CONFLICT, "already_registered")
            }
            ApiError::Directory(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = match self {
            ApiError::Validation(errors) => json!({
                "error": "Some fields are invalid.",
                "code": code,
                "fields": errors.0,
            }),
            ApiError::Directory(e @ ServiceError::AlreadyRegistered(_)) => {
                json!({ "error": e.to_string(), "code": code })
            }
            ApiError::Directory(e) => {
                // Transport details stay in the logs.
                error!(error = %e, "directory request failed");
                json!({ "error": "The directory service failed; try again later.", "code": code })
            }
            ApiError::Body(rejection) => {
                json!({ "error": rejection.body_text(), "code": code })
            }
            other => json!({ "error": other.to_string(), "code": code }),
        };

        (status, Json(body)).into_response()
    }
}
