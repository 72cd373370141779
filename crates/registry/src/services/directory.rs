//! Directory service port and its reqwest-backed adapter.
//!
//! The adapter owns transport details only. Existence checks never fail from
//! the caller's point of view: every transport, status or decode problem comes
//! back as [`ExistenceResult::Unknown`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::models::email::{EmailCandidate, ExistenceResult};
use crate::models::registration::NewRegistration;
use crate::services::error::ServiceError;

/// Asks whether an address is already registered.
#[async_trait]
pub trait ExistenceCheck: Send + Sync {
    async fn check(&self, candidate: &EmailCandidate) -> ExistenceResult;
}

/// Full directory capability: existence checks plus account insertion.
#[async_trait]
pub trait Directory: ExistenceCheck {
    async fn submit(&self, record: &NewRegistration) -> Result<(), ServiceError>;
}

#[derive(Deserialize)]
struct ExistsResponse {
    exists: bool,
}

/// HTTP client for the remote directory/insertion service.
#[derive(Clone)]
pub struct DirectoryClient {
    client: Client,
    exists_url: Url,
    users_url: Url,
}

impl DirectoryClient {
    /// Builds a client rooted at `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .map_err(|e| ServiceError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        let exists_url = base
            .join("users/exists")
            .map_err(|e| ServiceError::InvalidUrl(e.to_string()))?;
        let users_url = base
            .join("users")
            .map_err(|e| ServiceError::InvalidUrl(e.to_string()))?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            exists_url,
            users_url,
        })
    }

    async fn fetch_exists(&self, candidate: &EmailCandidate) -> Result<bool, ServiceError> {
        let response = self
            .client
            .get(self.exists_url.clone())
            .query(&[("email", candidate.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Upstream { status });
        }

        let body: ExistsResponse = response.json().await?;
        Ok(body.exists)
    }
}

#[async_trait]
impl ExistenceCheck for DirectoryClient {
    async fn check(&self, candidate: &EmailCandidate) -> ExistenceResult {
        match self.fetch_exists(candidate).await {
            Ok(false) => ExistenceResult::Free,
            Ok(true) => ExistenceResult::Taken,
            Err(e) => {
                warn!(candidate = %candidate, error = %e, "existence check failed");
                ExistenceResult::Unknown
            }
        }
    }
}

#[async_trait]
impl Directory for DirectoryClient {
    async fn submit(&self, record: &NewRegistration) -> Result<(), ServiceError> {
        debug!(submission_id = %record.submission_id, "submitting registration");
        let response = self
            .client
            .post(self.users_url.clone())
            .json(record)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                info!(email = %record.email, submission_id = %record.submission_id, "registration accepted");
                Ok(())
            }
            StatusCode::CONFLICT => Err(ServiceError::AlreadyRegistered(record.email.clone())),
            status => Err(ServiceError::Upstream { status }),
        }
    }
}
