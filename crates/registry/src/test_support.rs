//! Scripted in-memory directory for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::email::{EmailCandidate, ExistenceResult};
use crate::models::registration::NewRegistration;
use crate::services::directory::{Directory, ExistenceCheck};
use crate::services::error::ServiceError;

#[derive(Clone, Copy)]
enum SubmitBehaviour {
    Accept,
    Conflict,
}

/// Answers existence checks from a fixed script and records every call.
///
/// Addresses not in the script answer with the default, which is `Free`.
pub struct StubDirectory {
    script: HashMap<String, ExistenceResult>,
    default: ExistenceResult,
    submit: SubmitBehaviour,
    checked: Mutex<Vec<String>>,
    submitted: Mutex<Vec<String>>,
}

impl Default for StubDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl StubDirectory {
    pub fn new() -> Self {
        Self {
            script: HashMap::new(),
            default: ExistenceResult::Free,
            submit: SubmitBehaviour::Accept,
            checked: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_free(self, address: &str) -> Self {
        self.with(address, ExistenceResult::Free)
    }

    pub fn with_taken(self, address: &str) -> Self {
        self.with(address, ExistenceResult::Taken)
    }

    pub fn with_unknown(self, address: &str) -> Self {
        self.with(address, ExistenceResult::Unknown)
    }

    pub fn taken_by_default(mut self) -> Self {
        self.default = ExistenceResult::Taken;
        self
    }

    pub fn unknown_by_default(mut self) -> Self {
        self.default = ExistenceResult::Unknown;
        self
    }

    /// Makes `submit` answer as if the address had been registered meanwhile.
    pub fn rejecting_submissions(mut self) -> Self {
        self.submit = SubmitBehaviour::Conflict;
        self
    }

    fn with(mut self, address: &str, result: ExistenceResult) -> Self {
        self.script.insert(address.to_string(), result);
        self
    }

    /// Addresses checked so far, in call order.
    pub fn checked(&self) -> Vec<String> {
        self.checked.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.checked.lock().unwrap().len()
    }

    /// Emails of accepted submissions, in call order.
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExistenceCheck for StubDirectory {
    async fn check(&self, candidate: &EmailCandidate) -> ExistenceResult {
        self.checked
            .lock()
            .unwrap()
            .push(candidate.as_str().to_string());
        self.script
            .get(candidate.as_str())
            .copied()
            .unwrap_or(self.default)
    }
}

#[async_trait]
impl Directory for StubDirectory {
    async fn submit(&self, record: &NewRegistration) -> Result<(), ServiceError> {
        match self.submit {
            SubmitBehaviour::Accept => {
                self.submitted.lock().unwrap().push(record.email.clone());
                Ok(())
            }
            SubmitBehaviour::Conflict => Err(ServiceError::AlreadyRegistered(record.email.clone())),
        }
    }
}
