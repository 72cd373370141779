use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::models::email::EmailCandidate;

// DTO for API Request
#[derive(Debug, Deserialize)]
pub struct GenerateEmailRequest {
    pub name: String,
    pub surname: String,
}

// DTO for API Response
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateEmailResponse {
    pub address: String,
}

/// Raw registration form as posted by the browser.
#[derive(Clone, Deserialize)]
pub struct RegistrationForm {
    pub name: String,
    pub surname: String,
    pub password: String,
    #[serde(default)]
    pub secondary_email: Option<String>,
    pub phone: String,
    pub membership_code: String,
    /// `data:<mime>;base64,<payload>` as produced by `FileReader.readAsDataURL`.
    pub photo: String,
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("password", &"<redacted>")
            .field("secondary_email", &self.secondary_email)
            .field("phone", &self.phone)
            .field("membership_code", &self.membership_code)
            .field("photo", &format_args!("<{} bytes>", self.photo.len()))
            .finish()
    }
}

/// Decoded profile photo.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for PhotoUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoUpload")
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A form whose every field passed validation, normalised for submission.
#[derive(Debug, Clone)]
pub struct ValidatedRegistration {
    pub name: String,
    pub surname: String,
    pub password: String,
    pub secondary_email: Option<String>,
    /// Digits only, mask characters removed.
    pub phone: String,
    pub membership_code: String,
    pub photo: PhotoUpload,
}

/// Record sent to the directory's insertion endpoint.
#[derive(Serialize, Deserialize)]
pub struct NewRegistration {
    pub submission_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub password: String,
    pub secondary_email: Option<String>,
    pub phone: String,
    pub membership_code: String,
    pub photo_content_type: String,
    pub photo_base64: String,
}

impl NewRegistration {
    pub fn new(form: ValidatedRegistration, email: EmailCandidate) -> Self {
        Self {
            submission_id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            email: email.into_string(),
            name: form.name,
            surname: form.surname,
            password: form.password,
            secondary_email: form.secondary_email,
            phone: form.phone,
            membership_code: form.membership_code,
            photo_content_type: form.photo.content_type,
            photo_base64: STANDARD.encode(&form.photo.bytes),
        }
    }
}

impl fmt::Debug for NewRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewRegistration")
            .field("submission_id", &self.submission_id)
            .field("email", &self.email)
            .field("membership_code", &self.membership_code)
            .finish_non_exhaustive()
    }
}

// DTO For API Response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub address: String,
    pub submission_id: Uuid,
}
