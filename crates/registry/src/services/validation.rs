//! Field rules of the registration form.
//!
//! Every check is a pure function; [`RegistrationForm::validate`] runs all of
//! them and reports every failing field at once.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::models::email::NameField;
use crate::models::registration::{PhotoUpload, RegistrationForm, ValidatedRegistration};

pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;
const MIN_PASSWORD_CHARS: usize = 8;
const PASSWORD_SPECIALS: &str = "@$!%*?&";
const ALLOWED_SECONDARY_DOMAINS: &[&str] = &["gmail.com", "hotmail.com", "outlook.com", "yahoo.com"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

/// Individual password requirements, reported separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordRule {
    MinLengthNoSpaces,
    Lowercase,
    Uppercase,
    DigitAndSpecial,
}

impl PasswordRule {
    pub fn message(self) -> &'static str {
        match self {
            PasswordRule::MinLengthNoSpaces => "at least 8 characters and no spaces",
            PasswordRule::Lowercase => "at least one lowercase letter (a-z)",
            PasswordRule::Uppercase => "at least one uppercase letter (A-Z)",
            PasswordRule::DigitAndSpecial => {
                "at least one digit (0-9) and one special character (@$!%*?&)"
            }
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || ('À'..='ÿ').contains(&c) || c.is_whitespace()
}

/// Accepts letters (including Latin-1 accented ones) and spaces only.
pub fn validate_person_name(field: NameField, value: &str) -> Result<String, FieldError> {
    let field_name = match field {
        NameField::Name => "name",
        NameField::Surname => "surname",
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field_name, format!("Enter your {}.", field)));
    }
    if !trimmed.chars().all(is_name_char) {
        return Err(FieldError::new(
            field_name,
            format!("The {} may only contain letters and spaces.", field),
        ));
    }
    Ok(trimmed.to_string())
}

/// Returns the requirements `password` does not meet; empty when valid.
pub fn password_violations(password: &str) -> Vec<PasswordRule> {
    let mut violations = Vec::new();
    if password.chars().count() < MIN_PASSWORD_CHARS || password.chars().any(char::is_whitespace) {
        violations.push(PasswordRule::MinLengthNoSpaces);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push(PasswordRule::Lowercase);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push(PasswordRule::Uppercase);
    }
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
    if !(has_digit && has_special) {
        violations.push(PasswordRule::DigitAndSpecial);
    }
    violations
}

pub fn validate_password(password: &str) -> Result<(), FieldError> {
    let violations = password_violations(password);
    if violations.is_empty() {
        return Ok(());
    }
    let message = violations
        .iter()
        .map(|rule| rule.message())
        .collect::<Vec<_>>()
        .join("; ");
    Err(FieldError::new("password", format!("Password needs {}.", message)))
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn has_email_shape(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || !local.chars().all(|c| is_word_char(c) || c == '.' || c == '-') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels
        .iter()
        .all(|label| !label.is_empty() && label.chars().all(|c| is_word_char(c) || c == '-'));
    let tld_len = labels.last().map_or(0, |tld| tld.len());
    labels_ok && (2..=4).contains(&tld_len)
}

/// The secondary email is optional; when given it must be on an allowed
/// consumer provider. Returns the trimmed address, or `None` when blank.
pub fn validate_secondary_email(value: Option<&str>) -> Result<Option<String>, FieldError> {
    let Some(email) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if !has_email_shape(email) {
        return Err(FieldError::new("secondary_email", "Enter a valid email address."));
    }
    let domain = email
        .rsplit_once('@')
        .map(|(_, d)| d.to_lowercase())
        .unwrap_or_default();
    if !ALLOWED_SECONDARY_DOMAINS.contains(&domain.as_str()) {
        return Err(FieldError::new(
            "secondary_email",
            format!(
                "Only these providers are accepted: {}.",
                ALLOWED_SECONDARY_DOMAINS.join(", ")
            ),
        ));
    }
    Ok(Some(email.to_string()))
}

/// Strips mask characters and keeps the digits of a 10 or 11 digit number.
pub fn normalize_phone(value: &str) -> Result<String, FieldError> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    if !(10..=11).contains(&digits.len()) {
        return Err(FieldError::new(
            "phone",
            "Enter a phone number with area code (10 or 11 digits).",
        ));
    }
    Ok(digits)
}

pub fn validate_membership_code(value: &str) -> Result<String, FieldError> {
    let code = value.trim();
    if code.is_empty() {
        return Err(FieldError::new("membership_code", "Enter your membership code."));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(FieldError::new(
            "membership_code",
            "The membership code may only contain letters, digits and hyphens.",
        ));
    }
    Ok(code.to_string())
}

/// Decodes a `data:<mime>;base64,<payload>` URL holding an image.
pub fn decode_photo(data_url: &str) -> Result<PhotoUpload, FieldError> {
    let invalid = || FieldError::new("photo", "Select a valid image file.");

    let (header, payload) = data_url
        .trim()
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(invalid)?;
    let mime = header.strip_suffix(";base64").ok_or_else(invalid)?;
    let content_type = mime.split(';').next().unwrap_or_default();
    if !content_type.starts_with("image/") {
        return Err(invalid());
    }

    let bytes = STANDARD.decode(payload).map_err(|_| invalid())?;
    if bytes.is_empty() {
        return Err(invalid());
    }
    if bytes.len() > MAX_PHOTO_BYTES {
        return Err(FieldError::new("photo", "The image must be at most 5 MiB."));
    }

    Ok(PhotoUpload {
        content_type: content_type.to_string(),
        bytes,
    })
}

fn collect<T>(result: Result<T, FieldError>, errors: &mut Vec<FieldError>) -> Option<T> {
    result.map_err(|e| errors.push(e)).ok()
}

impl RegistrationForm {
    /// Checks every field and collects all failures.
    pub fn validate(&self) -> Result<ValidatedRegistration, ValidationErrors> {
        let mut errors = Vec::new();

        let name = collect(validate_person_name(NameField::Name, &self.name), &mut errors);
        let surname = collect(
            validate_person_name(NameField::Surname, &self.surname),
            &mut errors,
        );
        let password = collect(validate_password(&self.password), &mut errors);
        let secondary_email = collect(
            validate_secondary_email(self.secondary_email.as_deref()),
            &mut errors,
        );
        let phone = collect(normalize_phone(&self.phone), &mut errors);
        let membership_code = collect(validate_membership_code(&self.membership_code), &mut errors);
        let photo = collect(decode_photo(&self.photo), &mut errors);

        match (name, surname, password, secondary_email, phone, membership_code, photo) {
            (
                Some(name),
                Some(surname),
                Some(()),
                Some(secondary_email),
                Some(phone),
                Some(membership_code),
                Some(photo),
            ) => Ok(ValidatedRegistration {
                name,
                surname,
                password: self.password.clone(),
                secondary_email,
                phone,
                membership_code,
                photo,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}
