// POST endpoint api/email/generate

use crate::core::{ApiError, AppState};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use registry::{
    models::{
        email::NameField,
        registration::{GenerateEmailRequest, GenerateEmailResponse},
    },
    services::{
        tokenizer::tokenize,
        validation::{validate_person_name, ValidationErrors},
    },
};

/// Proposes the first free institutional address for a name pair.
#[axum::debug_handler]
pub async fn generate_email_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<GenerateEmailRequest>, JsonRejection>,
) -> Result<Json<GenerateEmailResponse>, ApiError> {
    let Json(payload) = payload?;

    // 1. Validate input with the same rules as the full form.
    let errors: Vec<_> = [
        validate_person_name(NameField::Name, &payload.name),
        validate_person_name(NameField::Surname, &payload.surname),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect();
    if !errors.is_empty() {
        return Err(ValidationErrors(errors).into());
    }

    // 2. Tokenise and search. Every non-resolved outcome becomes an ApiError.
    let address = app_state
        .resolver
        .resolve(
            &tokenize(&payload.name),
            &tokenize(&payload.surname),
            app_state.directory.as_ref(),
        )
        .await
        .into_result()?;

    Ok(Json(GenerateEmailResponse {
        address: address.into_string(),
    }))
}
