// POST endpoint api/registration

use crate::core::{ApiError, AppState};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use registry::{
    models::registration::{NewRegistration, RegistrationForm, RegistrationResponse},
    services::tokenizer::tokenize,
};
use tracing::info;

/// Validates the form, resolves an address and submits the account record.
#[axum::debug_handler]
pub async fn register_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<RegistrationForm>, JsonRejection>,
) -> Result<(StatusCode, Json<RegistrationResponse>), ApiError> {
    let Json(payload) = payload?;
    let validated = payload.validate()?;

    let address = app_state
        .resolver
        .resolve(
            &tokenize(&validated.name),
            &tokenize(&validated.surname),
            app_state.directory.as_ref(),
        )
        .await
        .into_result()?;

    let record = NewRegistration::new(validated, address);
    app_state.directory.submit(&record).await?;
    info!(email = %record.email, submission_id = %record.submission_id, "registration submitted");

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            address: record.email,
            submission_id: record.submission_id,
        }),
    ))
}
