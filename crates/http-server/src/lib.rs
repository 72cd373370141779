use axum::{extract::DefaultBodyLimit, routing::post, Router};
use registry::services::validation::MAX_PHOTO_BYTES;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod core;

pub use crate::core::{ApiError, AppConfig, AppState, ConfigError};

/// Room for the non-photo fields of a registration form.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Largest registration body: the base64 text of a maximal photo plus the
/// remaining form fields.
pub const MAX_REGISTRATION_BODY_BYTES: usize = MAX_PHOTO_BYTES.div_ceil(3) * 4 + FORM_OVERHEAD_BYTES;

/// Builds the application router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/email/generate", post(api::email::generate_email_handler))
        .route(
            "/api/registration",
            post(api::registration::register_handler)
                .layer(DefaultBodyLimit::max(MAX_REGISTRATION_BODY_BYTES)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
