use super::response::{DirectoryListing, ErrorResponse, RegistrationAccepted};
use crate::Registration;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use orgdir_derive::api_handler;
use orgdir_domain::constants::{DIRECTORY_TAG, REGISTRATION_TAG};
use orgdir_domain::registration::RegistrationForm;
use orgdir_kernel::server::ApiState;
use tracing::{error, info};

const ACCEPTED_MESSAGE: &str = "Registration received and pending approval";
const INTERNAL_MESSAGE: &str = "Internal error, please try again later";
const DIRECTORY_FAILED_MESSAGE: &str = "Failed to load directory";

#[api_handler(
    post,
    path = "/api/registrations",
    request_body = RegistrationForm,
    responses(
        (status = CREATED, description = "Registration admitted as pending", body = RegistrationAccepted),
        (status = BAD_REQUEST, description = "Missing fields, invalid or unverified identifier, malformed body", body = ErrorResponse),
        (status = CONFLICT, description = "Identifier already registered", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Transient failure, retry later", body = ErrorResponse),
    ),
    tag = REGISTRATION_TAG,
)]
pub(super) async fn register_handler(
    State(state): State<ApiState>,
    payload: Result<Json<RegistrationForm>, JsonRejection>,
) -> Response {
    let Json(form) = match payload {
        Ok(form) => form,
        Err(rejection) => {
            info!(error = %rejection, "Registration rejected: malformed body");
            return ErrorResponse::reply(StatusCode::BAD_REQUEST, "Malformed request body");
        },
    };

    let slice = match state.try_get_slice::<Registration>() {
        Ok(slice) => slice,
        Err(err) => {
            error!(error = %err, "Registration slice unavailable");
            return ErrorResponse::reply(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE);
        },
    };

    match slice.registrations.register(form).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(RegistrationAccepted { message: ACCEPTED_MESSAGE.to_owned(), record }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

#[api_handler(
    get,
    path = "/api/directory",
    responses(
        (status = OK, description = "Approved organizations", body = DirectoryListing),
        (status = INTERNAL_SERVER_ERROR, description = "Directory could not be loaded", body = DirectoryListing),
    ),
    tag = DIRECTORY_TAG,
)]
pub(super) async fn directory_handler(State(state): State<ApiState>) -> Response {
    let listing = match state.try_get_slice::<Registration>() {
        Ok(slice) => slice.directory.list_approved().await.map_err(|err| err.to_string()),
        Err(err) => Err(err.to_string()),
    };

    match listing {
        Ok(records) => {
            let cache = format!("public, max-age={}", state.config.directory.cache_max_age_secs);
            (
                [(header::CACHE_CONTROL, cache)],
                Json(DirectoryListing { records, error: None }),
            )
                .into_response()
        },
        Err(err) => {
            error!(error = %err, "Directory listing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DirectoryListing {
                    records: Vec::new(),
                    error: Some(DIRECTORY_FAILED_MESSAGE.to_owned()),
                }),
            )
                .into_response()
        },
    }
}
