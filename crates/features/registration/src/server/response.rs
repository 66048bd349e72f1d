use crate::error::AdmissionError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orgdir_derive::api_model;
use orgdir_domain::registration::RegistrationRecord;
use tracing::error;

/// Body of a successful admission.
#[api_model]
pub struct RegistrationAccepted {
    pub message: String,
    pub record: RegistrationRecord,
}

/// Public directory listing. `error` is present only when the listing failed, in
/// which case `records` is empty.
#[api_model]
pub struct DirectoryListing {
    pub records: Vec<RegistrationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[api_model]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub(crate) fn reply(status: StatusCode, message: impl Into<String>) -> Response {
        (status, Json(Self { error: message.into() })).into_response()
    }
}

impl AdmissionError {
    const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFields { .. }
            | Self::InvalidIdentifier { .. }
            | Self::UnverifiedIdentifier { .. } => StatusCode::BAD_REQUEST,
            Self::DuplicateRegistration { .. } => StatusCode::CONFLICT,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Storage { .. } | Self::Codec { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AdmissionError {
    fn into_response(self) -> Response {
        if self.is_transient() {
            error!(error = %self, "Registration request failed");
        }
        ErrorResponse::reply(self.status_code(), self.public_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::TaxId;

    #[test]
    fn status_codes_follow_the_error_class() {
        let invalid = AdmissionError::from(TaxId::parse("123").unwrap_err());
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let duplicate =
            AdmissionError::DuplicateRegistration { identifier: "11222333000181".into(), context: None };
        assert_eq!(duplicate.status_code(), StatusCode::CONFLICT);

        let codec = AdmissionError::from(serde_json::from_str::<u8>("x").unwrap_err());
        assert_eq!(codec.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(codec.public_message(), "Internal error, please try again later");
    }
}
