use crate::identifier::IdentifierError;
use orgdir_storage::StorageError;
use std::borrow::Cow;

/// Why a registration was not admitted, or why a stored registration could not be read.
///
/// The first four variants are caller mistakes; `Storage` and `Codec` are
/// infrastructure failures that may succeed on retry.
#[orgdir_derive::orgdir_error]
pub enum AdmissionError {
    #[error("Missing required fields{}: {}", format_context(.context), .fields.join(", "))]
    MissingFields { fields: Vec<&'static str>, context: Option<Cow<'static, str>> },

    #[error("Invalid tax identifier{}: {source}", format_context(.context))]
    InvalidIdentifier { source: IdentifierError, context: Option<Cow<'static, str>> },

    #[error("Tax identifier not confirmed by the registry{}: {identifier}", format_context(.context))]
    UnverifiedIdentifier { identifier: String, context: Option<Cow<'static, str>> },

    #[error("Organization already registered{}: {identifier}", format_context(.context))]
    DuplicateRegistration { identifier: String, context: Option<Cow<'static, str>> },

    #[error("Registration not found{}: {identifier}", format_context(.context))]
    NotFound { identifier: String, context: Option<Cow<'static, str>> },

    #[error("Registration storage failure{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Registration encoding failure{}: {source}", format_context(.context))]
    Codec { source: serde_json::Error, context: Option<Cow<'static, str>> },
}

impl AdmissionError {
    /// Message safe to show to the submitter. Infrastructure detail is never included.
    #[must_use]
    pub fn public_message(&self) -> Cow<'static, str> {
        match self {
            Self::MissingFields { fields, .. } => {
                format!("Missing required fields: {}", fields.join(", ")).into()
            },
            Self::InvalidIdentifier { .. } => "Invalid tax identifier".into(),
            Self::UnverifiedIdentifier { .. } => {
                "Tax identifier could not be verified with the registry".into()
            },
            Self::DuplicateRegistration { .. } => "Organization already registered".into(),
            Self::NotFound { .. } => "Registration not found".into(),
            Self::Storage { .. } | Self::Codec { .. } => {
                "Internal error, please try again later".into()
            },
        }
    }

    /// `true` for failures a retry may resolve.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Codec { .. })
    }
}
