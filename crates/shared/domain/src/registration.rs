//! Registration records and the admission form.

use chrono::{DateTime, Utc};
use orgdir_derive::api_model;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Review state of a registration.
///
/// Values outside the known set are kept verbatim in [`Other`](Self::Other) so records
/// written by newer services still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RegistrationStatus {
    #[default]
    Pending,
    Approved,
    Other(String),
}

impl RegistrationStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Other(value) => value,
        }
    }

    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl From<String> for RegistrationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            _ => Self::Other(value),
        }
    }
}

impl From<RegistrationStatus> for String {
    fn from(status: RegistrationStatus) -> Self {
        match status {
            RegistrationStatus::Other(value) => value,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Company data confirmed by the external registry at admission time.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RegistryData {
    pub legal_name: String,
    pub trade_name: String,
    /// Registration situation reported by the registry, e.g. `ATIVA`.
    pub situation: String,
    /// `street, number - district`
    pub address: String,
    pub city: String,
    pub state: String,
}

/// Submitted registration as received from the public form.
///
/// Every field defaults to empty so incomplete submissions reach field validation
/// instead of failing to parse.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RegistrationForm {
    /// Tax identifier, punctuated or digits only.
    pub identifier: String,
    pub legal_name: String,
    pub trade_name: String,
    pub sector: String,
    pub description: String,
    pub address: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub phone: String,
    pub mobile: String,
    pub email: String,
    pub website: Option<String>,
}

/// Stored registration. Persisted as JSON under `entity-<identifier>`.
#[api_model(deny_unknown_fields = false)]
#[derive(Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RegistrationRecord {
    /// Exactly 14 digits.
    pub identifier: String,
    pub legal_name: String,
    pub trade_name: String,
    pub sector: String,
    pub description: String,
    pub address: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub phone: String,
    pub mobile: String,
    pub email: String,
    pub website: Option<String>,
    /// Assigned by the server when the registration is admitted.
    pub registered_at: DateTime<Utc>,
    #[cfg_attr(feature = "server", schema(value_type = String, example = "pending"))]
    pub status: RegistrationStatus,
    pub registry_data: Option<RegistryData>,
}

impl RegistrationRecord {
    /// Builds a pending record from a submitted form.
    ///
    /// `identifier` must already be normalized; the form's own identifier is ignored.
    #[must_use]
    pub fn admit(
        form: RegistrationForm,
        identifier: String,
        registered_at: DateTime<Utc>,
        registry_data: Option<RegistryData>,
    ) -> Self {
        let RegistrationForm {
            identifier: _,
            legal_name,
            trade_name,
            sector,
            description,
            address,
            street,
            number,
            complement,
            district,
            city,
            state,
            postal_code,
            phone,
            mobile,
            email,
            website,
        } = form;

        Self {
            identifier,
            legal_name,
            trade_name,
            sector,
            description,
            address,
            street,
            number,
            complement,
            district,
            city,
            state,
            postal_code,
            phone,
            mobile,
            email,
            website: website.filter(|w| !w.trim().is_empty()),
            registered_at,
            status: RegistrationStatus::Pending,
            registry_data,
        }
    }
}
