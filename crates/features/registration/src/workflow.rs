use crate::error::AdmissionError;
use crate::identifier::TaxId;
use crate::store::RegistrationStore;
use crate::verifier::RegistryVerifier;
use chrono::Utc;
use orgdir_domain::registration::{RegistrationForm, RegistrationRecord, RegistrationStatus};
use std::sync::Arc;
use tracing::info;

/// Admission and review of registrations.
#[derive(Debug, Clone)]
pub struct Registrations {
    store: RegistrationStore,
    verifier: Arc<dyn RegistryVerifier>,
}

impl Registrations {
    pub fn new(store: RegistrationStore, verifier: Arc<dyn RegistryVerifier>) -> Self {
        Self { store, verifier }
    }

    #[must_use]
    pub const fn store(&self) -> &RegistrationStore {
        &self.store
    }

    /// Admits a submitted registration as `pending`.
    ///
    /// Checks run in order and stop at the first failure: required fields, identifier
    /// structure, registry confirmation, then uniqueness. Nothing is written unless
    /// every check passes.
    ///
    /// Two concurrent submissions of the same identifier can both pass the uniqueness
    /// check; the later write replaces the earlier one.
    ///
    /// # Errors
    /// The [`AdmissionError`] variant of the first failed check, or
    /// [`AdmissionError::Storage`] / [`AdmissionError::Codec`] when persisting fails.
    pub async fn register(
        &self,
        form: RegistrationForm,
    ) -> Result<RegistrationRecord, AdmissionError> {
        let fields = missing_fields(&form);
        if !fields.is_empty() {
            info!(?fields, "Registration rejected: missing fields");
            return Err(AdmissionError::MissingFields { fields, context: None });
        }

        let identifier = TaxId::parse(&form.identifier).inspect_err(|err| {
            info!(error = %err, "Registration rejected: invalid identifier");
        })?;

        let verification = self.verifier.verify(&identifier).await;
        if !verification.valid {
            info!(identifier = identifier.as_str(), "Registration rejected: unverified identifier");
            return Err(AdmissionError::UnverifiedIdentifier {
                identifier: identifier.into_inner(),
                context: None,
            });
        }

        if self.store.exists(&identifier).await? {
            info!(identifier = identifier.as_str(), "Registration rejected: duplicate");
            return Err(AdmissionError::DuplicateRegistration {
                identifier: identifier.into_inner(),
                context: None,
            });
        }

        let record = RegistrationRecord::admit(
            form,
            identifier.into_inner(),
            Utc::now(),
            verification.registry_data,
        );
        self.store.save(&record).await?;

        info!(identifier = %record.identifier, "Registration accepted");
        Ok(record)
    }

    /// # Errors
    /// [`AdmissionError::InvalidIdentifier`] for a malformed identifier, or a storage
    /// failure.
    pub async fn find(
        &self,
        identifier: &str,
    ) -> Result<Option<RegistrationRecord>, AdmissionError> {
        let identifier = TaxId::parse(identifier)?;
        self.store.load(&identifier).await
    }

    /// Marks a registration as approved, making it visible in the directory.
    ///
    /// Every other field is preserved. Approving an already approved record is a no-op
    /// write.
    ///
    /// # Errors
    /// [`AdmissionError::InvalidIdentifier`], [`AdmissionError::NotFound`], or a
    /// storage failure.
    pub async fn approve(&self, identifier: &str) -> Result<RegistrationRecord, AdmissionError> {
        let identifier = TaxId::parse(identifier)?;
        let Some(mut record) = self.store.load(&identifier).await? else {
            return Err(AdmissionError::NotFound {
                identifier: identifier.into_inner(),
                context: None,
            });
        };

        record.status = RegistrationStatus::Approved;
        self.store.save(&record).await?;

        info!(identifier = %record.identifier, "Registration approved");
        Ok(record)
    }
}

/// Wire names of the required fields left blank in `form`.
fn missing_fields(form: &RegistrationForm) -> Vec<&'static str> {
    [
        ("identifier", &form.identifier),
        ("legalName", &form.legal_name),
        ("email", &form.email),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect()
}
