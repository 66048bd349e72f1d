use crate::error::AdmissionError;
use crate::store::RegistrationStore;
use orgdir_domain::registration::RegistrationRecord;

/// Read-only public view over approved registrations.
#[derive(Debug, Clone)]
pub struct Directory {
    store: RegistrationStore,
}

impl Directory {
    pub const fn new(store: RegistrationStore) -> Self {
        Self { store }
    }

    /// Approved registrations in store order. Pending and unknown statuses are never
    /// returned.
    ///
    /// # Errors
    /// A storage failure while listing.
    pub async fn list_approved(&self) -> Result<Vec<RegistrationRecord>, AdmissionError> {
        let mut records = self.store.list_all().await?;
        records.retain(|record| record.status.is_approved());
        Ok(records)
    }
}
