use crate::error::{AdmissionError, AdmissionErrorExt};
use crate::identifier::TaxId;
use orgdir_domain::constants::ENTITY_KEY_PREFIX;
use orgdir_domain::registration::RegistrationRecord;
use orgdir_storage::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage key of the registration for `identifier`.
#[must_use]
pub fn storage_key(identifier: &str) -> String {
    format!("{ENTITY_KEY_PREFIX}{identifier}")
}

/// Registration records as JSON documents over a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct RegistrationStore {
    kv: Arc<dyn KeyValueStore>,
}

impl RegistrationStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// # Errors
    /// [`AdmissionError::Storage`] when the backing store cannot be read.
    pub async fn exists(&self, identifier: &TaxId) -> Result<bool, AdmissionError> {
        self.kv
            .contains(&storage_key(identifier.as_str()))
            .await
            .context("Failed to check for an existing registration")
    }

    /// Writes `record` under its identifier, replacing any previous value.
    ///
    /// # Errors
    /// [`AdmissionError::Codec`] or [`AdmissionError::Storage`].
    pub async fn save(&self, record: &RegistrationRecord) -> Result<(), AdmissionError> {
        let key = storage_key(&record.identifier);
        let bytes = serde_json::to_vec(record).context("Failed to encode registration")?;
        self.kv.set(&key, &bytes).await.context(key)
    }

    /// # Errors
    /// [`AdmissionError::Storage`] on read failure, [`AdmissionError::Codec`] when the
    /// stored document is not a registration.
    pub async fn load(
        &self,
        identifier: &TaxId,
    ) -> Result<Option<RegistrationRecord>, AdmissionError> {
        let key = storage_key(identifier.as_str());
        let Some(bytes) = self.kv.get(&key).await.context(key.clone())? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes).map(Some).context(key)
    }

    /// Every decodable registration, in key order.
    ///
    /// Entries that cannot be decoded, or that disappear between listing and reading,
    /// are skipped.
    ///
    /// # Errors
    /// [`AdmissionError::Storage`] when listing or reading fails.
    pub async fn list_all(&self) -> Result<Vec<RegistrationRecord>, AdmissionError> {
        let keys = self.kv.keys(ENTITY_KEY_PREFIX).await.context("Failed to list registrations")?;
        let mut records = Vec::with_capacity(keys.len());

        for key in keys {
            let Some(bytes) = self.kv.get(&key).await.context(key.clone())? else {
                debug!(%key, "Registration vanished while listing");
                continue;
            };

            match serde_json::from_slice::<RegistrationRecord>(&bytes) {
                Ok(record) => records.push(record),
                Err(err) => warn!(%key, error = %err, "Skipping undecodable registration"),
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use orgdir_domain::registration::{RegistrationForm, RegistrationStatus};
    use orgdir_storage::MemoryStore;

    fn record(identifier: &str, status: RegistrationStatus) -> RegistrationRecord {
        let form = RegistrationForm { legal_name: "ACME LTDA".into(), ..Default::default() };
        RegistrationRecord {
            status,
            ..RegistrationRecord::admit(form, identifier.to_owned(), Utc::now(), None)
        }
    }

    #[tokio::test]
    async fn save_then_load_by_identifier() {
        let store = RegistrationStore::new(Arc::new(MemoryStore::new()));
        let id = TaxId::parse("11222333000181").unwrap();
        assert!(!store.exists(&id).await.unwrap());

        let saved = record(id.as_str(), RegistrationStatus::Pending);
        store.save(&saved).await.unwrap();

        assert!(store.exists(&id).await.unwrap());
        assert_eq!(store.load(&id).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn list_all_skips_corrupt_and_foreign_entries() {
        let kv = Arc::new(MemoryStore::new());
        let store = RegistrationStore::new(kv.clone());

        store.save(&record("11222333000181", RegistrationStatus::Approved)).await.unwrap();
        kv.set("entity-00000000000000", b"{not json").await.unwrap();
        kv.set("session-1", b"{}").await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].identifier, "11222333000181");
    }

    #[tokio::test]
    async fn keys_carry_the_entity_prefix() {
        let kv = Arc::new(MemoryStore::new());
        let store = RegistrationStore::new(kv.clone());
        store.save(&record("11222333000181", RegistrationStatus::Pending)).await.unwrap();

        assert_eq!(kv.keys("").await.unwrap(), vec!["entity-11222333000181"]);
    }
}
