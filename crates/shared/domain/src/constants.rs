//! Shared names: `OpenAPI` tags and storage keys.

pub const SYSTEM_TAG: &str = "System";
pub const REGISTRATION_TAG: &str = "Registration";
pub const DIRECTORY_TAG: &str = "Directory";

/// Storage namespace holding registration records.
pub const ENTITIES_NAMESPACE: &str = "entities";
/// Key prefix of a registration record: `entity-<identifier>`.
pub const ENTITY_KEY_PREFIX: &str = "entity-";
