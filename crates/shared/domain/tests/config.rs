use orgdir_domain::config::{ApiConfig, StorageCompression, StorageEngine};
use serde_json::json;
use std::path::PathBuf;

#[test]
fn defaults_cover_every_section() {
    let cfg = ApiConfig::default();

    assert_eq!(cfg.server.port, 4583);
    assert!(cfg.server.ssl.is_none());
    assert_eq!(cfg.storage.engine, StorageEngine::Filesystem);
    assert_eq!(cfg.storage.data_dir, PathBuf::from("data"));
    assert_eq!(cfg.storage.compression, StorageCompression::None);
    assert_eq!(cfg.registry.base_url, "https://brasilapi.com.br/api/cnpj/v1");
    assert_eq!(cfg.registry.timeout_secs, 10);
    assert_eq!(cfg.directory.cache_max_age_secs, 300);
    assert_eq!(cfg.logging.level, "info");
    assert!(!cfg.logging.json);
}

#[test]
fn partial_documents_keep_defaults_for_the_rest() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "storage": { "engine": "memory", "compression": "lz4" },
        "registry": { "timeout_secs": 3 }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert!(cfg.server.address.is_ipv6());
    assert_eq!(cfg.storage.engine, StorageEngine::Memory);
    assert_eq!(cfg.storage.compression, StorageCompression::Lz4);
    assert_eq!(cfg.storage.data_dir, PathBuf::from("data"));
    assert_eq!(cfg.registry.timeout_secs, 3);
    assert_eq!(cfg.registry.base_url, "https://brasilapi.com.br/api/cnpj/v1");
    assert_eq!(cfg.directory.cache_max_age_secs, 300);
}

#[test]
fn unknown_engine_is_rejected() {
    let raw = json!({ "storage": { "engine": "postgres" } });
    assert!(serde_json::from_value::<ApiConfig>(raw).is_err());
}

#[test]
fn mutation_through_deref_mut_does_not_leak_into_clones() {
    let original = ApiConfig::default();
    let mut changed = original.clone();
    changed.server.port = 9000;

    assert_eq!(original.server.port, 4583);
    assert_eq!(changed.server.port, 9000);
}
