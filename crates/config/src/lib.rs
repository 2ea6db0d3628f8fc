//! Configuration loading and validation.
//!
//! Configuration is an explicit struct populated once at startup and passed
//! by reference to every component that needs it, never a global registry
//! read at arbitrary points. Sources are layered: serialized defaults, then
//! an optional TOML file (an explicit path, or the platform config
//! directory), then `BOOKSTALL_`-prefixed environment variables. The
//! environment layer is where secrets such as the checkout provider key
//! arrive; they have no place in a config file that gets committed.

pub mod error;

use exn::ResultExt;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ErrorKind, Result};

/// Top-level configuration, one section per concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub catalog: CatalogConfig,
    pub checkout: CheckoutConfig,
}

/// Where the published folder tree lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Entry id of the folder holding the published books. The empty id is
    /// the store root.
    pub root_folder: String,
}
impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            root_folder: String::new(),
        }
    }
}

/// Backend selection for the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreBackend {
    /// A directory on the local filesystem (or a synced copy of the drive).
    Local { root: PathBuf },
    /// An S3-compatible bucket. Credentials belong in the environment, not
    /// the file.
    S3 {
        bucket: String,
        region: String,
        #[serde(default)]
        prefix: Option<String>,
        #[serde(default)]
        endpoint: Option<String>,
        #[serde(default)]
        key_id: Option<String>,
        #[serde(default)]
        key_secret: Option<String>,
    },
}
impl Default for StoreBackend {
    fn default() -> Self {
        Self::Local { root: default_store_root() }
    }
}

fn default_store_root() -> PathBuf {
    directories::ProjectDirs::from("", "", "bookstall")
        .map(|dirs| dirs.data_dir().join("published"))
        .unwrap_or_else(|| PathBuf::from("/var/lib/bookstall/published"))
}

/// Catalog construction and presentation knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Case-insensitive trailing marker identifying sellable documents.
    pub document_suffix: String,
    /// Books per storefront page.
    pub page_size: usize,
    /// How long an index snapshot is served before re-indexing.
    pub cache_ttl_secs: u64,
    /// Storefront-wide price, in minor currency units.
    pub price_minor: u64,
    /// Category label stamped on live-indexed records.
    pub category: String,
    /// Directory of a precomputed catalog (manifest + page files). When
    /// set, the storefront reads from it instead of indexing the store.
    pub catalog_dir: Option<PathBuf>,
}
impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            document_suffix: ".docx".to_string(),
            page_size: 40,
            cache_ttl_secs: 3600,
            price_minor: 499,
            category: "General".to_string(),
            catalog_dir: None,
        }
    }
}

/// Hosted checkout handoff settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Where the provider redirects after a completed purchase.
    pub success_url: String,
    /// Where the provider redirects on an abandoned checkout.
    pub cancel_url: String,
    /// ISO 4217 currency code, lower-case.
    pub currency: String,
    /// Provider secret. Expected from the environment
    /// (`BOOKSTALL_CHECKOUT__SECRET_KEY`), never from the file.
    pub secret_key: Option<String>,
}
impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            success_url: "http://localhost:8080/thanks".to_string(),
            cancel_url: "http://localhost:8080/".to_string(),
            currency: "usd".to_string(),
            secret_key: None,
        }
    }
}

impl Config {
    /// Load configuration from all layers.
    ///
    /// An explicit `file` must exist; without one, the platform config file
    /// (`…/bookstall/config.toml`) is merged only if present. Environment
    /// variables win over both: `BOOKSTALL_CATALOG__PAGE_SIZE=20` overrides
    /// `[catalog] page_size`.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        figment = match file {
            Some(path) => figment.merge(Toml::file_exact(path)),
            None => match Self::default_file() {
                Some(path) => figment.merge(Toml::file(path)),
                None => figment,
            },
        };
        let config: Config = figment.merge(Env::prefixed("BOOKSTALL_").split("__")).extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        tracing::debug!(page_size = config.catalog.page_size, "configuration loaded");
        Ok(config)
    }

    fn default_file() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "bookstall").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Reject values no component can work with. Field names in messages
    /// use the file notation (`section.key`).
    pub fn validate(&self) -> Result<()> {
        if self.catalog.document_suffix.is_empty() {
            exn::bail!(ErrorKind::Invalid("catalog.document_suffix must not be empty".to_string()));
        }
        if self.catalog.page_size == 0 {
            exn::bail!(ErrorKind::Invalid("catalog.page_size must be at least 1".to_string()));
        }
        if self.catalog.cache_ttl_secs == 0 {
            exn::bail!(ErrorKind::Invalid("catalog.cache_ttl_secs must be at least 1".to_string()));
        }
        if let StoreBackend::S3 { bucket, region, .. } = &self.store.backend {
            if bucket.is_empty() {
                exn::bail!(ErrorKind::Invalid("store.backend.bucket must not be empty".to_string()));
            }
            if region.is_empty() {
                exn::bail!(ErrorKind::Invalid("store.backend.region must not be empty".to_string()));
            }
        }
        Ok(())
    }

    /// The catalog TTL as a [`Duration`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.catalog.document_suffix, ".docx");
        assert_eq!(config.catalog.page_size, 40);
        assert_eq!(config.catalog.price_minor, 499);
        assert_eq!(config.cache_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn file_layer_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
                [catalog]
                page_size = 12
                category = "Fiction"

                [store.backend]
                kind = "local"
                root = "/srv/books"
            "#,
        )
        .unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.catalog.page_size, 12);
        assert_eq!(config.catalog.category, "Fiction");
        // Untouched keys keep their defaults.
        assert_eq!(config.catalog.document_suffix, ".docx");
        match &config.store.backend {
            StoreBackend::Local { root } => assert_eq!(root, &PathBuf::from("/srv/books")),
            other => panic!("expected local backend, got {other:?}"),
        }
    }

    #[test]
    fn explicit_file_must_exist() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Load));
    }

    #[test]
    fn rejects_zero_page_size() {
        let mut config = Config::default();
        config.catalog.page_size = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(message) if message.contains("page_size")));
    }

    #[test]
    fn rejects_empty_suffix_and_ttl() {
        let mut config = Config::default();
        config.catalog.document_suffix.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.catalog.cache_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_incomplete_s3_backend() {
        let mut config = Config::default();
        config.store.backend = StoreBackend::S3 {
            bucket: String::new(),
            region: "us-east-1".to_string(),
            prefix: None,
            endpoint: None,
            key_id: None,
            key_secret: None,
        };
        assert!(config.validate().is_err());
    }
}
