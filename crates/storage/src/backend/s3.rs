//! S3-compatible store backend.
//!
//! S3 has no real folders, so the hierarchy is emulated the way every
//! S3-aware tool does it: a folder id is a key prefix, a delimiter listing's
//! common prefixes are the child folders, and its objects are the child
//! files. The service's native `NextContinuationToken` is passed through to
//! callers unchanged.
//!
//! # Credentials
//!
//! Credentials are provided explicitly via the configuration file. Works
//! against AWS S3 as well as Backblaze B2, Tigris, MinIO and other
//! S3-compatible services.

use crate::backend::FolderStore;
use crate::error::{ErrorKind, Result};
use crate::models::{ChildEntry, EntryId, FolderPage};
use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Credentials, Region, retry::RetryConfig},
};
use time::OffsetDateTime;

/// S3-compatible store backend.
///
/// Lists and reads objects in a bucket, optionally under a base key prefix.
/// All entry ids are relative to the configured prefix (if any).
///
/// # Examples
///
/// ```no_run
/// use bookstall_storage::backend::S3Backend;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = S3Backend::new(
///     "published",
///     "my-bucket",
///     Some("published/".to_string()),
///     "us-west-004",
///     Some("https://s3.us-west-004.backblazeb2.com".to_string()),
///     "access_key_id",
///     "secret_access_key",
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct S3Backend {
    name: String,
    client: Client,
    bucket: String,
    prefix: Option<String>,
}

impl S3Backend {
    /// Create a new S3 store backend.
    ///
    /// # Arguments
    /// * `name` - A name for this store (used in logging)
    /// * `bucket` - S3 bucket name
    /// * `prefix` - Optional base key prefix (acts as a virtual directory)
    /// * `region` - AWS region or provider-specific region
    /// * `endpoint` - Custom endpoint URL for S3-compatible services
    /// * `key_id` - AWS/provider access key ID
    /// * `key_secret` - AWS/provider secret access key
    pub fn new(
        name: impl Into<String>,
        bucket: impl Into<String>,
        prefix: Option<String>,
        region: impl Into<String>,
        endpoint: Option<impl Into<String>>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
    ) -> Result<Self> {
        let credentials = Credentials::new(key_id, key_secret, None, None, "bookstall-config");
        let mut config_builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(region.into()))
            // Exponential backoff: 1 initial attempt + 3 retries
            .retry_config(RetryConfig::standard().with_max_attempts(4))
            // Path-style addressing for compatibility with S3-compatible
            // services (Backblaze, MinIO, etc.)
            .force_path_style(true);
        if let Some(endpoint_url) = endpoint {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }
        Ok(Self {
            name: name.into(),
            client: Client::from_conf(config_builder.build()),
            bucket: bucket.into(),
            prefix: prefix.map(|p| p.trim_matches('/').to_string()).filter(|p| !p.is_empty()),
        })
    }

    /// Full object key for a file id.
    fn object_key(&self, file: &EntryId) -> Result<String> {
        if file.is_root() {
            exn::bail!(ErrorKind::InvalidPath(std::path::PathBuf::new()));
        }
        Ok(join_key(self.prefix.as_deref(), file.as_str()))
    }
}

/// Join a base prefix and a relative id into a full object key.
fn join_key(base: Option<&str>, id: &str) -> String {
    match base {
        Some(base) => format!("{}/{}", base, id.trim_start_matches('/')),
        None => id.trim_start_matches('/').to_string(),
    }
}

/// The listing prefix for a folder id: full key with exactly one trailing
/// slash, or empty for the bucket (or base-prefix) root.
fn listing_prefix(base: Option<&str>, folder: &EntryId) -> String {
    let mut key = String::new();
    if let Some(base) = base {
        key.push_str(base);
        key.push('/');
    }
    if !folder.is_root() {
        key.push_str(folder.as_str().trim_matches('/'));
        key.push('/');
    }
    key
}

/// Strip the configured base prefix from a full object key.
fn relative_id(base: Option<&str>, key: &str) -> EntryId {
    match base {
        Some(base) => EntryId::from(key.strip_prefix(base).and_then(|rest| rest.strip_prefix('/')).unwrap_or(key)),
        None => EntryId::from(key),
    }
}

/// Last path segment of a key, used as the entry's display name.
fn leaf_name(key: &str) -> &str {
    let trimmed = key.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

#[async_trait]
impl FolderStore for S3Backend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_folder(&self, folder: &EntryId, page_token: Option<&str>) -> Result<FolderPage> {
        let prefix = listing_prefix(self.prefix.as_deref(), folder);
        let mut request = self.client.list_objects_v2().bucket(&self.bucket).delimiter("/");
        if !prefix.is_empty() {
            request = request.prefix(&prefix);
        }
        if let Some(token) = page_token {
            request = request.continuation_token(token);
        }
        let output = request.send().await.map_err(|e| ErrorKind::Network(e.to_string()))?;

        let base = self.prefix.as_deref();
        let mut entries = Vec::new();
        for common in output.common_prefixes() {
            let Some(key) = common.prefix() else { continue };
            entries.push(ChildEntry::folder(leaf_name(key), relative_id(base, key.trim_end_matches('/'))));
        }
        for object in output.contents() {
            let Some(key) = object.key() else { continue };
            // Consoles create zero-byte placeholder objects for "folders";
            // a folder listing itself is not one of its own children.
            if key == prefix {
                continue;
            }
            let mut entry = ChildEntry::file(leaf_name(key), relative_id(base, key));
            if let Some(size) = object.size() {
                entry = entry.with_size(size.max(0) as u64);
            }
            if let Some(modified) = object.last_modified()
                && let Ok(timestamp) = OffsetDateTime::from_unix_timestamp_nanos(modified.as_nanos())
            {
                entry = entry.with_modified(timestamp);
            }
            entries.push(entry);
        }
        tracing::debug!(store = %self.name, folder = %folder, count = entries.len(), "listed S3 prefix");
        Ok(FolderPage {
            entries,
            next_token: output.next_continuation_token().map(str::to_string),
        })
    }

    async fn read(&self, file: &EntryId) -> Result<Vec<u8>> {
        let key = self.object_key(file)?;
        let output = self.client.get_object().bucket(&self.bucket).key(&key).send().await.map_err(|err| {
            let service = err.into_service_error();
            if service.is_no_such_key() {
                exn::Exn::from(ErrorKind::NotFound(file.clone()))
            } else {
                exn::Exn::from(ErrorKind::Network(service.to_string()))
            }
        })?;
        let data = output.body.collect().await.map_err(|e| ErrorKind::Network(e.to_string()))?;
        Ok(data.into_bytes().to_vec())
    }

    async fn read_head(&self, file: &EntryId, bytes: usize) -> Result<Vec<u8>> {
        if bytes == 0 {
            return Ok(Vec::new());
        }
        let key = self.object_key(file)?;
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .range(format!("bytes=0-{}", bytes - 1))
            .send()
            .await
            .map_err(|err| {
                let service = err.into_service_error();
                if service.is_no_such_key() {
                    exn::Exn::from(ErrorKind::NotFound(file.clone()))
                } else {
                    exn::Exn::from(ErrorKind::Network(service.to_string()))
                }
            })?;
        let data = output.body.collect().await.map_err(|e| ErrorKind::Network(e.to_string()))?;
        Ok(data.into_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_key_respects_base() {
        assert_eq!(join_key(None, "Shadow Run/book.docx"), "Shadow Run/book.docx");
        assert_eq!(join_key(Some("published"), "Shadow Run/book.docx"), "published/Shadow Run/book.docx");
    }

    #[test]
    fn listing_prefix_has_single_trailing_slash() {
        assert_eq!(listing_prefix(None, &EntryId::root()), "");
        assert_eq!(listing_prefix(Some("published"), &EntryId::root()), "published/");
        assert_eq!(listing_prefix(None, &EntryId::from("Shadow Run")), "Shadow Run/");
        assert_eq!(listing_prefix(Some("published"), &EntryId::from("Shadow Run/")), "published/Shadow Run/");
    }

    #[test]
    fn relative_id_strips_base() {
        assert_eq!(relative_id(None, "a/b.jpg"), EntryId::from("a/b.jpg"));
        assert_eq!(relative_id(Some("published"), "published/a/b.jpg"), EntryId::from("a/b.jpg"));
        // A key outside the base prefix passes through untouched.
        assert_eq!(relative_id(Some("published"), "other/b.jpg"), EntryId::from("other/b.jpg"));
    }

    #[test]
    fn leaf_name_takes_last_segment() {
        assert_eq!(leaf_name("published/Shadow Run/"), "Shadow Run");
        assert_eq!(leaf_name("published/Shadow Run/cover.jpg"), "cover.jpg");
        assert_eq!(leaf_name("cover.jpg"), "cover.jpg");
    }
}
