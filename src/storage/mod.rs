use axum::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use time::OffsetDateTime;

use crate::config::StorageConfig;

mod inline;
mod local;
mod s3;

pub use inline::InlineStore;
pub use local::LocalDiskStore;
pub use s3::S3Store;

/// Reference to a stored product image. URL references resolve at the web
/// boundary (static dir or the bucket's public URL); inline references carry
/// the bytes and live in the owning row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    Url(String),
    Inline(Bytes),
}

impl ImageRef {
    /// Split into the (image_url, image_data) column pair.
    pub fn into_columns(self) -> (Option<String>, Option<Vec<u8>>) {
        match self {
            ImageRef::Url(u) => (Some(u), None),
            ImageRef::Inline(b) => (None, Some(b.to_vec())),
        }
    }
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist the bytes and return a reference usable to retrieve the image
    /// later. Must not touch the database.
    async fn store(&self, body: Bytes, original_filename: &str) -> anyhow::Result<ImageRef>;

    /// Remove whatever `store` produced. Used for compensating deletes and
    /// replacement cleanup; a no-op for inline references.
    async fn delete(&self, reference: &ImageRef) -> anyhow::Result<()>;
}

/// Build the store selected by configuration. Called once at startup.
pub async fn from_config(config: &StorageConfig) -> anyhow::Result<Arc<dyn ImageStore>> {
    Ok(match config {
        StorageConfig::Local { dir, public_path } => {
            Arc::new(LocalDiskStore::new(dir, public_path).await?)
        }
        StorageConfig::S3 {
            endpoint,
            bucket,
            access_key,
            secret_key,
            public_base,
        } => Arc::new(
            S3Store::new(endpoint, bucket, access_key, secret_key, public_base, "us-east-1")
                .await?,
        ),
        StorageConfig::Database => Arc::new(InlineStore),
    })
}

/// Millisecond-timestamp prefix keeps names unique under single-writer load;
/// no uniqueness check beyond that.
pub(crate) fn generate_name(original_filename: &str) -> String {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    format!("{}-{}", millis, sanitize_filename(original_filename))
}

fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".into()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_name_has_timestamp_prefix() {
        let name = generate_name("photo.png");
        let (prefix, rest) = name.split_once('-').expect("prefix-name");
        assert!(prefix.parse::<i128>().is_ok());
        assert_eq!(rest, "photo.png");
    }

    #[test]
    fn sanitize_strips_path_components_and_odd_chars() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn image_ref_splits_into_columns() {
        let (url, data) = ImageRef::Url("/uploads/a.png".into()).into_columns();
        assert_eq!(url.as_deref(), Some("/uploads/a.png"));
        assert!(data.is_none());

        let (url, data) = ImageRef::Inline(Bytes::from_static(b"abc")).into_columns();
        assert!(url.is_none());
        assert_eq!(data.as_deref(), Some(&b"abc"[..]));
    }
}
