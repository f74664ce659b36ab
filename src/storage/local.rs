use anyhow::Context;
use axum::async_trait;
use bytes::Bytes;
use std::path::PathBuf;

use super::{generate_name, ImageRef, ImageStore};

/// Writes uploads under a local directory served as static files. The
/// reference is the public path of the written file.
pub struct LocalDiskStore {
    dir: PathBuf,
    public_path: String,
}

impl LocalDiskStore {
    pub async fn new(dir: &str, public_path: &str) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("create uploads dir {}", dir))?;
        Ok(Self {
            dir: PathBuf::from(dir),
            public_path: public_path.trim_end_matches('/').to_string(),
        })
    }

    fn file_for_reference(&self, reference: &str) -> Option<PathBuf> {
        let name = reference.strip_prefix(&self.public_path)?.trim_start_matches('/');
        // references are always flat names under the uploads dir
        if name.is_empty() || name.contains('/') {
            return None;
        }
        Some(self.dir.join(name))
    }
}

#[async_trait]
impl ImageStore for LocalDiskStore {
    async fn store(&self, body: Bytes, original_filename: &str) -> anyhow::Result<ImageRef> {
        let name = generate_name(original_filename);
        let path = self.dir.join(&name);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write upload {}", path.display()))?;
        Ok(ImageRef::Url(format!("{}/{}", self.public_path, name)))
    }

    async fn delete(&self, reference: &ImageRef) -> anyhow::Result<()> {
        let ImageRef::Url(url) = reference else {
            return Ok(());
        };
        let Some(path) = self.file_for_reference(url) else {
            // reference written by another strategy or edited by hand
            return Ok(());
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove upload {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> (LocalDiskStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("catalog-api-test-{}", uuid::Uuid::new_v4()));
        let store = LocalDiskStore::new(dir.to_str().unwrap(), "/uploads")
            .await
            .expect("create store");
        (store, dir)
    }

    #[tokio::test]
    async fn store_writes_file_and_reference_resolves_to_same_bytes() {
        let (store, dir) = temp_store().await;
        let body = Bytes::from_static(b"\x89PNG fake image bytes");

        let reference = store.store(body.clone(), "logo.png").await.expect("store");
        let ImageRef::Url(url) = &reference else {
            panic!("local store must return a url reference");
        };
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("logo.png"));

        let name = url.strip_prefix("/uploads/").unwrap();
        let on_disk = tokio::fs::read(dir.join(name)).await.expect("read back");
        assert_eq!(on_disk, body.to_vec());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn delete_removes_the_file_and_is_idempotent() {
        let (store, dir) = temp_store().await;
        let reference = store
            .store(Bytes::from_static(b"bytes"), "a.jpg")
            .await
            .expect("store");

        store.delete(&reference).await.expect("delete");
        let ImageRef::Url(url) = &reference else { unreachable!() };
        let name = url.strip_prefix("/uploads/").unwrap();
        assert!(!dir.join(name).exists());

        // second delete is a no-op
        store.delete(&reference).await.expect("delete again");

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn delete_ignores_foreign_references() {
        let (store, dir) = temp_store().await;
        store
            .delete(&ImageRef::Url("https://bucket.example/key.png".into()))
            .await
            .expect("foreign url ignored");
        store
            .delete(&ImageRef::Inline(Bytes::from_static(b"x")))
            .await
            .expect("inline ignored");
        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
