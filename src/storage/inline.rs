use axum::async_trait;
use bytes::Bytes;

use super::{ImageRef, ImageStore};

/// Database strategy: the bytes themselves are the reference and end up in
/// the product row's `image_data` column. Nothing to write or clean up here.
pub struct InlineStore;

#[async_trait]
impl ImageStore for InlineStore {
    async fn store(&self, body: Bytes, _original_filename: &str) -> anyhow::Result<ImageRef> {
        Ok(ImageRef::Inline(body))
    }

    async fn delete(&self, _reference: &ImageRef) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_returns_the_exact_bytes() {
        let body = Bytes::from_static(b"\xff\xd8\xff jpeg-ish");
        let reference = InlineStore
            .store(body.clone(), "pic.jpg")
            .await
            .expect("store");
        assert_eq!(reference, ImageRef::Inline(body));
    }

    #[tokio::test]
    async fn delete_is_a_noop() {
        InlineStore
            .delete(&ImageRef::Inline(Bytes::from_static(b"x")))
            .await
            .expect("noop delete");
    }
}
