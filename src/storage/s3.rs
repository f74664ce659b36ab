use anyhow::Context;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use axum::async_trait;
use bytes::Bytes;

use super::{generate_name, ImageRef, ImageStore};

/// Uploads to an S3-compatible bucket. References are deterministic public
/// URLs: `<public_base>/<key>`.
pub struct S3Store {
    client: Client,
    bucket: String,
    public_base: String,
}

impl S3Store {
    pub async fn new(
        endpoint: &str,
        bucket: &str,
        access_key: &str,
        secret_key: &str,
        public_base: &str,
        region: &str,
    ) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(Credentials::new(
                access_key, secret_key, None, None, "static",
            ))
            .endpoint_url(endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: bucket.to_string(),
            public_base: public_base.trim_end_matches('/').to_string(),
        })
    }

    fn key_for_reference(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.public_base)
            .map(|k| k.trim_start_matches('/').to_string())
            .filter(|k| !k.is_empty())
    }
}

#[async_trait]
impl ImageStore for S3Store {
    async fn store(&self, body: Bytes, original_filename: &str) -> anyhow::Result<ImageRef> {
        let key = generate_name(original_filename);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .send()
            .await
            .context("s3 put_object")?;
        Ok(ImageRef::Url(format!("{}/{}", self.public_base, key)))
    }

    async fn delete(&self, reference: &ImageRef) -> anyhow::Result<()> {
        let ImageRef::Url(url) = reference else {
            return Ok(());
        };
        let Some(key) = self.key_for_reference(url) else {
            return Ok(());
        };
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .context("s3 delete_object")?;
        Ok(())
    }
}
