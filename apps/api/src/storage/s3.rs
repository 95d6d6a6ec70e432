use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::{debug, info};

use super::{object_key, Result, StorageError, StorageGateway};

/// S3-compatible gateway (AWS S3 in production, MinIO locally).
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    /// Constructs a client for the given endpoint with static credentials.
    pub async fn connect(
        endpoint: &str,
        region: &str,
        bucket: &str,
        access_key_id: &str,
        secret_access_key: &str,
    ) -> Self {
        let credentials = Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "screener-static",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .load()
            .await;

        // MinIO only serves path-style addressing.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(s3_config),
            bucket: bucket.to_string(),
        }
    }

    /// Creates the bucket unless it already exists.
    pub async fn ensure_bucket(&self, region: &str) -> Result<()> {
        if self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok()
        {
            return Ok(());
        }

        let mut create = self.client.create_bucket().bucket(&self.bucket);
        // us-east-1 rejects an explicit location constraint.
        if region != "us-east-1" {
            create = create.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }

        match create.send().await {
            Ok(_) => {
                info!("Created bucket {}", self.bucket);
                Ok(())
            }
            Err(err)
                if err
                    .as_service_error()
                    .map(|se| se.is_bucket_already_exists() || se.is_bucket_already_owned_by_you())
                    == Some(true) =>
            {
                Ok(())
            }
            Err(err) => Err(StorageError::Backend(format!(
                "create bucket {} failed: {err}",
                self.bucket
            ))),
        }
    }
}

#[async_trait]
impl StorageGateway for S3Storage {
    async fn upload(&self, bytes: Bytes, name: &str, folder: &str) -> Result<String> {
        let key = object_key(folder, name)?;
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type("application/pdf")
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("S3 upload failed: {e}")))?;

        debug!("Uploaded {size} bytes to s3://{}/{}", self.bucket, key);
        Ok(key)
    }

    async fn fetch(&self, external_id: &str) -> Result<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(external_id)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().map(|se| se.is_no_such_key()) == Some(true) {
                    StorageError::NotFound(external_id.to_string())
                } else {
                    StorageError::Backend(format!("S3 fetch failed: {e}"))
                }
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("S3 body read failed: {e}")))?;
        Ok(data.into_bytes())
    }

    async fn delete(&self, external_id: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(external_id)
            .send()
            .await
            .map_err(|e| StorageError::Backend(format!("S3 delete failed: {e}")))?;
        debug!("Deleted s3://{}/{}", self.bucket, external_id);
        Ok(())
    }
}
