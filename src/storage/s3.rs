//! S3-backed object store.

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::{ObjectStore, PutOutcome, StoreError};

/// Returned when the object already existed at write time.
const PRECONDITION_FAILED: u16 = 412;
/// Returned when a concurrent conditional write to the same key is in flight.
const CONDITIONAL_REQUEST_CONFLICT: u16 = 409;

/// Object store backed by an S3 client.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS credential and region chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config))
    }
}

fn backend_error<E: std::error::Error>(err: E) -> StoreError {
    StoreError::Backend(DisplayErrorContext(&err).to_string())
}

/// Map a failed `GetObject`; a missing key is the only `NotFound`.
fn get_error<R>(err: SdkError<GetObjectError, R>, bucket: &str, key: &str) -> StoreError
where
    R: std::fmt::Debug,
{
    if err.as_service_error().is_some_and(GetObjectError::is_no_such_key) {
        StoreError::not_found(bucket, key)
    } else {
        backend_error(err)
    }
}

/// Whether a failed `If-None-Match: *` write lost to another writer.
fn lost_conditional_put(status: u16) -> bool {
    matches!(status, PRECONDITION_FAILED | CONDITIONAL_REQUEST_CONFLICT)
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        tracing::debug!(bucket, key, "Fetching object");
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| get_error(err, bucket, key))?;

        let body = output.body.collect().await.map_err(backend_error)?;
        Ok(body.into_bytes().to_vec())
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn put_if_absent(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
    ) -> Result<PutOutcome, StoreError> {
        let result = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .if_none_match("*")
            .body(ByteStream::from(body))
            .send()
            .await;

        match result {
            Ok(_) => Ok(PutOutcome::Created),
            Err(err)
                if err
                    .raw_response()
                    .is_some_and(|r| lost_conditional_put(r.status().as_u16())) =>
            {
                tracing::debug!(bucket, key, "Object already written by another writer");
                Ok(PutOutcome::AlreadyExists)
            }
            Err(err) => Err(backend_error(err)),
        }
    }
}
