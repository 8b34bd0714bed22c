//! Session secret provisioning.
//!
//! On a cold start the signing secret is read from the object store. If the
//! object is missing a fresh random token is generated and written back, so
//! every later cold start reads the same value.

use std::time::Duration;

use rand::RngCore;
use thiserror::Error;

use crate::storage::{ObjectStore, PutOutcome, StoreError};

/// Random bytes in a generated secret (hex-encoded to twice as many chars).
pub const SECRET_BYTES: usize = 32;

/// Reads of the winner's value after a lost conditional write.
const RACE_READ_ATTEMPTS: u32 = 5;
const RACE_READ_BACKOFF: Duration = Duration::from_millis(20);

/// Errors that abort secret provisioning.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("secret object {key} is not valid UTF-8")]
    InvalidEncoding { key: String },
}

/// How a freshly generated secret is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecretWriteMode {
    /// Plain write. Two racing cold starts both write; the last one wins.
    Overwrite,
    /// Conditional write. The loser of a race re-reads the winner's value.
    #[default]
    CreateIfAbsent,
}

/// Generate a random lowercase hex token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Get-or-create the secret stored at `bucket/key`.
///
/// Only [`StoreError::NotFound`] triggers creation; every other store error
/// is returned to the caller.
pub async fn ensure_secret(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    mode: SecretWriteMode,
) -> Result<String, SecretError> {
    tracing::debug!(bucket, key, "Checking for existing secret");

    match store.get(bucket, key).await {
        Ok(bytes) => return decode(bytes, key),
        Err(StoreError::NotFound { .. }) => {}
        Err(e) => return Err(e.into()),
    }

    let secret = generate_token();
    match mode {
        SecretWriteMode::Overwrite => {
            store.put(bucket, key, secret.clone().into_bytes()).await?;
        }
        SecretWriteMode::CreateIfAbsent => {
            let outcome = store
                .put_if_absent(bucket, key, secret.clone().into_bytes())
                .await?;
            if outcome == PutOutcome::AlreadyExists {
                tracing::info!(bucket, key, "Secret was created concurrently, using stored value");
                return read_winner(store, bucket, key, secret).await;
            }
        }
    }

    tracing::info!(bucket, key, "Created a new secret");
    Ok(secret)
}

/// Read the value written by the writer that won the race.
///
/// A conflicting write may still be in flight, so `NotFound` is retried.
/// If the value never shows up, ours is written unconditionally so startup
/// does not fail on the race.
async fn read_winner(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    secret: String,
) -> Result<String, SecretError> {
    for attempt in 1..=RACE_READ_ATTEMPTS {
        match store.get(bucket, key).await {
            Ok(bytes) => return decode(bytes, key),
            Err(StoreError::NotFound { .. }) => {
                tracing::debug!(bucket, key, attempt, "Winning secret not visible yet");
                tokio::time::sleep(RACE_READ_BACKOFF * attempt).await;
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::warn!(bucket, key, "Winning secret never appeared, writing ours");
    store.put(bucket, key, secret.clone().into_bytes()).await?;
    Ok(secret)
}

fn decode(bytes: Vec<u8>, key: &str) -> Result<String, SecretError> {
    String::from_utf8(bytes).map_err(|_| SecretError::InvalidEncoding {
        key: key.to_string(),
    })
}
