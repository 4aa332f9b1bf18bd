//! Fetching remote datasets: the failure taxonomy and the fetcher seam.

use async_trait::async_trait;

use crate::record::DatasetKind;

// ---------------------------------------------------------------------------
// FetchError
// ---------------------------------------------------------------------------

/// Why a dataset fetch produced no usable records.
///
/// None of these are fatal to callers. The cache absorbs every variant and
/// serves an empty dataset instead.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request never completed (DNS, connect, timeout, ...).
    #[error("request for {kind} dataset failed: {message}")]
    Transport { kind: DatasetKind, message: String },

    /// The endpoint answered with a non-success HTTP status.
    #[error("{kind} dataset endpoint returned HTTP {status}")]
    Status { kind: DatasetKind, status: u16 },

    /// The response body could not be read as JSON.
    #[error("{kind} dataset response was not valid JSON: {message}")]
    Body { kind: DatasetKind, message: String },

    /// The endpoint answered with its in-band error field set.
    #[error("{kind} dataset endpoint reported an error: {message}")]
    Endpoint { kind: DatasetKind, message: String },

    /// The payload parsed but was not the expected array of records.
    #[error("{kind} dataset payload had an unexpected shape: {message}")]
    Shape { kind: DatasetKind, message: String },
}

// ---------------------------------------------------------------------------
// DatasetFetcher
// ---------------------------------------------------------------------------

/// Source of raw dataset payloads.
///
/// Implementations return the decoded JSON body as-is; validating that it
/// is an array of records is the cache's job.
#[async_trait]
pub trait DatasetFetcher: Send + Sync {
    async fn fetch(&self, kind: DatasetKind) -> Result<serde_json::Value, FetchError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
