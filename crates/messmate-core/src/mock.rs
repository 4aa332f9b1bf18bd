//! Test doubles: a scriptable dataset fetcher and a frame recorder.
//!
//! Lives in the crate proper so integration tests and downstream consumers
//! can drive the navigator without a network or a terminal.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::fetch::{DatasetFetcher, FetchError};
use crate::nav::RenderSink;
use crate::record::DatasetKind;
use crate::view::Frame;

// ---------------------------------------------------------------------------
// MockDatasetFetcher
// ---------------------------------------------------------------------------

/// Fetcher that serves scripted payloads per dataset kind, in order.
///
/// Every call is recorded. An exhausted (or never scripted) kind fails
/// with a transport error, which is also the easiest way to simulate an
/// unreachable endpoint.
#[derive(Debug, Default)]
pub struct MockDatasetFetcher {
    responses: Mutex<HashMap<DatasetKind, VecDeque<Result<serde_json::Value, FetchError>>>>,
    calls: Mutex<Vec<DatasetKind>>,
    delay: Option<Duration>,
}

impl MockDatasetFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful payload for `kind`.
    #[must_use]
    pub fn with_response(self, kind: DatasetKind, payload: serde_json::Value) -> Self {
        self.responses_guard()
            .entry(kind)
            .or_default()
            .push_back(Ok(payload));
        self
    }

    /// Queue a failure for `kind`.
    #[must_use]
    pub fn with_error(self, kind: DatasetKind, error: FetchError) -> Self {
        self.responses_guard()
            .entry(kind)
            .or_default()
            .push_back(Err(error));
        self
    }

    /// Delay every fetch, for exercising in-flight overlap.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Kinds fetched so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<DatasetKind> {
        self.calls_guard().clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls_guard().len()
    }

    fn responses_guard(
        &self,
    ) -> MutexGuard<'_, HashMap<DatasetKind, VecDeque<Result<serde_json::Value, FetchError>>>>
    {
        match self.responses.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn calls_guard(&self) -> MutexGuard<'_, Vec<DatasetKind>> {
        match self.calls.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl DatasetFetcher for MockDatasetFetcher {
    async fn fetch(&self, kind: DatasetKind) -> Result<serde_json::Value, FetchError> {
        self.calls_guard().push(kind);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.responses_guard().entry(kind).or_default().pop_front();
        match next {
            Some(result) => result,
            None => Err(FetchError::Transport {
                kind,
                message: "no scripted response".to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingSink
// ---------------------------------------------------------------------------

/// Render sink that keeps every frame it is handed.
#[derive(Debug, Default)]
pub struct RecordingSink {
    frames: Mutex<Vec<Frame>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every rendered frame, oldest first.
    #[must_use]
    pub fn frames(&self) -> Vec<Frame> {
        self.frames_guard().clone()
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames_guard().len()
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<Frame> {
        self.frames_guard().last().cloned()
    }

    pub fn clear(&self) {
        self.frames_guard().clear();
    }

    fn frames_guard(&self) -> MutexGuard<'_, Vec<Frame>> {
        match self.frames.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl RenderSink for RecordingSink {
    fn render(&self, frame: &Frame) {
        self.frames_guard().push(frame.clone());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
