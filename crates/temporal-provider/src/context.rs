// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Caller-supplied cancellation and deadline for a single operation.

use std::future::Future;
use std::time::Duration;

use temporal_protocol::Status;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::error::{ProviderError, Result};

/// Cancellation scope passed into every resource operation.
///
/// Every remote call is raced against it. The search-attribute poll is the
/// only operation that also waits between calls.
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl OperationContext {
    /// No deadline, never cancelled unless [`cancel`](Self::cancel) is called.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolves once the deadline passes; never resolves without one.
    pub async fn deadline_elapsed(&self) {
        match self.deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    }

    /// Run one remote call, racing it against cancellation and the deadline.
    ///
    /// A failed call is classified with [`ProviderError::from_status`] under
    /// `operation`.
    pub async fn run<T, F>(&self, operation: &str, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, Status>>,
    {
        if self.is_cancelled() {
            return Err(ProviderError::Cancelled(operation.to_string()));
        }
        tokio::select! {
            biased;

            _ = self.cancel.cancelled() => Err(ProviderError::Cancelled(operation.to_string())),
            _ = self.deadline_elapsed() => Err(ProviderError::DeadlineExceeded(operation.to_string())),
            result = call => result.map_err(|status| ProviderError::from_status(operation, status)),
        }
    }
}
