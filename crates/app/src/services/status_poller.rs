//! Status poller — one long-poll request at a time, carrying the hub's cursor.

use std::time::Duration;

use verasync_domain::error::SyncError;
use verasync_domain::poll::{PollParams, PollToken, StatusReport};

use crate::ports::StatusTransport;

/// Extra time granted on top of the hub's own timeout before a request is
/// considered hung.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(5);

/// Issues status polls and keeps the [`PollToken`] of the latest response.
pub struct StatusPoller<T> {
    transport: T,
    token: PollToken,
    grace: Duration,
}

impl<T: StatusTransport> StatusPoller<T> {
    /// Create a poller starting from the baseline token.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            token: PollToken::baseline(),
            grace: DEFAULT_GRACE,
        }
    }

    #[must_use]
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Token sent with the next request.
    #[must_use]
    pub fn token(&self) -> PollToken {
        self.token
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Throwaway request that only refreshes the token.
    ///
    /// # Errors
    ///
    /// Same as [`StatusPoller::poll`].
    pub async fn prime(&mut self) -> Result<(), SyncError> {
        self.poll(PollParams::BASELINE).await.map(|report| {
            tracing::debug!(
                data_version = report.token.data_version,
                load_time = report.token.load_time,
                "primed poll token"
            );
        })
    }

    /// Send one long-poll request and remember the returned token.
    ///
    /// The request is abandoned once `max(timeout, min_delay) + grace` has
    /// elapsed.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transport`] when the request fails or exceeds the
    /// deadline, and [`SyncError::Protocol`] when the body cannot be decoded.
    /// The token is left unchanged on error.
    pub async fn poll(&mut self, params: PollParams) -> Result<StatusReport, SyncError> {
        let deadline = params.timeout.max(params.min_delay).saturating_add(self.grace);
        let report = tokio::time::timeout(
            deadline,
            self.transport.fetch_status(self.token, params),
        )
        .await
        .map_err(|elapsed| SyncError::Transport(Box::new(elapsed)))??;
        tracing::trace!(
            data_version = report.token.data_version,
            load_time = report.token.load_time,
            "received status report"
        );
        self.token = report.token;
        Ok(report)
    }
}
