//! Hub port — the raw long-poll status request.
//!
//! The transport performs exactly one request per call and decodes the body.
//! Carrying the [`PollToken`] between calls is the job of
//! [`StatusPoller`](crate::services::status_poller::StatusPoller).

use std::future::Future;

use verasync_domain::error::SyncError;
use verasync_domain::poll::{PollParams, PollToken, StatusReport};

/// One-shot access to the hub's status endpoint.
pub trait StatusTransport {
    /// Ask the hub for everything that changed since `token`.
    ///
    /// Fails with [`SyncError::Transport`] when the connection cannot be
    /// established or is dropped, and with [`SyncError::Protocol`] when the
    /// body is not a valid status document.
    fn fetch_status(
        &self,
        token: PollToken,
        params: PollParams,
    ) -> impl Future<Output = Result<StatusReport, SyncError>> + Send;
}
