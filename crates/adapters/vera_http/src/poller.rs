//! Long-poll transport: one `id=lu_status` request per call.

use std::time::Duration;

use url::Url;
use verasync_app::ports::StatusTransport;
use verasync_domain::error::SyncError;
use verasync_domain::poll::{PollParams, PollToken, StatusReport};

use crate::client::VeraClient;
use crate::error::VeraHttpError;
use crate::wire::StatusBody;

impl VeraClient {
    /// Status URL in the exact shape the hub's `lu_status` handler expects.
    pub(crate) fn status_url(
        &self,
        token: PollToken,
        params: PollParams,
        nonce: f64,
    ) -> Result<Url, VeraHttpError> {
        let path = format!(
            "data_request?id=lu_status&DataVersion={}&MinimumDelay={}&Timeout={}&LoadTime={}&rand={nonce:.6}",
            token.data_version,
            params.min_delay_ms(),
            params.timeout_secs(),
            token.load_time,
        );
        Ok(self.base_url().join(&path)?)
    }

    /// Fetch changes since `token`, holding the request open for up to
    /// `params.timeout` on the hub side.
    ///
    /// # Errors
    ///
    /// Request failures and timeouts map to [`VeraHttpError::Request`];
    /// bodies without a token map to [`VeraHttpError::MissingField`].
    pub async fn poll_status(
        &self,
        token: PollToken,
        params: PollParams,
    ) -> Result<StatusReport, VeraHttpError> {
        let url = self.status_url(token, params, rand::random::<f64>())?;
        let timeout = request_deadline(params, self.request_timeout());
        let body: StatusBody = self.get_json(url, timeout).await?;
        body.into_report()
    }
}

/// How long reqwest may wait for one long-poll answer.
fn request_deadline(params: PollParams, request_timeout: Duration) -> Duration {
    params
        .timeout
        .max(params.min_delay)
        .saturating_add(request_timeout)
}

impl StatusTransport for VeraClient {
    async fn fetch_status(
        &self,
        token: PollToken,
        params: PollParams,
    ) -> Result<StatusReport, SyncError> {
        Ok(self.poll_status(token, params).await?)
    }
}
