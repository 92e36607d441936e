//! Sync loop — keeps polling the hub, switching between a connected and a
//! disconnected profile as the link comes and goes.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use verasync_domain::event::ChangeEvent;
use verasync_domain::poll::PollParams;

use crate::ports::{DeviceDirectory, EventSink, StatusTransport};
use crate::services::change_detector::{ChangeDetector, DeviceObserver, NoopObserver};
use crate::services::device_cache::DeviceCache;
use crate::services::dispatcher::Dispatcher;
use crate::services::status_poller::StatusPoller;

/// Request parameters for one link state, plus the local wait before each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollProfile {
    pub params: PollParams,
    pub pause: Duration,
}

impl PollProfile {
    #[must_use]
    pub const fn new(min_delay: Duration, timeout: Duration, pause: Duration) -> Self {
        Self {
            params: PollParams::new(min_delay, timeout),
            pause,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    pub connected: PollProfile,
    pub disconnected: PollProfile,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            connected: PollProfile::new(
                Duration::from_millis(500),
                Duration::from_secs(10),
                Duration::ZERO,
            ),
            disconnected: PollProfile::new(
                Duration::from_millis(10_000),
                Duration::from_secs(15),
                Duration::from_secs(1),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connected,
    Disconnected,
}

/// What a single iteration of the loop did.
#[derive(Debug, PartialEq)]
pub enum StepOutcome {
    /// The report was fed to the change detector.
    Processed(Vec<ChangeEvent>),
    /// First answer after an outage; the payload was dropped.
    Resynchronized,
    /// The poll failed.
    Failed,
}

/// Long-running synchronization between the hub and the device cache.
pub struct SyncLoop<T, D, S, O = NoopObserver> {
    poller: StatusPoller<T>,
    cache: DeviceCache<D>,
    detector: ChangeDetector<O>,
    dispatcher: Dispatcher<S>,
    config: LoopConfig,
    link: LinkState,
}

impl<T, D, S> SyncLoop<T, D, S>
where
    T: StatusTransport,
    D: DeviceDirectory,
    S: EventSink,
{
    pub fn new(poller: StatusPoller<T>, cache: DeviceCache<D>, dispatcher: Dispatcher<S>) -> Self {
        Self {
            poller,
            cache,
            detector: ChangeDetector::new(),
            dispatcher,
            config: LoopConfig::default(),
            link: LinkState::Connected,
        }
    }
}

impl<T, D, S, O> SyncLoop<T, D, S, O>
where
    T: StatusTransport,
    D: DeviceDirectory,
    S: EventSink,
    O: DeviceObserver,
{
    #[must_use]
    pub fn with_config(mut self, config: LoopConfig) -> Self {
        self.config = config;
        self
    }

    /// Install an observer called for every non-empty delta.
    pub fn with_observer<P: DeviceObserver>(self, observer: P) -> SyncLoop<T, D, S, P> {
        SyncLoop {
            poller: self.poller,
            cache: self.cache,
            detector: self.detector.with_observer(observer),
            dispatcher: self.dispatcher,
            config: self.config,
            link: self.link,
        }
    }

    #[must_use]
    pub fn link(&self) -> LinkState {
        self.link
    }

    pub fn cache(&self) -> &DeviceCache<D> {
        &self.cache
    }

    pub fn poller(&self) -> &StatusPoller<T> {
        &self.poller
    }

    fn profile(&self) -> PollProfile {
        match self.link {
            LinkState::Connected => self.config.connected,
            LinkState::Disconnected => self.config.disconnected,
        }
    }

    /// Fetch the initial token. The loop starts disconnected if that fails.
    pub async fn start(&mut self) -> LinkState {
        self.link = match self.poller.prime().await {
            Ok(()) => LinkState::Connected,
            Err(err) => {
                tracing::warn!(error = %err, "unable to prime poll token, starting disconnected");
                LinkState::Disconnected
            }
        };
        self.link
    }

    /// Run one poll with the current profile, without the local pause.
    pub async fn step(&mut self) -> StepOutcome {
        let profile = self.profile();
        let report = match self.poller.poll(profile.params).await {
            Ok(report) => report,
            Err(err) => {
                match self.link {
                    LinkState::Connected => {
                        if err.is_link_failure() {
                            tracing::error!(error = %err, "status poll failed");
                        } else {
                            tracing::error!(error = ?err, "unexpected status poll failure");
                        }
                        tracing::warn!("switching to disconnected mode");
                        self.link = LinkState::Disconnected;
                    }
                    LinkState::Disconnected => {
                        tracing::warn!(error = %err, "hub still unreachable");
                    }
                }
                return StepOutcome::Failed;
            }
        };

        if self.link == LinkState::Disconnected {
            tracing::warn!(
                data_version = report.token.data_version,
                "hub reachable again, dropping first report"
            );
            self.link = LinkState::Connected;
            return StepOutcome::Resynchronized;
        }

        let events = match report.devices.as_deref() {
            Some(deltas) => {
                self.detector
                    .detect(&mut self.cache, &self.dispatcher, deltas)
                    .await
            }
            None => Vec::new(),
        };
        if let Some(tasks) = report.tasks {
            tracing::info!(%tasks, "hub reported tasks");
        }
        StepOutcome::Processed(events)
    }

    /// Poll until `cancel` fires, then hand the loop back.
    ///
    /// Cancellation is observed between requests and during the disconnected
    /// pause, never while a request is in flight.
    pub async fn run(mut self, cancel: CancellationToken) -> Self {
        let link = self.start().await;
        tracing::info!(?link, "sync loop started");
        while !cancel.is_cancelled() {
            let pause = self.profile().pause;
            if !pause.is_zero() {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(pause) => {}
                }
            }
            self.step().await;
        }
        tracing::info!("sync loop stopped");
        self
    }
}
