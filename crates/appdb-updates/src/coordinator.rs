//! Update check coordinator
//!
//! Runs the ticket/poll exchange with the update service, keeps the latest
//! result filtered against the ignore list and broadcasts every change.
//!
//! Each call to `check_updates` starts a new cycle and bumps the cycle epoch.
//! A cycle only mutates state while its epoch is current, so a check that is
//! overtaken by a newer one (or by `device_unlinked`) ends quietly with
//! `UpdatesError::Superseded` at its next suspend point.

use crate::error::UpdatesError;
use crate::event::UpdateEvent;
use crate::partition::ResultPartition;
use crate::state::CheckState;
use appdb_client::{
    DeviceLink, IgnoreEntry, IgnoreStore, PollTicket, UpdateCandidate, UpdateService,
};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Retry policy for one update check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSettings {
    /// "Not ready" answers tolerated before giving up; a check polls at most
    /// `timeout_limit + 1` times
    pub timeout_limit: u32,
    /// Wait between two polls
    pub retry_delay: Duration,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            timeout_limit: 60,
            retry_delay: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: CheckState,
    epoch: u64,
    retry_count: u32,
    /// Candidates of the latest successful poll, before ignore filtering
    candidates: Vec<UpdateCandidate>,
    partition: ResultPartition,
}

impl Inner {
    fn cleanup(&mut self) {
        self.retry_count = 0;
        self.candidates.clear();
        self.partition = ResultPartition::default();
    }
}

/// Coordinates update checks for the linked device
pub struct UpdateCheckCoordinator {
    service: Arc<dyn UpdateService>,
    ignore_store: Arc<dyn IgnoreStore>,
    link: Arc<dyn DeviceLink>,
    settings: CheckSettings,
    badge_preference: watch::Receiver<bool>,
    events: broadcast::Sender<UpdateEvent>,
    inner: Mutex<Inner>,
    badge_observer: Mutex<Option<JoinHandle<()>>>,
}

impl UpdateCheckCoordinator {
    /// Create a coordinator without a badge preference observer
    ///
    /// # Arguments
    ///
    /// * `service` - Update service to poll
    /// * `ignore_store` - Persisted ignore list
    /// * `link` - Device link precondition
    /// * `settings` - Retry policy
    /// * `badge_preference` - "Show badge for updates" preference
    pub fn new(
        service: Arc<dyn UpdateService>,
        ignore_store: Arc<dyn IgnoreStore>,
        link: Arc<dyn DeviceLink>,
        settings: CheckSettings,
        badge_preference: watch::Receiver<bool>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            service,
            ignore_store,
            link,
            settings,
            badge_preference,
            events,
            inner: Mutex::new(Inner::default()),
            badge_observer: Mutex::new(None),
        }
    }

    /// Create a coordinator and register its badge preference observer
    ///
    /// The observer emits `UpdateEvent::BadgeChanged` whenever the preference
    /// changes and is aborted when the coordinator is dropped. Must be called
    /// from within a tokio runtime.
    pub fn spawn(
        service: Arc<dyn UpdateService>,
        ignore_store: Arc<dyn IgnoreStore>,
        link: Arc<dyn DeviceLink>,
        settings: CheckSettings,
        badge_preference: watch::Receiver<bool>,
    ) -> Arc<Self> {
        let coordinator = Arc::new(Self::new(
            service,
            ignore_store,
            link,
            settings,
            badge_preference.clone(),
        ));

        let handle = tokio::spawn(observe_badge_preference(
            Arc::downgrade(&coordinator),
            badge_preference,
        ));
        *coordinator
            .badge_observer
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);

        coordinator
    }

    /// Subscribe to state change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<UpdateEvent> {
        self.events.subscribe()
    }

    pub fn settings(&self) -> CheckSettings {
        self.settings
    }

    pub fn state(&self) -> CheckState {
        self.inner().state.clone()
    }

    /// "Not ready" retries made by the running check; 0 once it ends
    pub fn retry_count(&self) -> u32 {
        self.inner().retry_count
    }

    /// Current ignore-filtered result
    pub fn partition(&self) -> ResultPartition {
        self.inner().partition.clone()
    }

    /// Number of pending updates, `None` when there are none
    pub fn badge_count(&self) -> Option<usize> {
        self.inner().partition.badge_count()
    }

    /// Badge to display: the badge count, unless the user turned the badge off
    pub fn displayed_badge(&self) -> Option<usize> {
        if *self.badge_preference.borrow() {
            self.badge_count()
        } else {
            None
        }
    }

    /// Run a full update check
    ///
    /// Requests a ticket, then polls it until the service answers with
    /// something other than "not ready", waiting `retry_delay` between polls
    /// and giving up after `timeout_limit` retries.
    ///
    /// # Returns
    ///
    /// The new ignore-filtered partition (possibly empty), or the reason the
    /// check failed.
    pub async fn check_updates(&self) -> Result<ResultPartition, UpdatesError> {
        let epoch = self.begin_cycle();

        if !self.link.is_linked() {
            info!("Update check skipped: device is not linked");
            return Err(self.fail(epoch, UpdatesError::NotLinked));
        }

        self.transition(epoch, CheckState::AwaitingTicket)?;
        let ticket = match self.service.request_ticket().await {
            Ok(ticket) => ticket,
            Err(e) => {
                warn!("Failed to get update ticket: {}", e);
                return Err(self.fail(epoch, UpdatesError::Connection(e.message().to_string())));
            }
        };
        debug!("Got update ticket {}", ticket);

        self.poll(epoch, &ticket).await
    }

    async fn poll(&self, epoch: u64, ticket: &PollTicket) -> Result<ResultPartition, UpdatesError> {
        let mut attempt = 0;
        loop {
            self.transition(epoch, CheckState::Polling { attempt })?;

            match self.service.poll_updates(ticket).await {
                Ok(candidates) => return self.succeed(epoch, candidates),
                Err(e) if e.is_not_ready() && attempt < self.settings.timeout_limit => {
                    debug!(
                        "Update status not ready ({}/{}), retrying in {:?}",
                        attempt + 1,
                        self.settings.timeout_limit,
                        self.settings.retry_delay
                    );
                    tokio::time::sleep(self.settings.retry_delay).await;
                    attempt += 1;
                }
                Err(e) if e.is_not_ready() => {
                    warn!("Update status still not ready after {} retries", attempt);
                    return Err(self.fail(epoch, UpdatesError::Timeout));
                }
                Err(e) => {
                    warn!("Failed to get update status: {}", e);
                    return Err(self.fail(epoch, UpdatesError::Other(e.message().to_string())));
                }
            }
        }
    }

    /// Re-filter the latest result against the ignore list
    ///
    /// Never polls. Calling it again without ignore list changes yields the
    /// same partition.
    pub fn apply_ignore_list_changed(&self) -> ResultPartition {
        let mut inner = self.inner();
        let partition = self.build_partition(&inner.candidates);
        inner.partition = partition;
        debug!("Re-filtered updates: {} visible", inner.partition.len());

        if inner.state == CheckState::Succeeded {
            self.emit(UpdateEvent::for_partition(&inner.partition));
        }
        inner.partition.clone()
    }

    /// Hide a visible update and remember the choice
    ///
    /// When this removes the last visible update, `UpdateEvent::NoUpdates` is
    /// emitted, the same as for a check that found nothing.
    pub fn ignore(&self, track_id: &str) -> Result<ResultPartition, UpdatesError> {
        let mut inner = self.inner();
        if inner.state.is_loading() {
            return Err(UpdatesError::CheckInProgress);
        }

        let candidate = inner
            .partition
            .find(track_id)
            .cloned()
            .ok_or_else(|| UpdatesError::NotVisible(track_id.to_string()))?;

        self.ignore_store
            .add(IgnoreEntry::from(&candidate))
            .map_err(|e| UpdatesError::Store(format!("{:#}", e)))?;
        inner.partition.remove(track_id);
        info!("Ignored updates for {} ({})", candidate.name, track_id);

        self.emit(UpdateEvent::for_partition(&inner.partition));
        Ok(inner.partition.clone())
    }

    /// Stop ignoring an app and show it again if the latest result has it
    pub fn unignore(&self, track_id: &str) -> Result<ResultPartition, UpdatesError> {
        let removed = self
            .ignore_store
            .remove(track_id)
            .map_err(|e| UpdatesError::Store(format!("{:#}", e)))?;
        if removed {
            info!("No longer ignoring {}", track_id);
        } else {
            debug!("{} was not ignored", track_id);
        }
        Ok(self.apply_ignore_list_changed())
    }

    /// All ignored apps
    pub fn ignored(&self) -> Vec<IgnoreEntry> {
        self.ignore_store.all()
    }

    /// The device was unlinked: drop results and cancel any running check
    pub fn device_unlinked(&self) {
        let mut inner = self.inner();
        inner.epoch += 1;
        inner.cleanup();
        inner.state = CheckState::Failed(UpdatesError::NotLinked);
        info!("Device unlinked, cleared updates");
        self.emit(UpdateEvent::failed(UpdatesError::NotLinked));
    }

    fn begin_cycle(&self) -> u64 {
        let mut inner = self.inner();
        inner.epoch += 1;
        inner.state = CheckState::Idle;
        inner.retry_count = 0;
        debug!("Starting update check #{}", inner.epoch);
        self.emit(UpdateEvent::Loading);
        inner.epoch
    }

    fn transition(&self, epoch: u64, state: CheckState) -> Result<(), UpdatesError> {
        let mut inner = self.inner();
        if inner.epoch != epoch {
            debug!("Update check #{} superseded by #{}", epoch, inner.epoch);
            return Err(UpdatesError::Superseded);
        }
        if let CheckState::Polling { attempt } = state {
            inner.retry_count = attempt;
        }
        inner.state = state;
        Ok(())
    }

    fn succeed(
        &self,
        epoch: u64,
        candidates: Vec<UpdateCandidate>,
    ) -> Result<ResultPartition, UpdatesError> {
        let mut inner = self.inner();
        if inner.epoch != epoch {
            debug!("Discarding result of superseded update check #{}", epoch);
            return Err(UpdatesError::Superseded);
        }

        inner.retry_count = 0;
        inner.partition = self.build_partition(&candidates);
        inner.candidates = candidates;
        inner.state = CheckState::Succeeded;
        info!(
            "Update check finished: {} updateable, {} non updateable",
            inner.partition.updateable.len(),
            inner.partition.non_updateable.len()
        );

        self.emit(UpdateEvent::for_partition(&inner.partition));
        Ok(inner.partition.clone())
    }

    /// End the cycle with `error`, returning the error to hand to the caller
    fn fail(&self, epoch: u64, error: UpdatesError) -> UpdatesError {
        let mut inner = self.inner();
        if inner.epoch != epoch {
            debug!("Discarding failure of superseded update check #{}: {}", epoch, error);
            return UpdatesError::Superseded;
        }

        inner.cleanup();
        inner.state = CheckState::Failed(error.clone());
        self.emit(UpdateEvent::failed(error.clone()));
        error
    }

    fn build_partition(&self, candidates: &[UpdateCandidate]) -> ResultPartition {
        ResultPartition::from_candidates(candidates, |id| self.ignore_store.contains(id))
    }

    fn emit(&self, event: UpdateEvent) {
        if self.events.send(event).is_err() {
            debug!("No subscribers for update events");
        }
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for UpdateCheckCoordinator {
    fn drop(&mut self) {
        let observer = self
            .badge_observer
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = observer {
            handle.abort();
        }
    }
}

async fn observe_badge_preference(
    coordinator: Weak<UpdateCheckCoordinator>,
    mut preference: watch::Receiver<bool>,
) {
    while preference.changed().await.is_ok() {
        let Some(coordinator) = coordinator.upgrade() else {
            break;
        };
        let badge = coordinator.displayed_badge();
        debug!("Badge preference changed, badge is now {:?}", badge);
        coordinator.emit(UpdateEvent::BadgeChanged(badge));
    }
}
