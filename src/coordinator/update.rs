use crate::events::TaskGuard;
use crate::notifications::Notifications;
use crate::platform::{PlatformAdapter, PlatformError};
use crate::state::{SessionState, UpdateState};
use crate::store::{StoreReader, StoreWriter};
use chrono::{DateTime, Utc};
use coco_desk_update::{
    UpdateChannel, UpdateCheckResult, UpdateChecker, UpdateError, UpdateSchedule,
    current_timestamp,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Why a check was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTrigger {
    /// The user asked
    Manual,
    /// The snapshot channel was switched on
    ChannelSwitch,
    /// The periodic schedule came due
    Scheduled,
}

impl UpdateTrigger {
    pub fn is_background(&self) -> bool {
        !matches!(self, UpdateTrigger::Manual)
    }
}

/// Owns [`UpdateState`]: runs checks through the adapter, one at a time,
/// and decides whether the update prompt is shown.
pub struct UpdateCoordinator {
    store: StoreWriter<UpdateState>,
    session: StoreReader<SessionState>,
    adapter: Arc<dyn PlatformAdapter>,
    notifications: Notifications,
    checker: UpdateChecker,
    schedule: UpdateSchedule,
    /// When the last check failed; cleared by a successful one
    last_failure: Mutex<Option<DateTime<Utc>>>,
}

impl UpdateCoordinator {
    pub fn new(
        store: StoreWriter<UpdateState>,
        session: StoreReader<SessionState>,
        adapter: Arc<dyn PlatformAdapter>,
        notifications: Notifications,
    ) -> Arc<Self> {
        Self::with_schedule(store, session, adapter, notifications, UpdateSchedule::default())
    }

    pub fn with_schedule(
        store: StoreWriter<UpdateState>,
        session: StoreReader<SessionState>,
        adapter: Arc<dyn PlatformAdapter>,
        notifications: Notifications,
        schedule: UpdateSchedule,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            session,
            adapter,
            notifications,
            checker: UpdateChecker::new(),
            schedule,
            last_failure: Mutex::new(None),
        })
    }

    pub fn reader(&self) -> StoreReader<UpdateState> {
        self.store.reader()
    }

    pub fn state(&self) -> UpdateState {
        self.store.get()
    }

    pub fn is_checking(&self) -> bool {
        self.checker.is_checking()
    }

    pub fn last_result(&self) -> Option<UpdateCheckResult> {
        self.checker.last_result()
    }

    fn channel(&self) -> UpdateChannel {
        UpdateChannel::from_snapshot_flag(self.session.read(|s| s.appearance.snapshot_update))
    }

    /// Run one check.
    ///
    /// Returns [`UpdateCheckResult::InProgress`] without calling the adapter
    /// if another check is running. A failure leaves the store untouched and
    /// lands in the notification list: as an error for manual checks, as a
    /// warning for background ones.
    pub async fn check(&self, trigger: UpdateTrigger) -> UpdateCheckResult {
        let Some(_guard) = self.checker.try_begin() else {
            log::debug!("{:?} update check skipped: already checking", trigger);
            return UpdateCheckResult::InProgress;
        };

        let channel = self.channel();
        log::info!("Checking for updates ({:?}, {} channel)", trigger, channel);

        let result = match self.adapter.check_update(channel).await {
            Ok(info) => {
                *self.last_failure.lock() = None;
                let skipped = self.store.read(|s| s.skip_version().map(str::to_string));
                let result = UpdateCheckResult::from_fetch(info.clone(), skipped.as_deref());
                self.store.update(|s| {
                    let mut changed = s.record_check_time(current_timestamp());
                    if let Some(info) = info {
                        changed |= s.apply_check(info);
                    }
                    changed
                });
                match &result {
                    UpdateCheckResult::UpdateAvailable(info) => {
                        log::info!("Update available: {}", info.version)
                    }
                    UpdateCheckResult::UpToDate => log::info!("Already up to date"),
                    _ => {}
                }
                result
            }
            Err(e) => {
                *self.last_failure.lock() = Some(Utc::now());
                let message = format!("Update failed: {}", e);
                if trigger.is_background() {
                    log::warn!("{}", message);
                    self.notifications.warning(message);
                } else {
                    log::error!("{}", message);
                    self.notifications.error(message);
                }
                UpdateCheckResult::Error(match e {
                    PlatformError::Update(e) => e,
                    other => UpdateError::Other(other.to_string()),
                })
            }
        };

        self.checker.record(result.clone());
        result
    }

    /// Suppress the prompt for the version currently on offer.
    pub fn skip_version(&self) -> bool {
        self.store.update(|s| {
            let Some(version) = s.update_info.as_ref().map(|i| i.version.clone()) else {
                return false;
            };
            log::info!("Skipping update {}", version);
            s.set_skip_version(Some(version)) | s.set_visible(false)
        })
    }

    /// Close the prompt. Only optional updates can be dismissed.
    pub fn dismiss(&self) -> bool {
        self.store.update(|s| s.is_optional && s.set_visible(false))
    }

    pub fn set_optional(&self, is_optional: bool) -> bool {
        self.store.update(|s| s.set_optional(is_optional))
    }

    /// Restart into the installed update. Failures reach the user.
    pub async fn relaunch(&self) -> Result<(), PlatformError> {
        log::info!("Relaunching to apply update");
        self.adapter.relaunch_app().await.inspect_err(|e| {
            log::error!("Relaunch failed: {}", e);
            self.notifications.error(format!("Relaunch failed: {}", e));
        })
    }

    /// Check whenever the snapshot channel turns on, including when it is
    /// already on at startup.
    pub fn spawn_channel_watch(self: &Arc<Self>) -> TaskGuard {
        let this = Arc::clone(self);
        let mut session = self.session.clone();
        TaskGuard::new(tokio::spawn(async move {
            let mut was_on = false;
            loop {
                let is_on = session.read(|s| s.appearance.snapshot_update);
                if is_on && !was_on {
                    this.check(UpdateTrigger::ChannelSwitch).await;
                }
                was_on = is_on;
                if !session.changed().await {
                    break;
                }
            }
            log::debug!("update channel watch stopped");
        }))
    }

    /// Wake every poll interval and check when the configured frequency says
    /// one is due. The first wake is immediate. A failed check is not retried
    /// until the frequency period has passed again.
    pub fn spawn_scheduler(self: &Arc<Self>) -> TaskGuard {
        let this = Arc::clone(self);
        TaskGuard::new(tokio::spawn(async move {
            let mut interval = tokio::time::interval(this.schedule.poll_interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let last_failure = *this.last_failure.lock();
                let due = this
                    .store
                    .read(|s| this.schedule.is_due(&s.config, last_failure, Utc::now()));
                if due {
                    this.check(UpdateTrigger::Scheduled).await;
                }
            }
        }))
    }
}
