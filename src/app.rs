//! Composition root: loads persisted state, builds the stores and
//! coordinators, wires them to the event bus and owns every subscription
//! and background task. Dropping a [`DeskApp`] tears all of it down.

use crate::coordinator::{SessionCoordinator, ShortcutCoordinator, UpdateCoordinator};
use crate::events::{EventBus, NativeEvent, Subscription, TaskGuard};
use crate::notifications::Notifications;
use crate::platform::{PlatformAdapter, PlatformError, ResourceHost, ViewLayer};
use crate::script_loader::{ScriptLoader, ScriptSource, iconfont_sources};
use crate::state::{SessionState, ShortcutState, UpdateState};
use crate::store::new_store;
use anyhow::Context;
use coco_desk_config::StateFile;
use coco_desk_update::UpdateSchedule;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Startup switches.
#[derive(Debug, Clone)]
pub struct DeskOptions {
    /// Run the channel watch and the periodic update scheduler
    pub background_update_checks: bool,
    pub update_schedule: UpdateSchedule,
}

impl Default for DeskOptions {
    fn default() -> Self {
        Self {
            background_update_checks: true,
            update_schedule: UpdateSchedule::default(),
        }
    }
}

pub struct DeskApp {
    config_dir: PathBuf,
    bus: EventBus,
    notifications: Notifications,
    scripts: ScriptLoader,
    session: Arc<SessionCoordinator>,
    shortcuts: Arc<ShortcutCoordinator>,
    updates: Arc<UpdateCoordinator>,
    subscriptions: Vec<Subscription>,
    tasks: Vec<TaskGuard>,
}

impl DeskApp {
    /// Build the app with default options. Must run inside a tokio runtime.
    pub fn new(
        adapter: Arc<dyn PlatformAdapter>,
        view: Arc<dyn ViewLayer>,
        resources: Arc<dyn ResourceHost>,
        config_dir: impl Into<PathBuf>,
    ) -> Self {
        Self::with_options(adapter, view, resources, config_dir, DeskOptions::default())
    }

    pub fn with_options(
        adapter: Arc<dyn PlatformAdapter>,
        view: Arc<dyn ViewLayer>,
        resources: Arc<dyn ResourceHost>,
        config_dir: impl Into<PathBuf>,
        options: DeskOptions,
    ) -> Self {
        let config_dir = config_dir.into();
        log::info!("Loading state from {}", config_dir.display());

        let session = SessionCoordinator::new(
            new_store("session", SessionState::load_or_default(&config_dir)),
            Arc::clone(&adapter),
            Arc::clone(&view),
        );
        let shortcuts = ShortcutCoordinator::new(
            new_store("shortcuts", ShortcutState::load_or_default(&config_dir)),
            view,
        );
        let notifications = Notifications::new();
        let updates = UpdateCoordinator::with_schedule(
            new_store("updates", UpdateState::load_or_default(&config_dir)),
            session.reader(),
            adapter,
            notifications.clone(),
            options.update_schedule,
        );

        let bus = EventBus::new();
        let mut subscriptions = session.attach(&bus);
        subscriptions.extend(shortcuts.attach(&bus));

        let tasks = if options.background_update_checks {
            vec![updates.spawn_channel_watch(), updates.spawn_scheduler()]
        } else {
            Vec::new()
        };

        log::info!(
            "coco-desk ready: {} listeners, {} background tasks",
            subscriptions.len(),
            tasks.len()
        );

        Self {
            config_dir,
            bus,
            notifications,
            scripts: ScriptLoader::new(resources),
            session,
            shortcuts,
            updates,
            subscriptions,
            tasks,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn session(&self) -> &Arc<SessionCoordinator> {
        &self.session
    }

    pub fn shortcuts(&self) -> &Arc<ShortcutCoordinator> {
        &self.shortcuts
    }

    pub fn updates(&self) -> &Arc<UpdateCoordinator> {
        &self.updates
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Deliver one native event synchronously.
    pub fn dispatch(&self, event: NativeEvent) -> usize {
        self.bus.dispatch(&event)
    }

    /// Load the icon font from `endpoint`, or the bundled copy.
    pub async fn load_iconfont(&self, endpoint: Option<&str>) -> Result<ScriptSource, PlatformError> {
        let (remote, local) = iconfont_sources(endpoint);
        self.scripts.load(remote.as_deref(), &local).await
    }

    /// Write the persisted subset of every store.
    pub fn persist(&self) -> anyhow::Result<()> {
        self.session
            .state()
            .save_to(&self.config_dir)
            .context("saving appearance settings")?;
        self.shortcuts
            .state()
            .save_to(&self.config_dir)
            .context("saving shortcut settings")?;
        self.updates
            .state()
            .save_to(&self.config_dir)
            .context("saving update settings")?;
        log::info!("State saved to {}", self.config_dir.display());
        Ok(())
    }
}

impl Drop for DeskApp {
    fn drop(&mut self) {
        log::info!(
            "Shutting down: dropping {} listeners and {} tasks",
            self.subscriptions.len(),
            self.tasks.len()
        );
        self.subscriptions.clear();
        self.tasks.clear();
    }
}
