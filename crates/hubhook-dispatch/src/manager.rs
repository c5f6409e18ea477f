//! Script manager — the dispatcher's public surface for the host.

use std::sync::Arc;

use tracing::info;

use hubhook_core::config::dispatcher::DispatcherConfig;

use crate::admin::handler::AdminHandler;
use crate::api::notify::Notifier;
use crate::hooks::definitions::{HookEvent, HookVerdict};
use crate::hooks::dispatcher::{DispatchResult, HookDispatcher};
use crate::hooks::registry::HookRegistry;
use crate::registry::{ScriptId, ScriptInfo, ScriptRegistry, ScriptSpec};
use crate::stats::{DispatchStats, StatsCollector};

/// Owns the registry, hook table, statistics and admin surface.
///
/// Constructed explicitly by the host integration layer. The manager owns no
/// thread; every method runs on the calling thread and may be called from
/// many threads at once.
#[derive(Debug)]
pub struct ScriptManager {
    scripts: Arc<ScriptRegistry>,
    hooks: Arc<HookRegistry>,
    stats: Arc<StatsCollector>,
    dispatcher: Arc<HookDispatcher>,
    pub(crate) admin: AdminHandler,
}

impl ScriptManager {
    /// Creates a manager with default settings.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self::with_config(&DispatcherConfig::default(), notifier)
    }

    /// Creates a manager from configuration.
    pub fn with_config(config: &DispatcherConfig, notifier: Arc<dyn Notifier>) -> Self {
        let hooks = Arc::new(HookRegistry::new());
        let stats = Arc::new(StatsCollector::new());
        let scripts = Arc::new(
            ScriptRegistry::new(hooks.clone(), stats.clone())
                .with_default_priority(config.default_priority)
                .with_catch_panics(config.catch_panics),
        );
        let dispatcher = Arc::new(
            HookDispatcher::new(scripts.clone(), hooks.clone(), stats.clone())
                .with_catch_panics(config.catch_panics),
        );
        let admin = AdminHandler::new(scripts.clone(), hooks.clone(), stats.clone(), notifier)
            .with_admin_class(config.admin_class)
            .with_command_word(config.admin_command.clone());

        Self {
            scripts,
            hooks,
            stats,
            dispatcher,
            admin,
        }
    }

    /// Registers a script. See [`ScriptRegistry::register`].
    pub fn register(&self, spec: ScriptSpec) -> ScriptId {
        self.scripts.register(spec)
    }

    /// Unregisters a script, running its cleanup. `false` for unknown ids.
    pub fn unregister(&self, id: ScriptId) -> bool {
        self.scripts.unregister(id)
    }

    /// Enables a script. `false` for unknown ids.
    pub fn enable(&self, id: ScriptId) -> bool {
        self.scripts.enable(id)
    }

    /// Disables a script without removing it. `false` for unknown ids.
    pub fn disable(&self, id: ScriptId) -> bool {
        self.scripts.disable(id)
    }

    /// Snapshot of one script.
    pub fn info(&self, id: ScriptId) -> Option<ScriptInfo> {
        self.scripts.info(id)
    }

    /// Snapshot of every script, in id order.
    pub fn list_all(&self) -> Vec<ScriptInfo> {
        self.scripts.list_all()
    }

    /// Current statistics.
    pub fn stats(&self) -> DispatchStats {
        self.stats.snapshot(self.hooks.binding_counts())
    }

    /// Dispatches an event through its kind's handler chain.
    pub fn dispatch(&self, event: &HookEvent) -> HookVerdict {
        self.dispatcher.dispatch(event)
    }

    /// Dispatches an event and reports which handlers ran.
    pub fn dispatch_detailed(&self, event: &HookEvent) -> DispatchResult {
        self.dispatcher.dispatch_detailed(event)
    }

    /// Unregisters every live script, running cleanups, and returns how many
    /// were removed. Safe to call repeatedly.
    pub fn shutdown(&self) -> usize {
        let ids = self.scripts.ids();
        info!(scripts = ids.len(), "Shutting down dispatcher");

        let removed = ids
            .into_iter()
            .filter(|id| self.scripts.unregister(*id))
            .count();

        info!(removed, "Dispatcher shut down");
        removed
    }
}
