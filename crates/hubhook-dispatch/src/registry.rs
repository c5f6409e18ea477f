//! Script registry — registration metadata, ids and enable state.
//!
//! The registry is the only place registrations are created, removed or
//! toggled. Operations that also touch the hook table take the registry lock
//! first and the hook table lock second.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::hooks::definitions::{EventKind, HandlerResult, HookError, HookEvent};
use crate::hooks::registry::{HookHandler, HookRegistry};
use crate::stats::StatsCollector;

/// Priority used when a registration does not specify one.
pub const DEFAULT_PRIORITY: i32 = 100;

/// Process-lifetime-unique registration id. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScriptId(u64);

impl ScriptId {
    /// Wraps a raw id, e.g. one parsed from an admin command.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScriptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ScriptId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Callback run exactly once when a registration is removed.
pub type Cleanup = Box<dyn FnOnce() -> Result<(), HookError> + Send>;

/// Everything a script supplies when it registers.
pub struct ScriptSpec {
    name: String,
    hooks: BTreeMap<EventKind, Arc<dyn HookHandler>>,
    cleanup: Option<Cleanup>,
    priority: Option<i32>,
    auto_enable: bool,
}

impl ScriptSpec {
    /// Starts a registration. Names need not be unique.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hooks: BTreeMap::new(),
            cleanup: None,
            priority: None,
            auto_enable: true,
        }
    }

    /// Binds a handler to `kind`, replacing any handler given earlier for it.
    pub fn hook(mut self, kind: EventKind, handler: impl HookHandler + 'static) -> Self {
        self.hooks.insert(kind, Arc::new(handler));
        self
    }

    /// Binds an already shared handler to `kind`.
    pub fn hook_arc(mut self, kind: EventKind, handler: Arc<dyn HookHandler>) -> Self {
        self.hooks.insert(kind, handler);
        self
    }

    /// Binds a closure to `kind`.
    pub fn on<F>(self, kind: EventKind, f: F) -> Self
    where
        F: Fn(&HookEvent) -> HandlerResult + Send + Sync + 'static,
    {
        self.hook(kind, f)
    }

    /// Sets the cleanup callback.
    pub fn cleanup<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> Result<(), HookError> + Send + 'static,
    {
        self.cleanup = Some(Box::new(f));
        self
    }

    /// Sets the priority (lower runs earlier).
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Whether the registration starts enabled. Defaults to `true`.
    pub fn auto_enable(mut self, enabled: bool) -> Self {
        self.auto_enable = enabled;
        self
    }

    /// The declared event kinds.
    pub fn kinds(&self) -> Vec<EventKind> {
        self.hooks.keys().copied().collect()
    }
}

impl fmt::Debug for ScriptSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptSpec")
            .field("name", &self.name)
            .field("hooks", &self.kinds())
            .field("has_cleanup", &self.cleanup.is_some())
            .field("priority", &self.priority)
            .field("auto_enable", &self.auto_enable)
            .finish()
    }
}

/// Snapshot of one registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptInfo {
    /// Registration id.
    pub id: ScriptId,
    /// Script name as registered.
    pub name: String,
    /// Ordering key.
    pub priority: i32,
    /// Whether its handlers currently run.
    pub enabled: bool,
    /// Event kinds it declared.
    pub hooks: Vec<EventKind>,
    /// When it registered.
    pub registered_at: DateTime<Utc>,
}

struct Registration {
    name: Arc<str>,
    priority: i32,
    enabled: bool,
    hooks: Vec<EventKind>,
    cleanup: Option<Cleanup>,
    registered_at: DateTime<Utc>,
}

impl Registration {
    fn info(&self, id: ScriptId) -> ScriptInfo {
        ScriptInfo {
            id,
            name: self.name.to_string(),
            priority: self.priority,
            enabled: self.enabled,
            hooks: self.hooks.clone(),
            registered_at: self.registered_at,
        }
    }
}

struct Scripts {
    next_id: u64,
    entries: BTreeMap<ScriptId, Registration>,
}

/// Owner of every live registration.
pub struct ScriptRegistry {
    scripts: Mutex<Scripts>,
    hooks: Arc<HookRegistry>,
    stats: Arc<StatsCollector>,
    default_priority: i32,
    catch_panics: bool,
}

impl fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptRegistry")
            .field("count", &self.count())
            .field("default_priority", &self.default_priority)
            .finish_non_exhaustive()
    }
}

impl ScriptRegistry {
    /// Creates an empty registry writing bindings into `hooks`.
    pub fn new(hooks: Arc<HookRegistry>, stats: Arc<StatsCollector>) -> Self {
        Self {
            scripts: Mutex::new(Scripts {
                next_id: 1,
                entries: BTreeMap::new(),
            }),
            hooks,
            stats,
            default_priority: DEFAULT_PRIORITY,
            catch_panics: true,
        }
    }

    /// Priority applied to specs that leave it unset.
    pub fn with_default_priority(mut self, priority: i32) -> Self {
        self.default_priority = priority;
        self
    }

    /// Whether panics in cleanup callbacks are caught.
    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.catch_panics = catch_panics;
        self
    }

    /// Registers a script and binds its handlers. No handler runs here.
    pub fn register(&self, spec: ScriptSpec) -> ScriptId {
        let ScriptSpec {
            name,
            hooks,
            cleanup,
            priority,
            auto_enable,
        } = spec;
        let priority = priority.unwrap_or(self.default_priority);
        let bindings: Vec<(EventKind, Arc<dyn HookHandler>)> = hooks.into_iter().collect();
        let kinds: Vec<EventKind> = bindings.iter().map(|(kind, _)| *kind).collect();

        let id = {
            let mut scripts = self.scripts.lock();
            let id = ScriptId(scripts.next_id);
            scripts.next_id += 1;

            scripts.entries.insert(
                id,
                Registration {
                    name: Arc::from(name.as_str()),
                    priority,
                    enabled: auto_enable,
                    hooks: kinds.clone(),
                    cleanup,
                    registered_at: Utc::now(),
                },
            );
            self.hooks.bind(id, priority, &bindings);
            self.stats.record_registered(auto_enable);
            id
        };

        info!(
            script_id = %id,
            name = %name,
            priority,
            hooks = kinds.len(),
            enabled = auto_enable,
            "Script registered"
        );

        id
    }

    /// Removes a registration and its bindings, then runs its cleanup.
    ///
    /// Returns `false` for unknown ids. Cleanup failures are logged and never
    /// keep the registration alive.
    pub fn unregister(&self, id: ScriptId) -> bool {
        let removed = {
            let mut scripts = self.scripts.lock();
            let removed = scripts.entries.remove(&id);
            if let Some(registration) = &removed {
                self.hooks.unbind(id);
                self.stats.record_unregistered(registration.enabled);
            }
            removed
        };

        let Some(mut registration) = removed else {
            warn!(script_id = %id, "Unregister requested for unknown script");
            return false;
        };

        if let Some(cleanup) = registration.cleanup.take() {
            self.run_cleanup(id, &registration.name, cleanup);
        }

        info!(script_id = %id, name = %registration.name, "Script unregistered");
        true
    }

    fn run_cleanup(&self, id: ScriptId, name: &str, cleanup: Cleanup) {
        let outcome = if self.catch_panics {
            catch_unwind(AssertUnwindSafe(cleanup)).unwrap_or_else(|p| Err(HookError::from_panic(p)))
        } else {
            cleanup()
        };

        if let Err(e) = outcome {
            error!(script_id = %id, script = %name, error = %e, "Script cleanup failed");
        }
    }

    /// Enables a registration. Returns `false` for unknown ids.
    pub fn enable(&self, id: ScriptId) -> bool {
        self.set_enabled(id, true)
    }

    /// Disables a registration without removing it. Returns `false` for unknown ids.
    pub fn disable(&self, id: ScriptId) -> bool {
        self.set_enabled(id, false)
    }

    fn set_enabled(&self, id: ScriptId, enabled: bool) -> bool {
        let changed = {
            let mut scripts = self.scripts.lock();
            let Some(registration) = scripts.entries.get_mut(&id) else {
                return false;
            };
            let changed = registration.enabled != enabled;
            if changed {
                registration.enabled = enabled;
                self.stats.record_toggled(enabled);
            }
            changed
        };

        if changed {
            info!(script_id = %id, enabled, "Script state changed");
        }
        true
    }

    /// Live state consulted by the dispatch engine before each invocation:
    /// `None` when the registration is gone, else its enabled flag and name.
    pub(crate) fn dispatch_state(&self, id: ScriptId) -> Option<(bool, Arc<str>)> {
        let scripts = self.scripts.lock();
        scripts
            .entries
            .get(&id)
            .map(|r| (r.enabled, r.name.clone()))
    }

    /// Snapshot of one registration.
    pub fn info(&self, id: ScriptId) -> Option<ScriptInfo> {
        let scripts = self.scripts.lock();
        scripts.entries.get(&id).map(|r| r.info(id))
    }

    /// Snapshot of every registration, in id order.
    pub fn list_all(&self) -> Vec<ScriptInfo> {
        let scripts = self.scripts.lock();
        scripts
            .entries
            .iter()
            .map(|(id, r)| r.info(*id))
            .collect()
    }

    /// Ids of every live registration, ascending.
    pub fn ids(&self) -> Vec<ScriptId> {
        let scripts = self.scripts.lock();
        scripts.entries.keys().copied().collect()
    }

    /// Number of live registrations.
    pub fn count(&self) -> usize {
        let scripts = self.scripts.lock();
        scripts.entries.len()
    }
}
