//! Hook table — per event kind, the priority-ordered handler bindings.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::definitions::{EventKind, HandlerResult, HookEvent, HookVerdict};
use crate::registry::ScriptId;

/// Capability a registering script implements to receive events.
///
/// One handler is bound per declared event kind; it receives the typed event
/// and decides whether the host lets it through.
pub trait HookHandler: Send + Sync {
    /// Handles one event.
    fn handle(&self, event: &HookEvent) -> HandlerResult;
}

impl<F> HookHandler for F
where
    F: Fn(&HookEvent) -> HandlerResult + Send + Sync,
{
    fn handle(&self, event: &HookEvent) -> HandlerResult {
        self(event)
    }
}

/// Wraps a closure as a shareable handler.
///
/// Passing the closure through this function lets the compiler infer its
/// argument and return types.
pub fn hook_fn<F>(f: F) -> Arc<dyn HookHandler>
where
    F: Fn(&HookEvent) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Adapter for handlers written against the host's integer convention,
/// where `0` consumes the event and anything else passes it on.
pub struct LegacyHandler<F>(pub F);

impl<F> HookHandler for LegacyHandler<F>
where
    F: Fn(&HookEvent) -> i32 + Send + Sync,
{
    fn handle(&self, event: &HookEvent) -> HandlerResult {
        Ok(HookVerdict::from_code((self.0)(event)))
    }
}

/// One entry in a per-kind list. Never exists without its registration.
#[derive(Clone)]
pub struct HookBinding {
    /// Owning registration.
    pub script_id: ScriptId,
    /// Ordering key, lower runs first.
    pub priority: i32,
    /// The bound handler.
    pub handler: Arc<dyn HookHandler>,
}

impl fmt::Debug for HookBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookBinding")
            .field("script_id", &self.script_id)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Bindings organized by event kind, each list sorted ascending by priority
/// with ties kept in registration order.
#[derive(Debug, Default)]
pub struct HookRegistry {
    handlers: Mutex<HashMap<EventKind, Vec<HookBinding>>>,
}

impl HookRegistry {
    /// Creates a new empty hook table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts one binding per declared kind for `script_id`.
    ///
    /// Only the registration store calls this, while holding its own lock,
    /// so all of a script's bindings become visible together.
    pub(crate) fn bind(
        &self,
        script_id: ScriptId,
        priority: i32,
        hooks: &[(EventKind, Arc<dyn HookHandler>)],
    ) {
        let mut handlers = self.handlers.lock();

        for (kind, handler) in hooks {
            let entries = handlers.entry(*kind).or_default();
            // After every equal priority, so ties stay in registration order.
            let at = entries.partition_point(|e| e.priority <= priority);
            entries.insert(
                at,
                HookBinding {
                    script_id,
                    priority,
                    handler: handler.clone(),
                },
            );
        }

        debug!(script_id = %script_id, kinds = hooks.len(), "Hook bindings inserted");
    }

    /// Removes every binding owned by `script_id`, returning how many went.
    pub(crate) fn unbind(&self, script_id: ScriptId) -> usize {
        let mut handlers = self.handlers.lock();
        let mut removed = 0;

        for entries in handlers.values_mut() {
            let before = entries.len();
            entries.retain(|e| e.script_id != script_id);
            removed += before - entries.len();
        }

        handlers.retain(|_, entries| !entries.is_empty());

        debug!(script_id = %script_id, removed, "Hook bindings removed");
        removed
    }

    /// Point-in-time copy of the bindings for `kind`, in invocation order.
    pub fn snapshot(&self, kind: EventKind) -> Vec<HookBinding> {
        let handlers = self.handlers.lock();
        handlers.get(&kind).cloned().unwrap_or_default()
    }

    /// Binding counts for every kind that has at least one binding.
    pub fn binding_counts(&self) -> BTreeMap<EventKind, usize> {
        let handlers = self.handlers.lock();
        handlers
            .iter()
            .map(|(kind, entries)| (*kind, entries.len()))
            .collect()
    }
}
