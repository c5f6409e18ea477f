//! Hook dispatcher — runs the bound handlers of one event kind as a chain.
//!
//! - Handlers are called in priority order, ties in registration order.
//! - A handler returning `Block` stops the chain and blocks the event.
//! - A failing (or panicking) handler is counted and logged, and the chain
//!   moves on. A failure never blocks the event by itself.
//! - The chain is a snapshot taken at the start of the call. Each entry's
//!   registration is re-checked just before it runs; entries removed or
//!   disabled since the snapshot are skipped, entries added since are not
//!   seen until the next call.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::{debug, warn};

use super::definitions::{HandlerResult, HookError, HookEvent, HookVerdict};
use super::registry::{HookBinding, HookRegistry};
use crate::registry::{ScriptId, ScriptRegistry};
use crate::stats::StatsCollector;

/// What happened during one dispatch call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchResult {
    /// Final verdict for the host.
    pub verdict: HookVerdict,
    /// Handlers actually invoked, in order.
    pub invoked: Vec<ScriptId>,
    /// Handlers that failed, with their error.
    pub failures: Vec<(ScriptId, HookError)>,
    /// Registration whose handler blocked the event.
    pub blocked_by: Option<ScriptId>,
}

/// Dispatches events to the handlers bound for their kind.
#[derive(Debug)]
pub struct HookDispatcher {
    scripts: Arc<ScriptRegistry>,
    hooks: Arc<HookRegistry>,
    stats: Arc<StatsCollector>,
    catch_panics: bool,
}

impl HookDispatcher {
    /// Creates a dispatcher reading from the given stores.
    pub fn new(
        scripts: Arc<ScriptRegistry>,
        hooks: Arc<HookRegistry>,
        stats: Arc<StatsCollector>,
    ) -> Self {
        Self {
            scripts,
            hooks,
            stats,
            catch_panics: true,
        }
    }

    /// When `false`, handler panics unwind into the caller.
    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.catch_panics = catch_panics;
        self
    }

    /// Dispatches `event` and returns only the verdict.
    pub fn dispatch(&self, event: &HookEvent) -> HookVerdict {
        self.dispatch_detailed(event).verdict
    }

    /// Dispatches `event` and reports which handlers ran.
    pub fn dispatch_detailed(&self, event: &HookEvent) -> DispatchResult {
        let kind = event.kind();
        self.stats.record_attempt(kind);

        let bindings = self.hooks.snapshot(kind);
        let mut result = DispatchResult::default();

        if bindings.is_empty() {
            return result;
        }

        debug!(hook = %kind, handler_count = bindings.len(), "Dispatching hook");

        for binding in &bindings {
            let Some((enabled, script)) = self.scripts.dispatch_state(binding.script_id) else {
                continue;
            };
            if !enabled {
                continue;
            }

            result.invoked.push(binding.script_id);

            match self.invoke(binding, event) {
                Ok(HookVerdict::Allow) => {}
                Ok(HookVerdict::Block) => {
                    debug!(
                        hook = %kind,
                        script_id = %binding.script_id,
                        script = %script,
                        "Handler blocked event"
                    );
                    result.verdict = HookVerdict::Block;
                    result.blocked_by = Some(binding.script_id);
                    break;
                }
                Err(e) => {
                    self.stats.record_failure(kind);
                    warn!(
                        hook = %kind,
                        script_id = %binding.script_id,
                        script = %script,
                        error = %e,
                        "Hook handler failed"
                    );
                    result.failures.push((binding.script_id, e));
                }
            }
        }

        result
    }

    fn invoke(&self, binding: &HookBinding, event: &HookEvent) -> HandlerResult {
        if !self.catch_panics {
            return binding.handler.handle(event);
        }

        catch_unwind(AssertUnwindSafe(|| binding.handler.handle(event)))
            .unwrap_or_else(|payload| Err(HookError::from_panic(payload)))
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::hooks::definitions::EventKind;
    use crate::registry::ScriptSpec;
    use crate::stats::HookCallStats;

    struct Fixture {
        scripts: Arc<ScriptRegistry>,
        dispatcher: HookDispatcher,
        stats: Arc<StatsCollector>,
    }

    fn fixture() -> Fixture {
        let hooks = Arc::new(HookRegistry::new());
        let stats = Arc::new(StatsCollector::new());
        let scripts = Arc::new(ScriptRegistry::new(hooks.clone(), stats.clone()));
        let dispatcher = HookDispatcher::new(scripts.clone(), hooks, stats.clone());
        Fixture {
            scripts,
            dispatcher,
            stats,
        }
    }

    fn login(nick: &str) -> HookEvent {
        HookEvent::OnUserLogin { nick: nick.into() }
    }

    #[test]
    fn test_no_handlers_still_counts_attempt() {
        let f = fixture();
        let result = f.dispatcher.dispatch_detailed(&login("alice"));
        assert_eq!(result, DispatchResult::default());
        assert_eq!(f.stats.calls(EventKind::OnUserLogin).attempted, 1);
    }

    #[test]
    fn test_panicking_handler_counts_as_failure() {
        let f = fixture();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();

        let bad = f.scripts.register(
            ScriptSpec::new("bad")
                .priority(1)
                .on(EventKind::OnUserLogin, |_| panic!("handler bug")),
        );
        f.scripts.register(ScriptSpec::new("good").on(EventKind::OnUserLogin, move |e| {
            log.lock().push(e.nick().map(str::to_string));
            Ok(HookVerdict::Allow)
        }));

        let result = f.dispatcher.dispatch_detailed(&login("bob"));
        assert_eq!(result.verdict, HookVerdict::Allow);
        assert_eq!(
            result.failures,
            vec![(bad, HookError::Panicked("handler bug".to_string()))]
        );
        assert_eq!(*seen.lock(), vec![Some("bob".to_string())]);
        assert_eq!(f.stats.calls(EventKind::OnUserLogin).failed, 1);
    }

    #[test]
    fn test_block_reports_blocker() {
        let f = fixture();
        let blocker = f.scripts.register(
            ScriptSpec::new("gate").on(EventKind::OnUserLogin, |_| Ok(HookVerdict::Block)),
        );
        f.scripts.register(
            ScriptSpec::new("after")
                .priority(200)
                .on(EventKind::OnUserLogin, |_| Ok(HookVerdict::Allow)),
        );

        let result = f.dispatcher.dispatch_detailed(&login("carol"));
        assert_eq!(result.verdict, HookVerdict::Block);
        assert_eq!(result.blocked_by, Some(blocker));
        assert_eq!(result.invoked, vec![blocker]);
    }

    #[test]
    fn test_handler_disabling_later_entry_mid_dispatch() {
        let f = fixture();
        let scripts = f.scripts.clone();
        let late_id = Arc::new(Mutex::new(None::<ScriptId>));
        let target = late_id.clone();

        f.scripts.register(
            ScriptSpec::new("disabler")
                .priority(1)
                .on(EventKind::OnUserLogin, move |_| {
                    if let Some(id) = *target.lock() {
                        scripts.disable(id);
                    }
                    Ok(HookVerdict::Allow)
                }),
        );
        let late = f.scripts.register(
            ScriptSpec::new("late").on(EventKind::OnUserLogin, |_| Ok(HookVerdict::Block)),
        );
        *late_id.lock() = Some(late);

        let result = f.dispatcher.dispatch_detailed(&login("dave"));
        assert_eq!(result.verdict, HookVerdict::Allow);
        assert_eq!(result.invoked.len(), 1);
    }

    #[test]
    fn test_handler_unregistering_later_entry_mid_dispatch() {
        let f = fixture();
        let scripts = f.scripts.clone();
        let late_id = Arc::new(Mutex::new(None::<ScriptId>));
        let target = late_id.clone();

        let remover = f.scripts.register(
            ScriptSpec::new("remover")
                .priority(1)
                .on(EventKind::OnUserLogin, move |_| {
                    if let Some(id) = *target.lock() {
                        scripts.unregister(id);
                    }
                    Ok(HookVerdict::Allow)
                }),
        );
        let late = f.scripts.register(
            ScriptSpec::new("late").on(EventKind::OnUserLogin, |_| Ok(HookVerdict::Block)),
        );
        *late_id.lock() = Some(late);

        let result = f.dispatcher.dispatch_detailed(&login("erin"));
        assert_eq!(result.verdict, HookVerdict::Allow);
        assert_eq!(result.invoked, vec![remover]);
        assert!(result.failures.is_empty());
        assert_eq!(
            f.stats.calls(EventKind::OnUserLogin),
            HookCallStats {
                attempted: 1,
                failed: 0
            }
        );
        assert!(f.scripts.info(late).is_none());
    }

    #[test]
    fn test_registration_during_dispatch_waits_for_next_call() {
        let f = fixture();
        let scripts = f.scripts.clone();

        f.scripts.register(ScriptSpec::new("spawner").on(EventKind::OnTimer, move |_| {
            scripts.register(
                ScriptSpec::new("child").on(EventKind::OnTimer, |_| Ok(HookVerdict::Block)),
            );
            Ok(HookVerdict::Allow)
        }));

        let event = HookEvent::OnTimer { msec: 10 };
        assert_eq!(f.dispatcher.dispatch(&event), HookVerdict::Allow);
        assert_eq!(f.dispatcher.dispatch(&event), HookVerdict::Block);
    }
}
