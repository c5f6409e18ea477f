//! Dispatch statistics — per-kind call counters and registration totals.
//!
//! Every counter is an independent atomic. Reading several counters in one
//! snapshot is not a consistent cut; each individual value is.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::hooks::definitions::EventKind;

#[derive(Debug, Default)]
struct KindCounters {
    attempted: AtomicU64,
    failed: AtomicU64,
}

/// Live counters updated by the registry and the dispatch engine.
#[derive(Debug)]
pub struct StatsCollector {
    total_scripts: AtomicU64,
    active_scripts: AtomicU64,
    disabled_scripts: AtomicU64,
    calls: [KindCounters; EventKind::COUNT],
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self {
            total_scripts: AtomicU64::new(0),
            active_scripts: AtomicU64::new(0),
            disabled_scripts: AtomicU64::new(0),
            calls: std::array::from_fn(|_| KindCounters::default()),
        }
    }
}

impl StatsCollector {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_registered(&self, enabled: bool) {
        self.total_scripts.fetch_add(1, Ordering::Relaxed);
        self.live_counter(enabled).fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unregistered(&self, enabled: bool) {
        self.live_counter(enabled).fetch_sub(1, Ordering::Relaxed);
    }

    /// A live registration moved from one enabled state to the other.
    pub(crate) fn record_toggled(&self, enabled: bool) {
        self.live_counter(enabled).fetch_add(1, Ordering::Relaxed);
        self.live_counter(!enabled).fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn record_attempt(&self, kind: EventKind) {
        self.calls[kind.index()]
            .attempted
            .fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self, kind: EventKind) {
        self.calls[kind.index()].failed.fetch_add(1, Ordering::Relaxed);
    }

    fn live_counter(&self, enabled: bool) -> &AtomicU64 {
        if enabled {
            &self.active_scripts
        } else {
            &self.disabled_scripts
        }
    }

    /// Counters for a single kind.
    pub fn calls(&self, kind: EventKind) -> HookCallStats {
        let counters = &self.calls[kind.index()];
        HookCallStats {
            attempted: counters.attempted.load(Ordering::Relaxed),
            failed: counters.failed.load(Ordering::Relaxed),
        }
    }

    /// Reads every counter. `bindings` comes from the hook table.
    pub fn snapshot(&self, bindings: BTreeMap<EventKind, usize>) -> DispatchStats {
        let calls = EventKind::ALL
            .iter()
            .map(|kind| (*kind, self.calls(*kind)))
            .filter(|(_, stats)| stats.attempted > 0)
            .collect();

        DispatchStats {
            total_scripts: self.total_scripts.load(Ordering::Relaxed),
            active_scripts: self.active_scripts.load(Ordering::Relaxed),
            disabled_scripts: self.disabled_scripts.load(Ordering::Relaxed),
            calls,
            bindings,
        }
    }
}

/// Attempted and failed dispatch counts for one event kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HookCallStats {
    /// Dispatch calls made for the kind, including calls with no handlers.
    pub attempted: u64,
    /// Handler invocations that failed.
    pub failed: u64,
}

/// Point-in-time statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    /// Registrations ever created.
    pub total_scripts: u64,
    /// Live registrations that are enabled.
    pub active_scripts: u64,
    /// Live registrations that are disabled.
    pub disabled_scripts: u64,
    /// Per-kind call counters, only for kinds dispatched at least once.
    pub calls: BTreeMap<EventKind, HookCallStats>,
    /// Bound handler count per kind, only for kinds with bindings.
    pub bindings: BTreeMap<EventKind, usize>,
}

impl DispatchStats {
    /// Counters for `kind`, zero when it was never dispatched.
    pub fn calls_for(&self, kind: EventKind) -> HookCallStats {
        self.calls.get(&kind).copied().unwrap_or_default()
    }
}
