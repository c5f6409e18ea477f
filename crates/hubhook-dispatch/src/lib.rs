//! # hubhook-dispatch
//!
//! Shared hook dispatcher for hub extension scripts. Provides:
//!
//! - A script registry with process-unique ids, priorities and enable state
//! - A hook table keeping per-kind handlers in priority order
//! - A dispatch engine with Allow/Block chain semantics and failure isolation
//! - Per-kind call statistics
//! - An administrative text-command surface (`list`, `stats`, `enable`,
//!   `disable`, `help`)

pub mod admin;
pub mod api;
pub mod hooks;
pub mod manager;
pub mod prelude;
pub mod registry;
pub mod stats;

pub use api::notify::{Notifier, NotifyError, NullNotifier};
pub use hooks::definitions::{EventKind, HandlerResult, HookError, HookEvent, HookVerdict};
pub use hooks::dispatcher::{DispatchResult, HookDispatcher};
pub use hooks::registry::{HookHandler, HookRegistry, LegacyHandler, hook_fn};
pub use manager::ScriptManager;
pub use registry::{DEFAULT_PRIORITY, ScriptId, ScriptInfo, ScriptRegistry, ScriptSpec};
pub use stats::{DispatchStats, HookCallStats, StatsCollector};
