//! Hook system — typed event definitions, the hook table, the dispatch
//! engine, and the per-kind entry points.

pub mod definitions;
pub mod dispatcher;
pub mod entry;
pub mod registry;

pub use definitions::{EventKind, HandlerResult, HookError, HookEvent, HookVerdict};
pub use dispatcher::{DispatchResult, HookDispatcher};
pub use registry::{HookBinding, HookHandler, HookRegistry, LegacyHandler, hook_fn};
