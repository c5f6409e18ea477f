//! Everything a script needs to register handlers.

pub use crate::hooks::definitions::{EventKind, HandlerResult, HookError, HookEvent, HookVerdict};
pub use crate::hooks::registry::{HookHandler, LegacyHandler, hook_fn};
pub use crate::registry::{ScriptId, ScriptSpec};
