//! Administrative command handler — list, stats, enable, disable, help.

use std::sync::Arc;

use tracing::{debug, info};

use super::command::{AdminCommand, AdminParseError};
use crate::api::notify::Notifier;
use crate::hooks::definitions::{EventKind, HookVerdict};
use crate::hooks::registry::HookRegistry;
use crate::registry::ScriptRegistry;
use crate::stats::StatsCollector;

/// User class required by default: hub master.
pub const MASTER_CLASS: i32 = 10;

/// Runs administrative commands and answers through the host's notifier.
#[derive(Debug)]
pub struct AdminHandler {
    scripts: Arc<ScriptRegistry>,
    hooks: Arc<HookRegistry>,
    stats: Arc<StatsCollector>,
    notifier: Arc<dyn Notifier>,
    admin_class: i32,
    word: String,
}

impl AdminHandler {
    /// Creates a handler gated on [`MASTER_CLASS`] and the word `dispatcher`.
    pub fn new(
        scripts: Arc<ScriptRegistry>,
        hooks: Arc<HookRegistry>,
        stats: Arc<StatsCollector>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            scripts,
            hooks,
            stats,
            notifier,
            admin_class: MASTER_CLASS,
            word: "dispatcher".to_string(),
        }
    }

    /// Minimum user class allowed to run commands.
    pub fn with_admin_class(mut self, admin_class: i32) -> Self {
        self.admin_class = admin_class;
        self
    }

    /// First word that marks a command as administrative.
    pub fn with_command_word(mut self, word: impl Into<String>) -> Self {
        self.word = word.into();
        self
    }

    /// Handles a hub command.
    ///
    /// Returns `Allow` when the text is not an administrative command, and
    /// `Block` (handled) for every administrative command, valid or not.
    pub fn handle(&self, nick: &str, command: &str, user_class: i32, prefix: &str) -> HookVerdict {
        let Some(parsed) = AdminCommand::parse(command, &self.word).transpose() else {
            return HookVerdict::Allow;
        };

        if user_class < self.admin_class {
            info!(nick = %nick, user_class, "Administrative command refused");
            self.send(nick, "Permission denied. Master class required.");
            return HookVerdict::Block;
        }

        match parsed {
            Ok(cmd) => self.run(nick, cmd, prefix),
            Err(e) => self.reject(nick, &e, prefix),
        }

        HookVerdict::Block
    }

    fn run(&self, nick: &str, cmd: AdminCommand, prefix: &str) {
        debug!(nick = %nick, command = ?cmd, "Running administrative command");

        match cmd {
            AdminCommand::List => self.list(nick),
            AdminCommand::Stats => self.stats(nick),
            AdminCommand::Enable(id) => {
                if self.scripts.enable(id) {
                    self.send(nick, &format!("Script ID {id} enabled"));
                } else {
                    self.send(nick, &format!("Script ID {id} not found"));
                }
            }
            AdminCommand::Disable(id) => {
                if self.scripts.disable(id) {
                    self.send(nick, &format!("Script ID {id} disabled"));
                } else {
                    self.send(nick, &format!("Script ID {id} not found"));
                }
            }
            AdminCommand::Help => self.help(nick, prefix),
        }
    }

    fn reject(&self, nick: &str, err: &AdminParseError, prefix: &str) {
        match err {
            AdminParseError::MissingSubcommand | AdminParseError::MissingId(_) => {
                self.send(nick, &self.usage(prefix));
            }
            AdminParseError::InvalidId(_) => self.send(nick, "Invalid script ID"),
            AdminParseError::Unknown(sub) => {
                self.send(nick, &format!("Unknown subcommand: {sub}"));
            }
        }
    }

    fn list(&self, nick: &str) {
        let scripts = self.scripts.list_all();
        self.send(nick, &format!("Registered Scripts ({}):", scripts.len()));

        for script in &scripts {
            let status = if script.enabled { "on" } else { "off" };
            self.send(
                nick,
                &format!(
                    "  [{status}] ID={}: {} ({} hooks, priority={})",
                    script.id,
                    script.name,
                    script.hooks.len(),
                    script.priority
                ),
            );
        }
    }

    fn stats(&self, nick: &str) {
        let stats = self.stats.snapshot(self.hooks.binding_counts());

        self.send(nick, "Dispatcher Statistics:");
        self.send(nick, &format!("  Total scripts: {}", stats.total_scripts));
        self.send(nick, &format!("  Active scripts: {}", stats.active_scripts));
        self.send(nick, &format!("  Disabled scripts: {}", stats.disabled_scripts));
        self.send(nick, "  Hook calls:");

        for kind in EventKind::ALL {
            if let Some(calls) = stats.calls.get(&kind) {
                self.send(
                    nick,
                    &format!(
                        "    {kind}: {} calls ({} failed)",
                        calls.attempted, calls.failed
                    ),
                );
            }
        }
    }

    fn help(&self, nick: &str, prefix: &str) {
        let word = &self.word;
        self.send(nick, "Dispatcher Commands:");
        self.send(nick, &format!("  {prefix}{word} list           - List all registered scripts"));
        self.send(nick, &format!("  {prefix}{word} stats          - Show dispatcher statistics"));
        self.send(nick, &format!("  {prefix}{word} enable <id>    - Enable a script"));
        self.send(nick, &format!("  {prefix}{word} disable <id>   - Disable a script"));
        self.send(nick, &format!("  {prefix}{word} help           - Show this help"));
    }

    fn usage(&self, prefix: &str) -> String {
        format!(
            "Usage: {prefix}{} [list|stats|enable <id>|disable <id>|help]",
            self.word
        )
    }

    fn send(&self, nick: &str, text: &str) {
        if let Err(e) = self.notifier.notify(nick, text) {
            debug!(nick = %nick, error = %e, "Dropping undeliverable notice");
        }
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::api::notify::NotifyError;
    use crate::registry::ScriptSpec;

    #[derive(Default)]
    struct Inbox(Mutex<Vec<(String, String)>>);

    impl Notifier for Inbox {
        fn notify(&self, recipient: &str, text: &str) -> Result<(), NotifyError> {
            self.0.lock().push((recipient.to_string(), text.to_string()));
            Ok(())
        }
    }

    struct Unreachable;

    impl Notifier for Unreachable {
        fn notify(&self, recipient: &str, _text: &str) -> Result<(), NotifyError> {
            Err(NotifyError::new(recipient, "user offline"))
        }
    }

    fn handler(notifier: Arc<dyn Notifier>) -> (AdminHandler, Arc<ScriptRegistry>) {
        let hooks = Arc::new(HookRegistry::new());
        let stats = Arc::new(StatsCollector::new());
        let scripts = Arc::new(ScriptRegistry::new(hooks.clone(), stats.clone()));
        (
            AdminHandler::new(scripts.clone(), hooks, stats, notifier),
            scripts,
        )
    }

    fn texts(inbox: &Inbox) -> Vec<String> {
        inbox.0.lock().iter().map(|(_, t)| t.clone()).collect()
    }

    #[test]
    fn test_non_admin_text_passes_through() {
        let inbox = Arc::new(Inbox::default());
        let (admin, _) = handler(inbox.clone());
        assert_eq!(admin.handle("op", "topic hello", 10, "!"), HookVerdict::Allow);
        assert!(texts(&inbox).is_empty());
    }

    #[test]
    fn test_malformed_commands_are_still_handled() {
        let inbox = Arc::new(Inbox::default());
        let (admin, _) = handler(inbox.clone());

        assert_eq!(admin.handle("op", "dispatcher", 10, "!"), HookVerdict::Block);
        assert_eq!(admin.handle("op", "dispatcher enable x", 10, "!"), HookVerdict::Block);
        assert_eq!(admin.handle("op", "dispatcher frob", 10, "+"), HookVerdict::Block);
        assert_eq!(admin.handle("op", "dispatcher disable", 10, "+"), HookVerdict::Block);

        assert_eq!(
            texts(&inbox),
            vec![
                "Usage: !dispatcher [list|stats|enable <id>|disable <id>|help]".to_string(),
                "Invalid script ID".to_string(),
                "Unknown subcommand: frob".to_string(),
                "Usage: +dispatcher [list|stats|enable <id>|disable <id>|help]".to_string(),
            ]
        );
    }

    #[test]
    fn test_enable_and_disable_report_unknown_ids() {
        let inbox = Arc::new(Inbox::default());
        let (admin, scripts) = handler(inbox.clone());
        let id = scripts.register(ScriptSpec::new("s"));

        admin.handle("op", &format!("dispatcher disable {id}"), 10, "!");
        admin.handle("op", "dispatcher enable 77", 10, "!");

        assert_eq!(
            texts(&inbox),
            vec![
                format!("Script ID {id} disabled"),
                "Script ID 77 not found".to_string(),
            ]
        );
        assert_eq!(scripts.info(id).map(|i| i.enabled), Some(false));
    }

    #[test]
    fn test_delivery_failures_are_swallowed() {
        let (admin, scripts) = handler(Arc::new(Unreachable));
        let id = scripts.register(ScriptSpec::new("s"));

        let verdict = admin.handle("op", &format!("dispatcher disable {id}"), 10, "!");
        assert_eq!(verdict, HookVerdict::Block);
        assert_eq!(scripts.info(id).map(|i| i.enabled), Some(false));
    }

    #[test]
    fn test_custom_threshold() {
        let inbox = Arc::new(Inbox::default());
        let (admin, _) = handler(inbox.clone());
        let admin = admin.with_admin_class(3).with_command_word("hooks");

        assert_eq!(admin.handle("op", "hooks help", 3, "!"), HookVerdict::Block);
        assert_eq!(texts(&inbox)[1], "  !hooks list           - List all registered scripts");
    }
}
