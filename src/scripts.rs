//! Scripts the console host registers at startup.

use std::sync::Arc;

use hubhook_dispatch::prelude::*;
use hubhook_dispatch::ScriptManager;

/// Logs chat, PMs, logins and logouts. Never blocks.
fn chat_logger(event: &HookEvent) -> HandlerResult {
    match event {
        HookEvent::OnParsedMsgChat { nick, message } => {
            tracing::info!(nick = %nick, message = %message, "chat");
        }
        HookEvent::OnParsedMsgPM {
            nick,
            message,
            other_nick,
        } => {
            tracing::info!(nick = %nick, to = %other_nick, message = %message, "pm");
        }
        HookEvent::OnUserLogin { nick } => tracing::info!(nick = %nick, "login"),
        HookEvent::OnUserLogout { nick } => tracing::info!(nick = %nick, "logout"),
        _ => {}
    }
    Ok(HookVerdict::Allow)
}

/// Blocks chat and PMs containing any configured word.
struct WordFilter {
    words: Vec<String>,
}

impl HookHandler for WordFilter {
    fn handle(&self, event: &HookEvent) -> HandlerResult {
        let message = match event {
            HookEvent::OnParsedMsgChat { message, .. } | HookEvent::OnParsedMsgPM { message, .. } => {
                message.to_lowercase()
            }
            _ => return Ok(HookVerdict::Allow),
        };

        if self.words.iter().any(|w| message.contains(w.as_str())) {
            tracing::info!(nick = ?event.nick(), "Message blocked by word filter");
            return Ok(HookVerdict::Block);
        }
        Ok(HookVerdict::Allow)
    }
}

/// Registers the built-in scripts. The word filter only loads when at least
/// one non-blank word is given.
pub fn register_builtin(manager: &ScriptManager, block_words: &[String]) {
    manager.register(
        ScriptSpec::new("ChatLogger")
            .priority(200)
            .on(EventKind::OnParsedMsgChat, chat_logger)
            .on(EventKind::OnParsedMsgPM, chat_logger)
            .on(EventKind::OnUserLogin, chat_logger)
            .on(EventKind::OnUserLogout, chat_logger),
    );

    let words: Vec<String> = block_words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return;
    }

    let filter: Arc<dyn HookHandler> = Arc::new(WordFilter { words });
    manager.register(
        ScriptSpec::new("WordFilter")
            .priority(50)
            .hook_arc(EventKind::OnParsedMsgChat, filter.clone())
            .hook_arc(EventKind::OnParsedMsgPM, filter)
            .cleanup(|| {
                tracing::info!("Word filter unloaded");
                Ok(())
            }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use hubhook_dispatch::NullNotifier;

    fn manager(block_words: &[&str]) -> ScriptManager {
        let manager = ScriptManager::new(Arc::new(NullNotifier));
        let words: Vec<String> = block_words.iter().map(|w| w.to_string()).collect();
        register_builtin(&manager, &words);
        manager
    }

    #[test]
    fn test_word_filter_blocks_case_insensitively() {
        let manager = manager(&["Spam"]);
        assert_eq!(manager.list_all().len(), 2);
        assert_eq!(manager.on_parsed_msg_chat("alice", "buy SPAM now"), HookVerdict::Block);
        assert_eq!(manager.on_parsed_msg_pm("alice", "spammy", "bob"), HookVerdict::Block);
        assert_eq!(manager.on_parsed_msg_chat("alice", "hello"), HookVerdict::Allow);
    }

    #[test]
    fn test_blank_words_do_not_block_everything() {
        let manager = manager(&["", "  ", "spam"]);
        assert_eq!(manager.on_parsed_msg_chat("alice", "hello"), HookVerdict::Allow);
        assert_eq!(manager.on_parsed_msg_chat("alice", "spam"), HookVerdict::Block);
    }

    #[test]
    fn test_only_blank_words_skip_the_filter() {
        let manager = manager(&[""]);
        let names: Vec<String> = manager.list_all().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["ChatLogger".to_string()]);
        assert_eq!(manager.on_parsed_msg_chat("alice", "anything"), HookVerdict::Allow);
    }
}
