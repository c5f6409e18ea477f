//! One entry point per event kind, forwarding the host's arguments unchanged.

use super::definitions::{HookEvent, HookVerdict};
use crate::manager::ScriptManager;

impl ScriptManager {
    /// Raises `OnTimer`. `msec` is forwarded as given.
    pub fn on_timer(&self, msec: u64) -> HookVerdict {
        self.dispatch(&HookEvent::OnTimer { msec })
    }

    /// Raises `OnParsedMsgChat`.
    pub fn on_parsed_msg_chat(&self, nick: &str, message: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnParsedMsgChat {
            nick: nick.to_string(),
            message: message.to_string(),
        })
    }

    /// Raises `OnParsedMsgPM` for a message from `nick` to `other_nick`.
    pub fn on_parsed_msg_pm(&self, nick: &str, message: &str, other_nick: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnParsedMsgPM {
            nick: nick.to_string(),
            message: message.to_string(),
            other_nick: other_nick.to_string(),
        })
    }

    /// Raises `OnParsedMsgSearch`.
    pub fn on_parsed_msg_search(&self, nick: &str, query: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnParsedMsgSearch {
            nick: nick.to_string(),
            query: query.to_string(),
        })
    }

    /// Raises `OnParsedMsgSR`.
    pub fn on_parsed_msg_sr(&self, nick: &str, result: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnParsedMsgSR {
            nick: nick.to_string(),
            result: result.to_string(),
        })
    }

    /// Raises `OnParsedMsgMyINFO`.
    pub fn on_parsed_msg_my_info(&self, nick: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnParsedMsgMyINFO {
            nick: nick.to_string(),
        })
    }

    /// Raises `OnParsedMsgValidateNick`.
    pub fn on_parsed_msg_validate_nick(&self, nick: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnParsedMsgValidateNick {
            nick: nick.to_string(),
        })
    }

    /// Raises `OnParsedMsgConnectToMe`.
    pub fn on_parsed_msg_connect_to_me(&self, nick: &str, ip: &str, port: u16) -> HookVerdict {
        self.dispatch(&HookEvent::OnParsedMsgConnectToMe {
            nick: nick.to_string(),
            ip: ip.to_string(),
            port,
        })
    }

    /// Raises `OnParsedMsgRevConnectToMe`.
    pub fn on_parsed_msg_rev_connect_to_me(&self, nick: &str, other_nick: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnParsedMsgRevConnectToMe {
            nick: nick.to_string(),
            other_nick: other_nick.to_string(),
        })
    }

    /// Raises `OnParsedMsgSupports`.
    pub fn on_parsed_msg_supports(&self, ip: &str, message: &str, back: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnParsedMsgSupports {
            ip: ip.to_string(),
            message: message.to_string(),
            back: back.to_string(),
        })
    }

    /// Raises `OnUserLogin`.
    pub fn on_user_login(&self, nick: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnUserLogin {
            nick: nick.to_string(),
        })
    }

    /// Raises `OnUserLogout`.
    pub fn on_user_logout(&self, nick: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnUserLogout {
            nick: nick.to_string(),
        })
    }

    /// Raises `OnUserDisconnected`.
    pub fn on_user_disconnected(&self, nick: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnUserDisconnected {
            nick: nick.to_string(),
        })
    }

    /// Raises `OnNewConn`.
    pub fn on_new_conn(&self, ip: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnNewConn { ip: ip.to_string() })
    }

    /// Raises `OnCloseConn`.
    pub fn on_close_conn(&self, ip: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnCloseConn { ip: ip.to_string() })
    }

    /// Generic hub command. Registered handlers see it first; if none blocks
    /// it, the administrative surface gets a chance to claim it.
    pub fn on_hub_command(
        &self,
        nick: &str,
        command: &str,
        user_class: i32,
        in_pm: bool,
        prefix: &str,
    ) -> HookVerdict {
        let verdict = self.dispatch(&HookEvent::OnHubCommand {
            nick: nick.to_string(),
            command: command.to_string(),
            user_class,
            in_pm,
            prefix: prefix.to_string(),
        });
        if verdict.is_block() {
            return verdict;
        }

        self.admin.handle(nick, command, user_class, prefix)
    }

    /// Raises `OnOperatorCommand`. Administrative commands are only
    /// recognized on the generic hub command path.
    pub fn on_operator_command(
        &self,
        nick: &str,
        command: &str,
        user_class: i32,
        in_pm: bool,
    ) -> HookVerdict {
        self.dispatch(&HookEvent::OnOperatorCommand {
            nick: nick.to_string(),
            command: command.to_string(),
            user_class,
            in_pm,
        })
    }

    /// Raises `OnOperatorKicks`.
    pub fn on_operator_kicks(&self, op_nick: &str, nick: &str, reason: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnOperatorKicks {
            op_nick: op_nick.to_string(),
            nick: nick.to_string(),
            reason: reason.to_string(),
        })
    }

    /// Raises `OnOperatorDrops`.
    pub fn on_operator_drops(&self, op_nick: &str, nick: &str, reason: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnOperatorDrops {
            op_nick: op_nick.to_string(),
            nick: nick.to_string(),
            reason: reason.to_string(),
        })
    }

    /// Raises `OnValidateTag`.
    pub fn on_validate_tag(&self, nick: &str, tag: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnValidateTag {
            nick: nick.to_string(),
            tag: tag.to_string(),
        })
    }

    /// Raises `OnUserInList`.
    pub fn on_user_in_list(&self, nick: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnUserInList {
            nick: nick.to_string(),
        })
    }

    /// Raises `OnUnknownMsg`.
    pub fn on_unknown_msg(&self, nick: &str, message: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnUnknownMsg {
            nick: nick.to_string(),
            message: message.to_string(),
        })
    }

    /// Raises `OnFlood`.
    pub fn on_flood(&self, nick: &str, message: &str) -> HookVerdict {
        self.dispatch(&HookEvent::OnFlood {
            nick: nick.to_string(),
            message: message.to_string(),
        })
    }
}
