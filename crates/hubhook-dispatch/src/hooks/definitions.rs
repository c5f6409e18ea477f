//! Event kind definitions with typed payloads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Enumeration of every hook the host raises.
///
/// Variant names match the host's hook names so that binding layers holding
/// free-text names can map into the enum with [`EventKind::from_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    // ── Timer ──
    /// Periodic timer tick.
    OnTimer,

    // ── Protocol messages ──
    /// Main chat broadcast.
    OnParsedMsgChat,
    /// Private message between two users.
    OnParsedMsgPM,
    /// Search request.
    OnParsedMsgSearch,
    /// Search result.
    OnParsedMsgSR,
    /// Info broadcast.
    OnParsedMsgMyINFO,
    /// Nick validation request.
    OnParsedMsgValidateNick,
    /// Active connection negotiation.
    OnParsedMsgConnectToMe,
    /// Passive connection negotiation.
    OnParsedMsgRevConnectToMe,
    /// Capability exchange.
    OnParsedMsgSupports,

    // ── Users and connections ──
    /// User finished logging in.
    OnUserLogin,
    /// User logged out.
    OnUserLogout,
    /// User dropped without logging out.
    OnUserDisconnected,
    /// New connection accepted.
    OnNewConn,
    /// Connection closed.
    OnCloseConn,

    // ── Commands ──
    /// Generic hub command.
    OnHubCommand,
    /// Operator-only command.
    OnOperatorCommand,
    /// Operator kicked a user.
    OnOperatorKicks,
    /// Operator dropped a user.
    OnOperatorDrops,

    // ── Validation and misc ──
    /// Client tag validation.
    OnValidateTag,
    /// User added to the roster.
    OnUserInList,
    /// Message the protocol parser did not recognize.
    OnUnknownMsg,
    /// Flood protection triggered.
    OnFlood,
}

impl EventKind {
    /// Number of event kinds.
    pub const COUNT: usize = 23;

    /// All event kinds in declaration order.
    pub const ALL: [EventKind; Self::COUNT] = [
        Self::OnTimer,
        Self::OnParsedMsgChat,
        Self::OnParsedMsgPM,
        Self::OnParsedMsgSearch,
        Self::OnParsedMsgSR,
        Self::OnParsedMsgMyINFO,
        Self::OnParsedMsgValidateNick,
        Self::OnParsedMsgConnectToMe,
        Self::OnParsedMsgRevConnectToMe,
        Self::OnParsedMsgSupports,
        Self::OnUserLogin,
        Self::OnUserLogout,
        Self::OnUserDisconnected,
        Self::OnNewConn,
        Self::OnCloseConn,
        Self::OnHubCommand,
        Self::OnOperatorCommand,
        Self::OnOperatorKicks,
        Self::OnOperatorDrops,
        Self::OnValidateTag,
        Self::OnUserInList,
        Self::OnUnknownMsg,
        Self::OnFlood,
    ];

    /// Returns the host's name for this hook.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTimer => "OnTimer",
            Self::OnParsedMsgChat => "OnParsedMsgChat",
            Self::OnParsedMsgPM => "OnParsedMsgPM",
            Self::OnParsedMsgSearch => "OnParsedMsgSearch",
            Self::OnParsedMsgSR => "OnParsedMsgSR",
            Self::OnParsedMsgMyINFO => "OnParsedMsgMyINFO",
            Self::OnParsedMsgValidateNick => "OnParsedMsgValidateNick",
            Self::OnParsedMsgConnectToMe => "OnParsedMsgConnectToMe",
            Self::OnParsedMsgRevConnectToMe => "OnParsedMsgRevConnectToMe",
            Self::OnParsedMsgSupports => "OnParsedMsgSupports",
            Self::OnUserLogin => "OnUserLogin",
            Self::OnUserLogout => "OnUserLogout",
            Self::OnUserDisconnected => "OnUserDisconnected",
            Self::OnNewConn => "OnNewConn",
            Self::OnCloseConn => "OnCloseConn",
            Self::OnHubCommand => "OnHubCommand",
            Self::OnOperatorCommand => "OnOperatorCommand",
            Self::OnOperatorKicks => "OnOperatorKicks",
            Self::OnOperatorDrops => "OnOperatorDrops",
            Self::OnValidateTag => "OnValidateTag",
            Self::OnUserInList => "OnUserInList",
            Self::OnUnknownMsg => "OnUnknownMsg",
            Self::OnFlood => "OnFlood",
        }
    }

    /// Dense index of this kind, usable for fixed-size per-kind tables.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a hook name is not one of the fixed event kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown hook name '{0}'")]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

/// An event raised by the host, carrying the argument tuple of its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "hook")]
pub enum HookEvent {
    /// Periodic timer tick; `msec` is the interval since the previous tick.
    OnTimer {
        msec: u64,
    },
    /// Main chat broadcast from `nick`.
    OnParsedMsgChat {
        nick: String,
        message: String,
    },
    /// Private message from `nick` to `other_nick`.
    OnParsedMsgPM {
        nick: String,
        message: String,
        other_nick: String,
    },
    /// Search request.
    OnParsedMsgSearch {
        nick: String,
        query: String,
    },
    /// Search result.
    OnParsedMsgSR {
        nick: String,
        result: String,
    },
    /// Info broadcast.
    OnParsedMsgMyINFO {
        nick: String,
    },
    /// Nick validation request.
    OnParsedMsgValidateNick {
        nick: String,
    },
    /// Active connection request towards `ip:port`.
    OnParsedMsgConnectToMe {
        nick: String,
        ip: String,
        port: u16,
    },
    /// Passive connection request from `nick` to `other_nick`.
    OnParsedMsgRevConnectToMe {
        nick: String,
        other_nick: String,
    },
    /// Capability exchange; `back` is the hub's reply.
    OnParsedMsgSupports {
        ip: String,
        message: String,
        back: String,
    },
    /// User finished logging in.
    OnUserLogin {
        nick: String,
    },
    /// User logged out.
    OnUserLogout {
        nick: String,
    },
    /// User dropped without logging out.
    OnUserDisconnected {
        nick: String,
    },
    /// New connection accepted from `ip`.
    OnNewConn {
        ip: String,
    },
    /// Connection from `ip` closed.
    OnCloseConn {
        ip: String,
    },
    /// Generic hub command. `prefix` is the trigger character the user typed.
    OnHubCommand {
        nick: String,
        command: String,
        user_class: i32,
        in_pm: bool,
        prefix: String,
    },
    /// Operator-only command.
    OnOperatorCommand {
        nick: String,
        command: String,
        user_class: i32,
        in_pm: bool,
    },
    /// `op_nick` kicked `nick`.
    OnOperatorKicks {
        op_nick: String,
        nick: String,
        reason: String,
    },
    /// `op_nick` dropped `nick`.
    OnOperatorDrops {
        op_nick: String,
        nick: String,
        reason: String,
    },
    /// Client tag validation.
    OnValidateTag {
        nick: String,
        tag: String,
    },
    /// User added to the roster.
    OnUserInList {
        nick: String,
    },
    /// Message the protocol parser did not recognize.
    OnUnknownMsg {
        nick: String,
        message: String,
    },
    /// Flood protection triggered by `nick`.
    OnFlood {
        nick: String,
        message: String,
    },
}

impl HookEvent {
    /// Returns the kind this event is dispatched under.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::OnTimer { .. } => EventKind::OnTimer,
            Self::OnParsedMsgChat { .. } => EventKind::OnParsedMsgChat,
            Self::OnParsedMsgPM { .. } => EventKind::OnParsedMsgPM,
            Self::OnParsedMsgSearch { .. } => EventKind::OnParsedMsgSearch,
            Self::OnParsedMsgSR { .. } => EventKind::OnParsedMsgSR,
            Self::OnParsedMsgMyINFO { .. } => EventKind::OnParsedMsgMyINFO,
            Self::OnParsedMsgValidateNick { .. } => EventKind::OnParsedMsgValidateNick,
            Self::OnParsedMsgConnectToMe { .. } => EventKind::OnParsedMsgConnectToMe,
            Self::OnParsedMsgRevConnectToMe { .. } => EventKind::OnParsedMsgRevConnectToMe,
            Self::OnParsedMsgSupports { .. } => EventKind::OnParsedMsgSupports,
            Self::OnUserLogin { .. } => EventKind::OnUserLogin,
            Self::OnUserLogout { .. } => EventKind::OnUserLogout,
            Self::OnUserDisconnected { .. } => EventKind::OnUserDisconnected,
            Self::OnNewConn { .. } => EventKind::OnNewConn,
            Self::OnCloseConn { .. } => EventKind::OnCloseConn,
            Self::OnHubCommand { .. } => EventKind::OnHubCommand,
            Self::OnOperatorCommand { .. } => EventKind::OnOperatorCommand,
            Self::OnOperatorKicks { .. } => EventKind::OnOperatorKicks,
            Self::OnOperatorDrops { .. } => EventKind::OnOperatorDrops,
            Self::OnValidateTag { .. } => EventKind::OnValidateTag,
            Self::OnUserInList { .. } => EventKind::OnUserInList,
            Self::OnUnknownMsg { .. } => EventKind::OnUnknownMsg,
            Self::OnFlood { .. } => EventKind::OnFlood,
        }
    }

    /// Returns the nick of the user that raised this event, if it has one.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Self::OnTimer { .. }
            | Self::OnParsedMsgSupports { .. }
            | Self::OnNewConn { .. }
            | Self::OnCloseConn { .. } => None,
            Self::OnOperatorKicks { op_nick, .. } | Self::OnOperatorDrops { op_nick, .. } => {
                Some(op_nick.as_str())
            }
            Self::OnParsedMsgChat { nick, .. }
            | Self::OnParsedMsgPM { nick, .. }
            | Self::OnParsedMsgSearch { nick, .. }
            | Self::OnParsedMsgSR { nick, .. }
            | Self::OnParsedMsgMyINFO { nick }
            | Self::OnParsedMsgValidateNick { nick }
            | Self::OnParsedMsgConnectToMe { nick, .. }
            | Self::OnParsedMsgRevConnectToMe { nick, .. }
            | Self::OnUserLogin { nick }
            | Self::OnUserLogout { nick }
            | Self::OnUserDisconnected { nick }
            | Self::OnHubCommand { nick, .. }
            | Self::OnOperatorCommand { nick, .. }
            | Self::OnValidateTag { nick, .. }
            | Self::OnUserInList { nick }
            | Self::OnUnknownMsg { nick, .. }
            | Self::OnFlood { nick, .. } => Some(nick.as_str()),
        }
    }
}

/// Outcome of a dispatch: whether the host lets the event through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookVerdict {
    /// Pass the event through.
    #[default]
    Allow,
    /// Consume the event; no later handler runs.
    Block,
}

impl HookVerdict {
    /// Interprets a host integer: `0` blocks, anything else allows.
    pub fn from_code(code: i32) -> Self {
        if code == 0 { Self::Block } else { Self::Allow }
    }

    /// Integer form for hosts: `1` for allow, `0` for block.
    pub fn code(&self) -> i32 {
        match self {
            Self::Allow => 1,
            Self::Block => 0,
        }
    }

    /// Returns whether this verdict blocks the event.
    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block)
    }
}

impl fmt::Display for HookVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Block => write!(f, "block"),
        }
    }
}

/// Failure raised by handler or cleanup code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// The handler reported a failure.
    #[error("{0}")]
    Failed(String),
    /// The handler panicked; the payload message is preserved when it is a string.
    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HookError {
    /// Creates a failure with the given message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Builds a `Panicked` error from a `catch_unwind` payload.
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked(message)
    }
}

/// What a handler returns.
pub type HandlerResult = Result<HookVerdict, HookError>;
