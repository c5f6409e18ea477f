//! Grammar for the administrative hub command.
//!
//! ```text
//! <word> list | stats | help | enable <id> | disable <id>
//! ```
//!
//! `<word>` is configurable (default `dispatcher`). Subcommands are matched
//! case-insensitively; trailing tokens are ignored.

use thiserror::Error;

use crate::registry::ScriptId;

/// A parsed administrative subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    /// List every registration.
    List,
    /// Show statistics.
    Stats,
    /// Enable a registration.
    Enable(ScriptId),
    /// Disable a registration.
    Disable(ScriptId),
    /// Show the command summary.
    Help,
}

/// Why an administrative command could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminParseError {
    /// Nothing after the command word.
    #[error("missing subcommand")]
    MissingSubcommand,
    /// `enable` / `disable` without an id.
    #[error("'{0}' requires a script id")]
    MissingId(String),
    /// The id is not a non-negative integer.
    #[error("invalid script id '{0}'")]
    InvalidId(String),
    /// Subcommand not in the grammar.
    #[error("unknown subcommand '{0}'")]
    Unknown(String),
}

impl AdminCommand {
    /// Parses `text` as an administrative command.
    ///
    /// Returns `Ok(None)` when the first word is not `word`, meaning the text
    /// belongs to someone else.
    pub fn parse(text: &str, word: &str) -> Result<Option<Self>, AdminParseError> {
        let mut parts = text.split_whitespace();

        if parts.next() != Some(word) {
            return Ok(None);
        }

        let Some(sub) = parts.next() else {
            return Err(AdminParseError::MissingSubcommand);
        };
        let sub = sub.to_lowercase();

        let command = match sub.as_str() {
            "list" => Self::List,
            "stats" => Self::Stats,
            "help" => Self::Help,
            "enable" => Self::Enable(parse_id(&sub, parts.next())?),
            "disable" => Self::Disable(parse_id(&sub, parts.next())?),
            _ => return Err(AdminParseError::Unknown(sub)),
        };

        Ok(Some(command))
    }
}

fn parse_id(sub: &str, raw: Option<&str>) -> Result<ScriptId, AdminParseError> {
    let raw = raw.ok_or_else(|| AdminParseError::MissingId(sub.to_string()))?;
    raw.parse()
        .map_err(|_| AdminParseError::InvalidId(raw.to_string()))
}
