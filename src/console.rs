//! Line grammar for the console host.

use hubhook_core::error::AppError;

/// One parsed stdin line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleLine {
    /// Blank line.
    Empty,
    /// `chat <nick> <text>`
    Chat { nick: String, text: String },
    /// `pm <nick> <to> <text>`
    Pm { nick: String, to: String, text: String },
    /// `login <nick>`
    Login { nick: String },
    /// `logout <nick>`
    Logout { nick: String },
    /// `cmd <nick> <class> <command...>`, raised as a hub command sent in PM.
    Command { nick: String, class: i32, command: String },
    /// `stats`, printed as JSON.
    Stats,
    /// `quit` or `exit`.
    Quit,
}

const USAGE: &str = "expected: chat <nick> <text> | pm <nick> <to> <text> | login <nick> \
                     | logout <nick> | cmd <nick> <class> <command...> | stats | quit";

/// Parses a console line.
pub fn parse(line: &str) -> Result<ConsoleLine, AppError> {
    let line = line.trim();
    let (verb, rest) = split_word(line);

    let parsed = match verb {
        "" => ConsoleLine::Empty,
        "stats" => ConsoleLine::Stats,
        "quit" | "exit" => ConsoleLine::Quit,
        "login" => ConsoleLine::Login {
            nick: required(rest)?.to_string(),
        },
        "logout" => ConsoleLine::Logout {
            nick: required(rest)?.to_string(),
        },
        "chat" => {
            let (nick, text) = split_word(rest);
            ConsoleLine::Chat {
                nick: required(nick)?.to_string(),
                text: text.to_string(),
            }
        }
        "pm" => {
            let (nick, rest) = split_word(rest);
            let (to, text) = split_word(rest);
            ConsoleLine::Pm {
                nick: required(nick)?.to_string(),
                to: required(to)?.to_string(),
                text: text.to_string(),
            }
        }
        "cmd" => {
            let (nick, rest) = split_word(rest);
            let (class, command) = split_word(rest);
            let class = required(class)?
                .parse()
                .map_err(|_| AppError::validation(format!("invalid user class '{class}'")))?;
            ConsoleLine::Command {
                nick: required(nick)?.to_string(),
                class,
                command: command.to_string(),
            }
        }
        other => {
            return Err(AppError::validation(format!(
                "unknown console command '{other}'; {USAGE}"
            )));
        }
    };

    Ok(parsed)
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}

fn required(word: &str) -> Result<&str, AppError> {
    if word.is_empty() {
        Err(AppError::validation(format!("missing argument; {USAGE}")))
    } else {
        Ok(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_keeps_spacing_in_text() {
        assert_eq!(
            parse("chat alice hello  there").expect("chat"),
            ConsoleLine::Chat {
                nick: "alice".into(),
                text: "hello  there".into()
            }
        );
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse("cmd root 10 dispatcher list").expect("cmd"),
            ConsoleLine::Command {
                nick: "root".into(),
                class: 10,
                command: "dispatcher list".into()
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("cmd root ten dispatcher list").is_err());
        assert!(parse("login").is_err());
        assert!(parse("pm alice").is_err());
        assert!(parse("dance").is_err());
        assert_eq!(parse("   ").expect("empty"), ConsoleLine::Empty);
    }
}
