//! REPL command parsing.

use opsdesk_core::session::SessionId;

/// Slash commands offered for completion.
pub const COMMANDS: &[&str] = &[
    "/deepthink",
    "/approve",
    "/new",
    "/sessions",
    "/load",
    "/phase",
    "/html",
    "/quit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free text for a new turn.
    Say(String),
    DeepThink(bool),
    Approve,
    NewSession,
    ListSessions,
    Load(SessionId),
    Phase,
    Html,
    Quit,
}

/// Parses one input line. Blank input yields `Ok(None)`.
///
/// Errors carry a usage message for the user.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if !trimmed.starts_with('/') {
        return Ok(Some(Command::Say(trimmed.to_string())));
    }

    let mut parts = trimmed.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    let command = match (name, arg) {
        ("/deepthink", Some("on")) => Command::DeepThink(true),
        ("/deepthink", Some("off")) => Command::DeepThink(false),
        ("/deepthink", _) => return Err("Usage: /deepthink on|off".to_string()),
        ("/approve", None) => Command::Approve,
        ("/new", None) => Command::NewSession,
        ("/sessions", None) => Command::ListSessions,
        ("/load", Some(id)) => match id.parse::<u64>() {
            Ok(id) => Command::Load(SessionId(id)),
            Err(_) => return Err(format!("Invalid session id: {id}")),
        },
        ("/load", None) => return Err("Usage: /load <id>".to_string()),
        ("/phase", None) => Command::Phase,
        ("/html", None) => Command::Html,
        ("/quit" | "/exit", None) => Command::Quit,
        _ => return Err(format!("Unknown command: {trimmed}")),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_text_is_a_turn() {
        assert_eq!(
            parse("  check stock levels ").unwrap(),
            Some(Command::Say("check stock levels".to_string()))
        );
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(parse("/deepthink on").unwrap(), Some(Command::DeepThink(true)));
        assert_eq!(parse("/deepthink off").unwrap(), Some(Command::DeepThink(false)));
        assert_eq!(parse("/load 42").unwrap(), Some(Command::Load(SessionId(42))));
        assert_eq!(parse("/exit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse("/deepthink maybe").is_err());
        assert!(parse("/load abc").is_err());
        assert!(parse("/load").is_err());
        assert!(parse("/approve now").is_err());
        assert!(parse("/unknown").is_err());
    }
}
