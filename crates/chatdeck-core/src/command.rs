//! Prefix command grammar
//!
//! Inbound message bodies that start with the configured prefix are parsed
//! into a [`Command`]. Everything else is plain chat and never reaches the
//! dispatcher.

use serde::{Deserialize, Serialize};

// ----------------------------------------------------------------------------
// Command
// ----------------------------------------------------------------------------

/// A parsed prefix command from an inbound message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Lowercased command name (may be empty for a bare prefix)
    pub name: String,
    /// Argument tokens in their original case
    pub args: Vec<String>,
    /// The full original message body
    pub raw_text: String,
    /// Bare sender number the command arrived from
    pub sender_id: String,
}

/// Parse a message body against the command prefix.
///
/// Returns `None` when the body does not start with the prefix. The name is
/// the first whitespace-separated token after the prefix, lowercased;
/// remaining tokens become args with their case preserved. A bare prefix
/// parses to an empty name, which the dispatcher treats as unknown.
pub fn parse_command(prefix: &str, body: &str, sender_id: &str) -> Option<Command> {
    let rest = body.strip_prefix(prefix)?;
    let mut tokens = rest.trim().split_whitespace();
    let name = tokens.next().unwrap_or("").to_lowercase();
    let args: Vec<String> = tokens.map(str::to_string).collect();

    Some(Command {
        name,
        args,
        raw_text: body.to_string(),
        sender_id: sender_id.to_string(),
    })
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_basic_command() {
        let cmd = parse_command("!", "!ping", "+15551234567").unwrap();
        assert_eq!(cmd.name, "ping");
        assert!(cmd.args.is_empty());
        assert_eq!(cmd.raw_text, "!ping");
        assert_eq!(cmd.sender_id, "+15551234567");
    }

    #[test]
    fn test_parse_name_lowercased_args_preserved() {
        let cmd = parse_command("!", "!ECHO Hello World", "+1").unwrap();
        assert_eq!(cmd.name, "echo");
        assert_eq!(cmd.args, vec!["Hello", "World"]);
    }

    #[test]
    fn test_parse_collapses_whitespace() {
        let cmd = parse_command("!", "!echo   a\t b ", "+1").unwrap();
        assert_eq!(cmd.args, vec!["a", "b"]);
    }

    #[test]
    fn test_non_prefixed_body_is_not_a_command() {
        assert!(parse_command("!", "hello there", "+1").is_none());
        assert!(parse_command("!", " !ping", "+1").is_none());
        assert!(parse_command("!", "", "+1").is_none());
    }

    #[test]
    fn test_bare_prefix_parses_to_empty_name() {
        let cmd = parse_command("!", "!", "+1").unwrap();
        assert_eq!(cmd.name, "");
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn test_custom_prefix() {
        let cmd = parse_command("##", "##ping", "+1").unwrap();
        assert_eq!(cmd.name, "ping");
        assert!(parse_command("##", "!ping", "+1").is_none());
    }

    proptest! {
        #[test]
        fn prop_non_prefixed_never_parses(body in "[^!].*") {
            prop_assert!(parse_command("!", &body, "+1").is_none());
        }

        #[test]
        fn prop_parsed_name_is_lowercase(word in "[A-Za-z]{1,16}", args in "[ -~]{0,40}") {
            let body = format!("!{word} {args}");
            let cmd = parse_command("!", &body, "+1").unwrap();
            prop_assert_eq!(cmd.name, word.to_lowercase());
        }
    }
}
