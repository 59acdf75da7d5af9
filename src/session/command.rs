//! Interactive command parsing for the watch session.

use crate::error::ToggleError;
use crate::types::{Mode, ToggleRequest};

pub const HELP_TEXT: &str = "\
Commands:
  comment [tags]     Comment out matching active blocks
  uncomment [tags]   Uncomment matching inactive blocks
  toggle [tags]      Flip every matching block
  list               Show tags with active/inactive counts
  help               Show this help
  exit               Stop watching

Tags: 'all' (default), a list like 'keep,temp', or exclusions like '!keep'.";

pub const USAGE_HINT: &str = "Type 'help' for the list of commands.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Apply(ToggleRequest),
    List,
    Help,
    Exit,
}

fn keyword(input: &str) -> Option<String> {
    input
        .split_whitespace()
        .next()
        .map(|word| word.to_ascii_lowercase())
}

/// True for the inputs that end the session.
pub fn is_exit_command(input: &str) -> bool {
    matches!(keyword(input).as_deref(), Some("exit" | "quit"))
}

/// Parse one line of input. Blank lines yield `None`.
pub fn parse_command(input: &str) -> Result<Option<Command>, ToggleError> {
    let Some(word) = keyword(input) else {
        return Ok(None);
    };

    let command = match word.as_str() {
        "list" => Command::List,
        "help" | "?" => Command::Help,
        "exit" | "quit" => Command::Exit,
        other => match Mode::from_keyword(other) {
            Some(mode) => {
                let args = input.trim_start()[word.len()..].trim();
                Command::Apply(parse_tag_spec(mode, args)?)
            }
            None => return Err(ToggleError::UnknownCommand(input.trim().to_string())),
        },
    };

    Ok(Some(command))
}

/// `all`, `keep,temp`, `keep temp` or `!keep,!temp`. Mixing plain and `!`
/// tags is a filter conflict.
fn parse_tag_spec(mode: Mode, spec: &str) -> Result<ToggleRequest, ToggleError> {
    let mut only = Vec::new();
    let mut except = Vec::new();

    for tag in spec
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        match tag.strip_prefix('!') {
            Some(excluded) => except.push(excluded),
            None => only.push(tag),
        }
    }

    ToggleRequest::new(mode, only, except)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Tag, TagFilter};
    use std::collections::BTreeSet;

    fn tags(names: &[&str]) -> BTreeSet<Tag> {
        names.iter().map(|n| Tag::new(n)).collect()
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("list").unwrap(), Some(Command::List));
        assert_eq!(parse_command("  HELP ").unwrap(), Some(Command::Help));
        assert_eq!(parse_command("Exit").unwrap(), Some(Command::Exit));
        assert_eq!(parse_command("quit").unwrap(), Some(Command::Exit));
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_apply_all() {
        for input in ["toggle", "toggle all", "TOGGLE ALL"] {
            assert_eq!(
                parse_command(input).unwrap(),
                Some(Command::Apply(ToggleRequest::all(Mode::Toggle)))
            );
        }
    }

    #[test]
    fn test_parse_apply_with_tags() {
        let Some(Command::Apply(request)) = parse_command("comment keep, temp").unwrap() else {
            panic!("Expected Apply")
        };
        assert_eq!(request.mode, Mode::Comment);
        assert_eq!(request.filter, TagFilter::Only(tags(&["keep", "temp"])));

        let Some(Command::Apply(request)) = parse_command("uncomment !keep").unwrap() else {
            panic!("Expected Apply")
        };
        assert_eq!(request.mode, Mode::Uncomment);
        assert_eq!(request.filter, TagFilter::Except(tags(&["keep"])));
    }

    #[test]
    fn test_parse_tags_are_case_sensitive() {
        let Some(Command::Apply(request)) = parse_command("COMMENT Keep").unwrap() else {
            panic!("Expected Apply")
        };
        assert_eq!(request.filter, TagFilter::Only(tags(&["Keep"])));
    }

    #[test]
    fn test_parse_filter_conflict() {
        assert!(matches!(
            parse_command("toggle keep,!temp"),
            Err(ToggleError::FilterConflict)
        ));
    }

    #[test]
    fn test_parse_excluding_all_is_rejected() {
        for input in ["comment !all", "toggle !ALL"] {
            assert!(matches!(
                parse_command(input),
                Err(ToggleError::ExcludeAll)
            ));
        }
    }

    #[test]
    fn test_parse_unknown_command() {
        let err = parse_command("flip everything").unwrap_err();
        assert!(matches!(err, ToggleError::UnknownCommand(ref s) if s == "flip everything"));
    }

    #[test]
    fn test_is_exit_command() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command(" QUIT "));
        assert!(!is_exit_command("exiting"));
        assert!(!is_exit_command(""));
    }
}
