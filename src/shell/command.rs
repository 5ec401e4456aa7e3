//! Command dispatcher - exact-match classification of a submitted line.
//!
//! The vocabulary is closed. Matching is case-sensitive and
//! whitespace-sensitive; anything that is not exactly a known command is
//! [`CommandOutcome::Unknown`], which is a normal outcome, not an error.

use std::borrow::Cow;

/// Known command lines, in the order `help` lists them.
pub const KNOWN_COMMANDS: [&str; 4] = ["cf status", "cf list", "help", "clear"];

/// Sites reported by `cf list`.
pub const DEPLOYED_SITES: [&str; 2] = ["example.com", "test.com"];

/// Classified result of a submitted line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    StatusOk,
    ListResult,
    HelpText,
    Cleared,
    Unknown(String),
}

/// Color category of an outcome message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Affirmative,
    Error,
    Informational,
    Neutral,
}

impl CommandOutcome {
    /// Classify a completed line. Never fails.
    pub fn classify(line: &str) -> Self {
        match line {
            "cf status" => Self::StatusOk,
            "cf list" => Self::ListResult,
            "help" => Self::HelpText,
            "clear" => Self::Cleared,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Message to display, `None` when the outcome shows nothing.
    pub fn message(&self) -> Option<Cow<'static, str>> {
        match self {
            Self::StatusOk => Some(Cow::Borrowed("✅ Cloudflare service is healthy, currently connected")),
            Self::ListResult => {
                let sites = DEPLOYED_SITES
                    .iter()
                    .enumerate()
                    .map(|(i, site)| format!("{}. {}", i + 1, site))
                    .collect::<Vec<_>>()
                    .join(" ");
                Some(Cow::Owned(format!("📋 Deployed sites: {sites}")))
            }
            Self::HelpText => Some(Cow::Owned(format!(
                "💡 Available commands: {}",
                KNOWN_COMMANDS.join(", ")
            ))),
            Self::Cleared => None,
            Self::Unknown(input) => Some(Cow::Owned(format!(
                "❌ Unknown command: {input}, type 'help' to see available commands"
            ))),
        }
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            Self::StatusOk => Some(Category::Affirmative),
            Self::ListResult => Some(Category::Informational),
            Self::HelpText => Some(Category::Neutral),
            Self::Cleared => None,
            Self::Unknown(_) => Some(Category::Error),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matches() {
        assert_eq!(CommandOutcome::classify("cf status"), CommandOutcome::StatusOk);
        assert_eq!(CommandOutcome::classify("cf list"), CommandOutcome::ListResult);
        assert_eq!(CommandOutcome::classify("help"), CommandOutcome::HelpText);
        assert_eq!(CommandOutcome::classify("clear"), CommandOutcome::Cleared);
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(
            CommandOutcome::classify("cf Status"),
            CommandOutcome::Unknown("cf Status".to_string())
        );
        assert!(CommandOutcome::classify("HELP").is_unknown());
    }

    #[test]
    fn test_whitespace_sensitive() {
        assert!(CommandOutcome::classify("help ").is_unknown());
        assert!(CommandOutcome::classify(" help").is_unknown());
        assert!(CommandOutcome::classify("cf  list").is_unknown());
    }

    #[test]
    fn test_no_prefix_matching() {
        assert!(CommandOutcome::classify("cf").is_unknown());
        assert!(CommandOutcome::classify("cf statuses").is_unknown());
    }

    #[test]
    fn test_empty_line_is_unknown() {
        assert_eq!(CommandOutcome::classify(""), CommandOutcome::Unknown(String::new()));
    }

    #[test]
    fn test_help_lists_all_commands() {
        let msg = CommandOutcome::HelpText.message().unwrap();
        assert!(msg.contains("cf status, cf list, help, clear"));
    }

    #[test]
    fn test_list_mentions_sites() {
        let msg = CommandOutcome::ListResult.message().unwrap();
        assert!(msg.contains("1. example.com"));
        assert!(msg.contains("2. test.com"));
    }

    #[test]
    fn test_unknown_embeds_input() {
        let msg = CommandOutcome::classify("xyz").message().unwrap();
        assert!(msg.contains("xyz"));
        assert!(msg.contains("help"));
    }

    #[test]
    fn test_categories() {
        assert_eq!(CommandOutcome::StatusOk.category(), Some(Category::Affirmative));
        assert_eq!(CommandOutcome::ListResult.category(), Some(Category::Informational));
        assert_eq!(CommandOutcome::HelpText.category(), Some(Category::Neutral));
        assert_eq!(CommandOutcome::Unknown("x".into()).category(), Some(Category::Error));
        assert_eq!(CommandOutcome::Cleared.category(), None);
        assert_eq!(CommandOutcome::Cleared.message(), None);
    }
}
