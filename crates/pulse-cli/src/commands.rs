//! Shell command parsing

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty input")]
    Empty,

    #[error("Missing text for /search")]
    MissingQuery,

    #[error("Unknown command: /{0} (type /help)")]
    Unknown(String),
}

/// Parsed command from a shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Analyze a custom query
    Search { query: String },
    /// Re-run the current query
    Refresh,
    /// Hide the error banner
    Dismiss,
    /// Print the current result as JSON
    Json,
    /// Show help
    Help,
    /// Leave the shell
    Quit,
}

impl Command {
    /// Parse a line; text without a leading `/` is a search
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim();

        if input.is_empty() {
            return Err(CommandError::Empty);
        }

        let Some(body) = input.strip_prefix('/') else {
            return Ok(Command::Search {
                query: input.to_string(),
            });
        };

        let (name, rest) = body
            .split_once(char::is_whitespace)
            .map_or((body, ""), |(name, rest)| (name, rest.trim()));

        match name.to_lowercase().as_str() {
            "search" | "s" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingQuery);
                }
                Ok(Command::Search {
                    query: rest.to_string(),
                })
            }
            "refresh" | "r" => Ok(Command::Refresh),
            "dismiss" | "d" => Ok(Command::Dismiss),
            "json" | "j" => Ok(Command::Json),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    pub fn help_text() -> &'static str {
        r"
Commands:
  /search <text>   Analyze sentiment for a ticker, sector or event
  <text>           Same as /search
  /refresh         Re-run the current query
  /dismiss         Hide the error banner
  /json            Print the current analysis as JSON
  /help            Show this help
  /quit            Exit

Aliases: /s /r /d /j /h /q
"
    }
}
