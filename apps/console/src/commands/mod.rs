//! Console command parsing and handlers.

pub mod login;
pub mod navigation;
pub mod session;

use crate::error::ConsoleError;

use common::ErrorLocation;

use std::panic::Location;

pub const HELP_TEXT: &str = "\
Commands:
  pin <digits>        submit the PIN (step 1)
  password <text>     submit the password (step 2)
  back                return to the PIN step
  reset               clear the login form
  open <path>         navigate, e.g. open /shell/guests
  get <path>          GET a data-provider resource as JSON
  whoami              show the signed-in user
  status              show environment, route and connectivity
  online | offline    simulate connectivity changes
  logout              clear the session
  help                show this text
  quit                leave the console";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Pin(String),
    Password(String),
    Back,
    Reset,
    Open(String),
    Get(String),
    WhoAmI,
    Status,
    SetOnline(bool),
    Logout,
    Help,
    Quit,
    Empty,
}

impl ConsoleCommand {
    /// Parse a line. The argument is everything after the first word, so a
    /// password may contain spaces. PINs and passwords are passed through
    /// untrimmed apart from the separating space.
    #[track_caller]
    pub fn parse(line: &str) -> Result<Self, ConsoleError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim_start();
        if trimmed.trim().is_empty() {
            return Ok(ConsoleCommand::Empty);
        }

        let (word, rest) = match trimmed.split_once(' ') {
            Some((word, rest)) => (word, rest),
            None => (trimmed, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "pin" => ConsoleCommand::Pin(rest.to_string()),
            "password" | "pw" => ConsoleCommand::Password(rest.to_string()),
            "back" => ConsoleCommand::Back,
            "reset" => ConsoleCommand::Reset,
            "open" | "go" => ConsoleCommand::Open(required(word, rest)?),
            "get" => ConsoleCommand::Get(required(word, rest)?),
            "whoami" => ConsoleCommand::WhoAmI,
            "status" => ConsoleCommand::Status,
            "online" => ConsoleCommand::SetOnline(true),
            "offline" => ConsoleCommand::SetOnline(false),
            "logout" => ConsoleCommand::Logout,
            "help" | "?" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            other => {
                return Err(ConsoleError::Usage {
                    message: format!("Unknown command '{other}', type 'help'"),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        Ok(command)
    }
}

#[track_caller]
fn required(word: &str, rest: &str) -> Result<String, ConsoleError> {
    let value = rest.trim();
    if value.is_empty() {
        return Err(ConsoleError::Usage {
            message: format!("'{word}' needs a path"),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(value.to_string())
}
