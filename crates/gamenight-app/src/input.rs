// Line input parsing: turns one line typed at the console into a UserCommand.

use gamenight_core::session::PlayerId;
use thiserror::Error;

use crate::protocol::UserCommand;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("empty input")]
    Empty,

    #[error("unknown command `{0}` (type `help`)")]
    UnknownCommand(String),

    #[error("`{command}` needs a {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("invalid {argument} `{value}`")]
    InvalidNumber {
        argument: &'static str,
        value: String,
    },
}

/// Parse a console line.
///
/// Game titles and player names take the rest of the line, so they may
/// contain spaces. Table numbers are one-based on input.
pub fn parse_command(line: &str) -> Result<UserCommand, InputError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "" => Err(InputError::Empty),
        "add" => {
            // Last token is the icon when it is not alphanumeric (an emoji).
            let (name, icon) = match rest.rsplit_once(char::is_whitespace) {
                Some((n, i)) if !i.chars().any(char::is_alphanumeric) => (n.trim(), i),
                _ => (rest, ""),
            };
            if name.is_empty() {
                return Err(InputError::MissingArgument {
                    command: "add",
                    argument: "name",
                });
            }
            Ok(UserCommand::AddPlayer {
                name: name.to_string(),
                icon: icon.to_string(),
            })
        }
        "remove" | "rm" => Ok(UserCommand::RemovePlayer(player_arg("remove", rest)?)),
        "pick" => {
            let (player, game) = player_and_rest("pick", rest, "game")?;
            Ok(UserCommand::TogglePick { player, game })
        }
        "start" => Ok(UserCommand::StartFirstRound),
        "table" | "open" => {
            let (host, game) = player_and_rest("table", rest, "game")?;
            Ok(UserCommand::OpenTable { host, game })
        }
        "seat" | "join" => {
            let (player, table) = player_and_rest("seat", rest, "table number")?;
            Ok(UserCommand::Seat {
                player,
                table: table_arg(&table)?,
            })
        }
        "unseat" | "leave" => Ok(UserCommand::Unseat(player_arg("unseat", rest)?)),
        "close" => {
            if rest.is_empty() {
                return Err(InputError::MissingArgument {
                    command: "close",
                    argument: "table number",
                });
            }
            Ok(UserCommand::CloseTable(table_arg(rest)?))
        }
        "done" | "complete" => Ok(UserCommand::CompleteRound),
        "next" => Ok(UserCommand::NextRound),
        "status" | "s" => Ok(UserCommand::Status),
        "help" | "h" | "?" => Ok(UserCommand::Help),
        "quit" | "q" | "exit" => Ok(UserCommand::Quit),
        other => Err(InputError::UnknownCommand(other.to_string())),
    }
}

fn player_arg(command: &'static str, arg: &str) -> Result<PlayerId, InputError> {
    if arg.is_empty() {
        return Err(InputError::MissingArgument {
            command,
            argument: "player id",
        });
    }
    arg.parse::<u32>()
        .map(PlayerId)
        .map_err(|_| InputError::InvalidNumber {
            argument: "player id",
            value: arg.to_string(),
        })
}

fn player_and_rest(
    command: &'static str,
    rest: &str,
    argument: &'static str,
) -> Result<(PlayerId, String), InputError> {
    let (id, tail) = match rest.split_once(char::is_whitespace) {
        Some((id, tail)) => (id, tail.trim()),
        None => (rest, ""),
    };
    let player = player_arg(command, id)?;
    if tail.is_empty() {
        return Err(InputError::MissingArgument { command, argument });
    }
    Ok((player, tail.to_string()))
}

/// One-based table number -> zero-based index.
fn table_arg(arg: &str) -> Result<usize, InputError> {
    match arg.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(InputError::InvalidNumber {
            argument: "table number",
            value: arg.to_string(),
        }),
    }
}
