// Line-oriented console front end.
//
// Reads commands from stdin, forwards them to the app loop, and prints every
// UiUpdate it receives. Rendering is plain text so it can be tested directly.

use std::fmt::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::input::{parse_command, InputError};
use crate::protocol::{AppSnapshot, UiUpdate, UserCommand};

pub const HELP_TEXT: &str = "\
Commands:
  add <name> [icon]        add a player (setup only)
  remove <id>              remove a player (setup only)
  pick <id> <game>         add or drop one of a player's two picks
  start                    start the first round
  table <host-id> <game>   open a table for one of the host's picks
  seat <id> <table>        seat a player at a table
  unseat <id>              take a guest off their table
  close <table>            close a table; its game goes back in play
  done                     finish the current round (everyone seated)
  next                     start the next round, or finish the session
  status                   show the session
  help                     show this list
  quit                     leave";

/// Run the console until the user quits, stdin closes, or the app loop
/// stops sending updates.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(update) => println!("{}", render_update(&update)),
                    None => {
                        info!("UI channel closed, console exiting");
                        break;
                    }
                }
            }

            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed, requesting shutdown");
                    let _ = cmd_tx.send(UserCommand::Quit).await;
                    break;
                };
                match parse_command(&line) {
                    Ok(UserCommand::Quit) => {
                        let _ = cmd_tx.send(UserCommand::Quit).await;
                        break;
                    }
                    Ok(cmd) => {
                        debug!(?cmd, "Parsed command");
                        if cmd_tx.send(cmd).await.is_err() {
                            break;
                        }
                    }
                    Err(InputError::Empty) => {}
                    Err(e) => println!("! {e}"),
                }
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn render_update(update: &UiUpdate) -> String {
    match update {
        UiUpdate::StateSnapshot(snapshot) => render_snapshot(snapshot),
        UiUpdate::Notice(msg) => format!("> {msg}"),
        UiUpdate::Rejected(reason) => format!("! {reason}"),
        UiUpdate::Help => HELP_TEXT.to_string(),
    }
}

pub fn render_snapshot(snapshot: &AppSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} :: {} ==", snapshot.session_name, snapshot.view.headline());

    if snapshot.players.is_empty() {
        out.push_str("  (no players yet)\n");
    }
    for p in &snapshot.players {
        let icon = if p.icon.is_empty() { "-" } else { p.icon.as_str() };
        let picks = if p.picks.is_empty() {
            "no picks".to_string()
        } else {
            p.picks
                .iter()
                .map(|g| {
                    if p.remaining.contains(g) {
                        g.clone()
                    } else {
                        format!("{g} (played)")
                    }
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = write!(out, "  [{}] {} {}: {}", p.id, icon, p.name, picks);
        if let Some(table) = p.table {
            let _ = write!(out, "  @ table #{table}");
        }
        out.push('\n');
    }

    for t in &snapshot.tables {
        let _ = writeln!(
            out,
            "  table #{} {} (host {}): {}",
            t.number,
            t.game,
            t.host,
            t.seats.join(", ")
        );
    }

    if let Some(action) = snapshot.view.primary_action() {
        let state = if action.enabled() { "" } else { " (not ready)" };
        let _ = write!(out, "  next: {}{}", action.label(), state);
    }

    out.trim_end().to_string()
}
