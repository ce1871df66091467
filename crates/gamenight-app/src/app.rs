// Application orchestration: owns the session and serves console commands.
//
// The loop is the single writer of the session state. Each command is applied
// and answered with zero or more UiUpdates followed by a fresh snapshot.

use tokio::sync::mpsc;
use tracing::{info, warn};

use gamenight_core::presentation::stage_view;
use gamenight_core::session::{remaining_picks, DraftSession, PickToggle, PlayerId, SessionStage};

use crate::config::Config;
use crate::protocol::{AppSnapshot, PlayerLine, TableLine, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    pub session: DraftSession,
}

impl AppState {
    pub fn new(config: Config, session: DraftSession) -> Self {
        AppState { config, session }
    }

    fn player_name(&self, id: PlayerId) -> String {
        self.session
            .state()
            .player(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Build the snapshot the console renders.
    pub fn build_snapshot(&self) -> AppSnapshot {
        let state = self.session.state();
        let round = state.current_round();

        let players = state
            .players
            .iter()
            .map(|p| PlayerLine {
                id: p.id,
                name: p.name.clone(),
                icon: p.icon.clone(),
                picks: p.picks.clone(),
                remaining: remaining_picks(state, p)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                table: round.and_then(|r| r.table_of(p.id)).map(|t| t + 1),
            })
            .collect();

        let tables = round
            .map(|r| {
                r.tables
                    .iter()
                    .enumerate()
                    .map(|(i, t)| TableLine {
                        number: i + 1,
                        game: t.game.clone(),
                        host: self.player_name(t.host),
                        seats: t.seats.iter().map(|&s| self.player_name(s)).collect(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        AppSnapshot {
            session_name: self.config.session.name.clone(),
            stage: state.stage,
            view: stage_view(state),
            players,
            tables,
        }
    }

    /// Apply one command and collect the updates to push. `Quit` is handled
    /// by the loop and yields nothing here.
    pub fn apply_command(&mut self, cmd: UserCommand) -> Vec<UiUpdate> {
        let outcome: Result<String, String> = match cmd {
            UserCommand::AddPlayer { name, icon } => self
                .session
                .add_player(&name, &icon)
                .map(|id| format!("Added {} as player {}", name.trim(), id))
                .map_err(|e| e.to_string()),
            UserCommand::RemovePlayer(id) => self
                .session
                .remove_player(id)
                .map(|p| format!("Removed {}", p.name))
                .map_err(|e| e.to_string()),
            UserCommand::TogglePick { player, game } => self
                .session
                .toggle_pick(player, &game)
                .map(|toggle| {
                    let verb = match toggle {
                        PickToggle::Added => "picked",
                        PickToggle::Removed => "dropped",
                    };
                    format!("{} {} {}", self.player_name(player), verb, game.trim())
                })
                .map_err(|e| e.to_string()),
            UserCommand::StartFirstRound => {
                if self.session.start_first_round() {
                    Ok("Round 1 started".to_string())
                } else if self.session.stage() != SessionStage::Setup {
                    Err("The session has already started".to_string())
                } else {
                    Err(format!(
                        "Not ready: {} (every player needs exactly two picks)",
                        stage_view(self.session.state()).headline()
                    ))
                }
            }
            UserCommand::OpenTable { host, game } => self
                .session
                .open_table(host, &game)
                .map(|t| {
                    format!(
                        "Table #{} opened: {} hosted by {}",
                        t + 1,
                        game.trim(),
                        self.player_name(host)
                    )
                })
                .map_err(|e| e.to_string()),
            UserCommand::Seat { player, table } => self
                .session
                .seat_player(player, table)
                .map(|()| format!("{} joined table #{}", self.player_name(player), table + 1))
                .map_err(|e| e.to_string()),
            UserCommand::Unseat(player) => self
                .session
                .unseat_player(player)
                .map(|t| format!("{} left table #{}", self.player_name(player), t + 1))
                .map_err(|e| e.to_string()),
            UserCommand::CloseTable(table) => self
                .session
                .close_table(table)
                .map(|t| format!("Table #{} closed; {} is back in play", table + 1, t.game))
                .map_err(|e| e.to_string()),
            UserCommand::CompleteRound => {
                if self.session.complete_current_round() {
                    Ok(stage_view(self.session.state()).headline())
                } else if !self.session.stage().is_round_stage() {
                    Err("No round is in progress".to_string())
                } else {
                    Err("Everyone must be seated before the round can end".to_string())
                }
            }
            UserCommand::NextRound => {
                if self.session.create_new_round() {
                    Ok(stage_view(self.session.state()).headline())
                } else {
                    Err(match self.session.stage() {
                        SessionStage::Setup => "No round is in progress",
                        SessionStage::Complete => "The session is already complete",
                        _ => "The current round has not been completed",
                    }
                    .to_string())
                }
            }
            UserCommand::Status => {
                return vec![UiUpdate::StateSnapshot(Box::new(self.build_snapshot()))];
            }
            UserCommand::Help => return vec![UiUpdate::Help],
            UserCommand::Quit => return Vec::new(),
        };

        match outcome {
            Ok(msg) => vec![
                UiUpdate::Notice(msg),
                UiUpdate::StateSnapshot(Box::new(self.build_snapshot())),
            ],
            Err(reason) => {
                warn!(stage = %self.session.stage(), "Command rejected: {}", reason);
                vec![UiUpdate::Rejected(reason)]
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the application event loop until `Quit` arrives or the command
/// channel closes. Sends an initial snapshot on start.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!(session = %state.session.id(), "Application event loop started");

    let _ = ui_tx
        .send(UiUpdate::StateSnapshot(Box::new(state.build_snapshot())))
        .await;

    loop {
        match cmd_rx.recv().await {
            Some(UserCommand::Quit) => {
                info!("Quit command received, shutting down");
                break;
            }
            Some(cmd) => {
                handle_user_command(&mut state, cmd, &ui_tx).await;
            }
            None => {
                info!("Command channel closed, shutting down");
                break;
            }
        }
    }

    info!(
        session = %state.session.id(),
        stage = %state.session.stage(),
        rounds = state.session.state().rounds.len(),
        "Application event loop stopped"
    );
    Ok(())
}

/// Handle a user command from the console.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    for update in state.apply_command(cmd) {
        if ui_tx.send(update).await.is_err() {
            warn!("UI channel closed; dropping update");
            return;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoggingConfig, SeatingConfig, SessionConfig};
    use gamenight_core::presentation::StageView;

    fn test_config() -> Config {
        Config {
            session: SessionConfig {
                name: "Test Night".into(),
            },
            seating: SeatingConfig {
                max_seats_per_table: 3,
            },
            logging: LoggingConfig {
                filter: "warn".into(),
                dir: "logs".into(),
            },
        }
    }

    fn test_state() -> AppState {
        let config = test_config();
        let session = DraftSession::new("app-test", config.seating.rules());
        AppState::new(config, session)
    }

    fn snapshot_of(updates: &[UiUpdate]) -> &AppSnapshot {
        updates
            .iter()
            .find_map(|u| match u {
                UiUpdate::StateSnapshot(s) => Some(s.as_ref()),
                _ => None,
            })
            .expect("expected a snapshot")
    }

    fn add(state: &mut AppState, name: &str) -> PlayerId {
        let updates = state.apply_command(UserCommand::AddPlayer {
            name: name.into(),
            icon: String::new(),
        });
        snapshot_of(&updates)
            .players
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.id)
            .expect("player added")
    }

    fn pick(state: &mut AppState, player: PlayerId, game: &str) -> Vec<UiUpdate> {
        state.apply_command(UserCommand::TogglePick {
            player,
            game: game.into(),
        })
    }

    #[test]
    fn snapshot_reflects_setup() {
        let mut state = test_state();
        let ann = add(&mut state, "Ann");
        pick(&mut state, ann, "Azul");

        let snap = state.build_snapshot();
        assert_eq!(snap.session_name, "Test Night");
        assert_eq!(snap.stage, SessionStage::Setup);
        assert_eq!(
            snap.view,
            StageView::SetupIncomplete {
                players_ready: 0,
                total_players: 1,
                enough_players: false
            }
        );
        assert_eq!(snap.players[0].picks, vec!["Azul"]);
        assert_eq!(snap.players[0].remaining, vec!["Azul"]);
        assert!(snap.tables.is_empty());
    }

    #[test]
    fn toggle_pick_reports_add_and_drop() {
        let mut state = test_state();
        let ann = add(&mut state, "Ann");

        let updates = pick(&mut state, ann, "Azul");
        assert_eq!(updates[0], UiUpdate::Notice("Ann picked Azul".into()));
        let updates = pick(&mut state, ann, "Azul");
        assert_eq!(updates[0], UiUpdate::Notice("Ann dropped Azul".into()));
    }

    #[test]
    fn start_before_ready_is_rejected_without_snapshot() {
        let mut state = test_state();
        add(&mut state, "Ann");

        let updates = state.apply_command(UserCommand::StartFirstRound);
        assert_eq!(updates.len(), 1);
        match &updates[0] {
            UiUpdate::Rejected(reason) => assert!(reason.starts_with("Not ready")),
            other => panic!("expected Rejected, got {other:?}"),
        }
        assert_eq!(state.session.stage(), SessionStage::Setup);
    }

    #[test]
    fn seating_shows_one_based_tables() {
        let mut state = test_state();
        let ann = add(&mut state, "Ann");
        let ben = add(&mut state, "Ben");
        for (p, g) in [(ann, "Azul"), (ann, "Brass"), (ben, "Catan"), (ben, "Dune")] {
            pick(&mut state, p, g);
        }
        state.apply_command(UserCommand::StartFirstRound);
        state.apply_command(UserCommand::OpenTable {
            host: ann,
            game: "Azul".into(),
        });
        let updates = state.apply_command(UserCommand::Seat {
            player: ben,
            table: 0,
        });
        assert_eq!(updates[0], UiUpdate::Notice("Ben joined table #1".into()));

        let snap = snapshot_of(&updates);
        assert_eq!(snap.tables.len(), 1);
        assert_eq!(snap.tables[0].number, 1);
        assert_eq!(snap.tables[0].host, "Ann");
        assert_eq!(snap.tables[0].seats, vec!["Ann", "Ben"]);
        assert!(snap.players.iter().all(|p| p.table == Some(1)));
        assert_eq!(snap.players[0].remaining, vec!["Brass"]);
    }

    #[test]
    fn complete_round_requires_everyone_seated() {
        let mut state = test_state();
        let ann = add(&mut state, "Ann");
        let ben = add(&mut state, "Ben");
        for (p, g) in [(ann, "Azul"), (ann, "Brass"), (ben, "Catan"), (ben, "Dune")] {
            pick(&mut state, p, g);
        }
        state.apply_command(UserCommand::StartFirstRound);
        state.apply_command(UserCommand::OpenTable {
            host: ann,
            game: "Azul".into(),
        });

        let updates = state.apply_command(UserCommand::CompleteRound);
        assert!(matches!(updates[0], UiUpdate::Rejected(_)));

        state.apply_command(UserCommand::Seat {
            player: ben,
            table: 0,
        });
        let updates = state.apply_command(UserCommand::CompleteRound);
        assert_eq!(updates[0], UiUpdate::Notice("Round 1 Complete".into()));
    }

    #[test]
    fn next_round_before_completion_is_rejected() {
        let mut state = test_state();
        let updates = state.apply_command(UserCommand::NextRound);
        assert!(matches!(updates[0], UiUpdate::Rejected(_)));
    }

    #[test]
    fn setup_errors_surface_as_rejections() {
        let mut state = test_state();
        let updates = state.apply_command(UserCommand::RemovePlayer(PlayerId(9)));
        assert_eq!(updates, vec![UiUpdate::Rejected("unknown player 9".into())]);
    }

    #[test]
    fn status_and_help() {
        let mut state = test_state();
        let updates = state.apply_command(UserCommand::Status);
        assert!(matches!(updates.as_slice(), [UiUpdate::StateSnapshot(_)]));
        assert_eq!(state.apply_command(UserCommand::Help), vec![UiUpdate::Help]);
        assert!(state.apply_command(UserCommand::Quit).is_empty());
    }

    // -----------------------------------------------------------------------
    // Tests: Async event loop
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn event_loop_sends_initial_snapshot_and_quits() {
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(64);

        let handle = tokio::spawn(run(cmd_rx, ui_tx, test_state()));

        match ui_rx.recv().await {
            Some(UiUpdate::StateSnapshot(snap)) => {
                assert_eq!(snap.stage, SessionStage::Setup);
            }
            other => panic!("expected initial snapshot, got {other:?}"),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        let result = handle.await.unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn event_loop_stops_when_commands_close() {
        let (cmd_tx, cmd_rx) = mpsc::channel::<UserCommand>(16);
        let (ui_tx, _ui_rx) = mpsc::channel(64);

        let handle = tokio::spawn(run(cmd_rx, ui_tx, test_state()));
        drop(cmd_tx);

        assert!(handle.await.unwrap().is_ok());
    }
}
