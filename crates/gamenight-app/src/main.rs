// Game night entry point.
//
// Startup sequence:
// 1. Load config (seeding config/ from defaults/)
// 2. Initialize tracing (log to file, the terminal belongs to the console)
// 3. Create the draft session
// 4. Create mpsc channels
// 5. Spawn app logic task
// 6. Run the console until the user quits
// 7. Cleanup on exit

use gamenight_app::app;
use gamenight_app::config::{self, LoggingConfig};
use gamenight_app::console;
use gamenight_core::session::DraftSession;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 1. Load config
    let config = config::load_config().context("failed to load configuration")?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;
    info!(
        "Config loaded: session={}, {} seats per table",
        config.session.name, config.seating.max_seats_per_table
    );

    // 3. Create the session
    let session = DraftSession::new(DraftSession::generate_session_id(), config.seating.rules());
    info!(session = %session.id(), "Session created");

    // 4. Channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    println!("{} (type `help` for commands)", config.session.name);
    let app_state = app::AppState::new(config, session);

    // 5. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 6. Console owns stdin/stdout until quit
    if let Err(e) = console::run(ui_rx, cmd_tx).await {
        error!("Console error: {}", e);
    }

    // 7. Cleanup: wait for app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Game night shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file under `logging.dir`.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join(&logging.dir);
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("gamenight.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
