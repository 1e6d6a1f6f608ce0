//! `tower`: play the tower from a terminal.
use anyhow::Result;
use tokio::io::BufReader;
use tower_client::{ClientConfig, Console, logging};
use tower_runtime::{Runtime, RuntimeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let runtime_config = RuntimeConfig::from_env();
    let client_config = ClientConfig::from_env();

    let _log_guard = logging::setup_logging(client_config.log_dir.as_deref())?;

    tracing::info!(
        player = %client_config.player_id,
        admin = client_config.admin,
        "Starting tower client"
    );
    tracing::info!("Content: {}", runtime_config.data_dir.display());
    match &runtime_config.save_dir {
        Some(dir) => tracing::info!("Saves: {}", dir.display()),
        None => tracing::info!("Saves: in memory"),
    }

    let runtime = Runtime::builder().config(runtime_config).build().await?;
    let console = Console::new(runtime.handle(), client_config);

    let mut stdout = tokio::io::stdout();
    let result = console
        .run(
            BufReader::new(tokio::io::stdin()),
            &mut stdout,
            runtime.subscribe_events(),
        )
        .await;

    runtime.shutdown().await?;
    tracing::info!("Client shutdown complete");
    result
}
