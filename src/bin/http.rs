#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use board_schedule::http_api::{self, SharedRepository};
    use board_schedule::persistence::load_snapshot_from_json;
    use board_schedule::{BoardScheduler, EngineConfig, MemoryBoardStore};
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = std::env::var("BOARD_SCHEDULE_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let config = match std::env::var("BOARD_SCHEDULE_CONFIG") {
        Ok(path) => EngineConfig::from_json_file(path)?,
        Err(_) => EngineConfig::default(),
    };

    let repository: SharedRepository = match (
        std::env::var("BOARD_SCHEDULE_DB"),
        std::env::var("BOARD_SCHEDULE_SNAPSHOT"),
    ) {
        #[cfg(feature = "sqlite")]
        (Ok(db), _) => Box::new(board_schedule::SqliteBoardStore::new(db)?),
        (_, Ok(snapshot)) => Box::new(MemoryBoardStore::from_snapshot(load_snapshot_from_json(
            snapshot,
        )?)),
        _ => {
            tracing::warn!("no BOARD_SCHEDULE_DB or BOARD_SCHEDULE_SNAPSHOT set; serving an empty store");
            Box::new(MemoryBoardStore::new())
        }
    };

    tracing::info!(%addr, "board-schedule HTTP API listening");
    http_api::serve(addr, BoardScheduler::with_config(repository, config)).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
