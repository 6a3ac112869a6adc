use store_server::{Config, Server, ServerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment and logging
    dotenv::dotenv().ok();

    let config = Config::from_env();
    store_server::init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!("Store server starting...");

    // 2. Open database, apply schema, build shared state
    let state = ServerState::initialize(&config).await?;

    // 3. Serve until shutdown
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
