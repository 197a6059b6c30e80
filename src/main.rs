use tokio::net::TcpListener;

use flatwiki::{logger::Logger, router, AppState, Config, WikiError};

#[tokio::main]
async fn main() -> Result<(), WikiError> {
    if let Err(e) = Logger::init() {
        eprintln!("Failed to install logger: {}", e);
    }

    if let Err(e) = run().await {
        log::error!("Fatal: {}", e);
        return Err(e);
    }
    Ok(())
}

async fn run() -> Result<(), WikiError> {
    let config = Config::from_env()?;
    let state = AppState::from_config(&config)?;
    let app = router(state);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    log::info!("Wiki listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(WikiError::from)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Shutdown signal received"),
        Err(e) => {
            log::warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await
        }
    }
}
