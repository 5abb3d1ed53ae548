use std::error::Error;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use classmint_application::ports::incoming::ledger::LedgerUseCase;
use domain::ledger::ChainVerification;
use server::bootstrap::router::create_router;
use server::bootstrap::state::AppState;
use server::config_loader;
use server::observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let config = config_loader::load_config()?;

    observability::tracing::setup_logging(&config)?;

    info!("Starting ClassMint backend");
    info!("Configuration loaded successfully");

    let state = AppState::new(config.clone())?;
    let seeded = state.seed().await?;

    let app = create_router(&state);

    let listener = TcpListener::bind(&config.server_address()).await?;
    info!("Server listening on http://{}", config.server_address());

    observability::startup_info::print_api_info(&config, seeded);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Err(e) = result {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    report_ledger(&state).await;

    info!("Server shutdown completed");
    Ok(())
}

async fn report_ledger(state: &AppState) {
    match state.ledger_service.verify_chain().await {
        Ok(ChainVerification::Intact { length, last_hash }) => {
            info!(
                length,
                last_hash = last_hash.as_deref().unwrap_or("-"),
                "Ledger chain intact"
            );
        }
        Ok(ChainVerification::Broken {
            broken_at,
            expected_hash,
            actual_hash,
        }) => {
            error!(broken_at, %expected_hash, %actual_hash, "Ledger chain broken");
        }
        Err(e) => warn!("Could not verify ledger chain: {}", e),
    }

    if let Ok(status) = state.ledger_service.status(0).await {
        info!(
            blocks = status.total_blocks,
            redeemed = status.total_amount,
            "Ledger totals"
        );
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
            }
        }
    };

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, starting graceful shutdown...");
        },
        () = terminate => {
            info!("Received terminate signal, starting graceful shutdown...");
        },
    }
}
