use clap::Parser;
use mimalloc::MiMalloc;
use passkeep::cli::{Cli, Commands};
use passkeep::config::Config;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel,
        insecure_cookie = cfg.insecure_cookie
    );

    let storage = passkeep::db::open(&cfg.database_url).await?;

    match cli.selected_command() {
        Commands::InitDb => {
            info!("schema initialized");
        }
        Commands::ClearDb => {
            storage.clear_schema().await?;
            info!("all tables dropped");
        }
        Commands::Serve => {
            let state = passkeep::server::router::PasskeepState::new(
                storage,
                cfg.cookie_key()?,
                cfg.insecure_cookie,
            );
            let app = passkeep::server::router::passkeep_router(state);

            let listener = TcpListener::bind(&cfg.listen_addr).await?;
            info!("HTTP server listening on {}", cfg.listen_addr);
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}
