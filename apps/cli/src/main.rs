mod args;
mod config;
mod dirs;

use std::io;
use std::net::SocketAddr;

use app_api::AppContext;
use http_api::{HttpState, TOKEN_HEADER, generate_token};
use tracing::{info, warn};
use water_app::{AppPaths, AppState, ensure_app_data_dir};

const DEFAULT_LOG_FILTER: &str =
    "water_tracker_cli=info,water_app=info,ingest=info,http_api=info,warn";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = args::parse_args().map_err(|err| {
        eprintln!("{err}");
        args::print_help();
        io::Error::new(io::ErrorKind::InvalidInput, "invalid arguments")
    })?;

    init_tracing();

    let config = config::load_or_create().map_err(io::Error::other)?;
    if config.created {
        println!(
            "Created config at {} (default port {}).",
            config.paths.file.display(),
            config.config.port
        );
    }

    let data_dir = dirs::resolve_data_dir(args.data_dir).map_err(io::Error::other)?;
    println!("Using data dir: {}", data_dir.display());

    let port = args.port.unwrap_or(config.config.port);

    let paths = AppPaths::new(data_dir);
    ensure_app_data_dir(&paths).map_err(|err| io::Error::other(err.to_string()))?;

    let app_state = AppState::new(paths.db_path, config.config.tracker);
    if app_state.is_fresh_db() {
        info!(path = %app_state.config.db_path.display(), "creating usage database");
    }
    if let Err(err) = app_state.initialize() {
        return Err(io::Error::other(format!("failed to initialize: {}", err)).into());
    }

    let context = AppContext { app_state };

    let token = generate_token();
    let state = HttpState::new(context, token.clone());
    let router = http_api::router(state);

    let (listener, actual_port, used_fallback) = bind_port(port).await?;
    let url = format!("http://127.0.0.1:{actual_port}");

    if used_fallback {
        warn!(port, actual_port, "configured port unavailable, using fallback");
    }

    println!("Water Tracker is running at {url}");
    println!("Send header {TOKEN_HEADER}: {token}");
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

async fn bind_port(port: u16) -> Result<(tokio::net::TcpListener, u16, bool), io::Error> {
    if port == 0 {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let actual_port = listener.local_addr()?.port();
        return Ok((listener, actual_port, false));
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => Ok((listener, port, false)),
        Err(_) => {
            let listener =
                tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
            let actual_port = listener.local_addr()?.port();
            Ok((listener, actual_port, true))
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
