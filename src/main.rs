use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use visit_counter_site::config::{load_env_file, Config};
use visit_counter_site::fetcher::VisitCountClient;
use visit_counter_site::state::State;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let is_production = std::env::var("PRODUCTION").is_ok();
    match is_production {
        // local env
        false => {
            let env_file = load_env_file();

            tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .pretty()
                    .with_env_filter(EnvFilter::from_default_env())
                    .finish(),
            )?;

            if let Some(file) = env_file {
                tracing::info!("loaded environment from {}", file);
            }
        }
        // production env
        true => {
            tracing::subscriber::set_global_default(
                tracing_subscriber::fmt()
                    .json()
                    .with_env_filter(EnvFilter::from_default_env())
                    .with_target(false)
                    .finish(),
            )?;
        }
    }

    let config = Config::from_env()?;

    // the endpoint is resolved once and injected into every widget
    let client = VisitCountClient::new(config.count_endpoint(), config.site_origin.as_deref())?;
    tracing::info!("visit counter endpoint: {}", client.endpoint());

    let state = Arc::new(State::new(client, config.site_title.clone()));

    let addr: SocketAddr = match config.production {
        false => SocketAddr::from(([127, 0, 0, 1], config.port)),
        true => SocketAddr::from(([0u16; 8], config.port)),
    };

    let server = axum::Server::bind(&addr)
        .serve(visit_counter_site::app(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal());

    tracing::info!("server running on {}", addr);

    if let Err(err) = server.await {
        tracing::error!("server encountered an error: {}", err);
    }

    tracing::info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install ctrl+c handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::interrupt()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install interrupt signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
