// Serve compact tweet searches by hashtag and by user over HTTP, backed by the Twitter v1.1 API
mod wrapper;
pub use wrapper::*;

use dotenv::dotenv;
use hyper::service::{make_service_fn, service_fn};
use hyper::Server;
use std::convert::Infallible;

mod domain;
mod handler;
mod infra;
mod initializer;
mod logging;
mod repository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging("info")?;

    let config = initializer::Config::from_env()?;
    let addr = config.addr;
    tracing::info!(api_base = %config.api_base, "configuration loaded");

    let app = initializer::new(config);
    let services = app.services.clone();

    let make_svc = make_service_fn(move |_conn| {
        let services = services.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| handler::route(services.clone(), req)))
        }
    });

    let server = Server::try_bind(&addr)?.serve(make_svc);
    tracing::info!(%addr, "listening");

    server.with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
