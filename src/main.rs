use foodcart::api::{self, AppState};
use foodcart::config::StorefrontConfig;
use foodcart::runtime::{setup_tracing, OrderSystem};
use foodcart::service::OrderService;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = StorefrontConfig::from_env()?;
    info!(addr = %config.socket_addr(), "Starting foodcart server");

    let system = OrderSystem::new(config.actor_buffer);
    let service = OrderService::new(Arc::new(system.order_client.clone()))
        .with_page_size(config.page_size);
    let app = api::router(AppState::new(service).with_default_fees(config.default_fees));

    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
    info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Ctrl-C received");
        })
        .await?;

    // The router and its client clones are gone once `serve` returns.
    system.shutdown().await?;
    Ok(())
}
