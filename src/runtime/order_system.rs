use crate::clients::OrderClient;
use crate::order_actor;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

/// Starts and stops the order actor.
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::new(32);
/// let backend: Arc<dyn OrderBackend> = Arc::new(system.order_client.clone());
/// // ... serve requests ...
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    /// Client for interacting with the Order actor
    pub order_client: OrderClient,

    handle: JoinHandle<()>,
}

impl OrderSystem {
    /// Spawns the order actor with a request channel of `buffer_size`.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(buffer_size: usize) -> Self {
        let (actor, order_client) = order_actor::new(buffer_size);
        let handle = tokio::spawn(actor.run(()));
        info!(buffer_size, "Order system started");
        Self {
            order_client,
            handle,
        }
    }

    /// Drops this system's client and waits for the actor to drain.
    ///
    /// The actor stops once every clone of the client is gone, so callers
    /// must drop the clones they handed out (for example the HTTP router)
    /// before awaiting this.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down order system...");
        drop(self.order_client);

        if let Err(e) = self.handle.await {
            error!(error = %e, "Order actor task failed");
            return Err(e);
        }
        info!("Order system shutdown complete.");
        Ok(())
    }
}
