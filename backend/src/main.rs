use std::sync::Arc;

use backend::store::{DynTaskStore, MemoryTaskStore, RedisTaskStore};
use redis::Client;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("backend=info,tower_http=warn")),
        )
        .init();

    let store: DynTaskStore = match std::env::var("TASK_STORE").as_deref() {
        Ok("memory") => {
            tracing::info!("using in-memory task store");
            Arc::new(MemoryTaskStore::new())
        }
        _ => {
            let redis_url = std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
            let client = Client::open(redis_url.as_str()).expect("invalid REDIS_URL");
            tracing::info!(%redis_url, "using redis task store");
            Arc::new(RedisTaskStore::new(client))
        }
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "task server listening");

    backend::run(listener, store).await
}
