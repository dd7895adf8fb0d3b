//! Session gateway binary: loads config, connects to the durable store,
//! wires the router, and serves.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use chess_gateway::{app_state, config, router, store};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::Config::load().expect("config load failed");
    let listen: SocketAddr = cfg.bind_addr.parse().expect("BIND_ADDR must be a valid socket address");

    let redis = store::RedisRoomStore::connect(&cfg.redis_url).await.expect("redis connect failed");
    let repo = Arc::new(store::RoomRepository::new(Arc::new(redis)));

    let state = app_state::AppState::new(cfg, repo);
    let app = router::build_router(state);

    tracing::info!(%listen, "chess-relay gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
