use rsvp_server::auth::AdminAuth;
use rsvp_server::config;
use rsvp_server::http::{self, State};
use rsvp_server::store::SledStore;
use std::env;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut port = 8000;
    if let Some(p) = env::args().nth(1) {
        port = p.parse()?;
    }

    let config = config::load_config()?;
    let store = SledStore::open(&config.db_path)?;
    let state = State::new(store, AdminAuth::new(&config.admin_password));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(http::router(state).into_make_service())
        .await?;
    Ok(())
}
