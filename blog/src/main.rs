use std::sync::Arc;

use axum::Router;
use dotenv::dotenv;
use eyre::WrapErr;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::{Env, ServerConfig},
    error::AppError,
};

mod blog;
mod bootstrap;
mod config;
mod db;
mod error;
mod form;
mod identity;
mod schema;
mod validation;
mod views;

#[cfg(test)]
mod test_support;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Clone)]
pub struct App {
    pub config: Arc<ServerConfig>,
    database_url: Arc<str>,
}

impl App {
    pub fn new(config: ServerConfig) -> Self {
        App {
            database_url: Arc::from(config.database_url.as_str()),
            config: Arc::new(config),
        }
    }

    pub fn database_url(&self) -> Arc<str> {
        self.database_url.clone()
    }
}

pub fn router(app: App) -> Router {
    Router::new()
        .merge(identity::routes::route())
        .merge(blog::routes::route())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

fn init_tracing(env: Env) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("blog=info,tower_http=info"));
    let registry = tracing_subscriber::registry().with(filter);

    match env {
        Env::Production => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        Env::Dev | Env::Staging => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();
    init_tracing(Env::from_env());

    let config = ServerConfig::new_from_env()?;

    let mut conn = db::establish(&config.database_url)
        .await
        .wrap_err_with(|| format!("could not open `{}`", config.database_url))?;
    bootstrap::run(&mut conn, config.seed_fixtures).await?;
    drop(conn);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .wrap_err_with(|| format!("could not listen on {}", config.listen_addr))?;
    tracing::info!(env = ?config.env, "listening on {}", listener.local_addr()?);

    axum::serve(listener, router(App::new(config))).await?;

    Ok(())
}
