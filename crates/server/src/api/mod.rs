//! HTTP surface
//!
//! | Verb | Path | |
//! |---|---|---|
//! | GET | `/` | landing page |
//! | GET | `/health` | plain `OK` |
//! | GET | `/status` | online flag, session count, server identity |
//! | POST | `/register` | create a session from `{sessionId}` |
//! | POST | `/api/message` | JSON-RPC envelope for `?sessionId=` (or `sessionId` in the body) |

mod error;
mod handlers;
mod home;

pub use home::HOME_PAGE;

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::http::{Method, header};
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::session::SessionStore;
use crate::tools::{HttpFetcher, ToolRegistry, WebsiteFetcher};

/// Shared state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Build state with the `reqwest`-backed website fetcher
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.fetch_timeout)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Build state around a caller-supplied fetcher
    pub fn with_fetcher(config: &ServerConfig, fetcher: Arc<dyn WebsiteFetcher>) -> Self {
        let tools = ToolRegistry::with_fetch_website(fetcher, config.max_content_chars);
        let dispatcher = Dispatcher::new(
            Arc::new(SessionStore::new()),
            Arc::new(tools),
            config.server_info.clone(),
        );
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

/// Create the router with CORS and request tracing
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/status", get(handlers::status))
        .route("/register", post(handlers::register))
        .route("/api/message", post(handlers::message))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already-bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("Direct API Server running on http://{}", addr);
    info!("Register endpoint: http://{}/register", addr);
    info!("Message endpoint: http://{}/api/message", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped");
    Ok(())
}
