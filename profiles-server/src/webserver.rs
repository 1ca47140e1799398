use crate::api;
use crate::views::Views;
use axum::{
    routing::{get, post},
    Router,
};
use profiles_lib::{ProfileDb, ProfileService};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{event, Level};

/// Shared by every handler. Nothing in here changes after startup.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ProfileService<ProfileDb>>,
    pub views: Arc<Views>,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(db: ProfileDb, secure_cookies: bool) -> Result<Self, tera::Error> {
        Ok(AppState {
            service: Arc::new(ProfileService::new(db)),
            views: Arc::new(Views::new()?),
            secure_cookies,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::root))
        .route("/profiles", get(api::list))
        .route("/profiles/create", get(api::create))
        .route("/profiles/store", post(api::store))
        .route("/profiles/edit/:id", get(api::edit))
        .route("/profiles/update/:id", post(api::update))
        .route("/profiles/delete/:id", get(api::delete))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_webserver(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(state);

    event!(Level::INFO, %addr, "HTTP server listening");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => event!(Level::INFO, "Shutting down"),
                Err(e) => {
                    event!(Level::ERROR, error = %e, "Failed to listen for Ctrl+C");
                    std::future::pending::<()>().await
                }
            }
        })
        .await?;
    Ok(())
}
