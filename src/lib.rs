pub mod config;
pub mod fetcher;
pub mod handler;
pub mod render;
pub mod state;
pub mod widget;

use std::sync::Arc;

use axum::routing::{get, head};
use axum::Router;

use fetcher::CountFetcher;
use state::State;

pub fn app<T>(state: Arc<State<T>>) -> Router
where
    T: CountFetcher + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(handler::page_handler::<T>))
        .route("/widget/visit-count", get(handler::widget_handler::<T>))
        .route("/healthz", head(handler::health_check_handler))
        .with_state(state)
}
