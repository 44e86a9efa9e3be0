use std::sync::Arc;

use axum::{
    extract::State as StateExtractor,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use super::fetcher::CountFetcher;
use super::render;
use super::state::State;

const NO_CACHE: &str = "max-age=0, no-cache, no-store, must-revalidate";

pub async fn health_check_handler() -> Response {
    StatusCode::OK.into_response()
}

pub async fn page_handler<T>(StateExtractor(state): StateExtractor<Arc<State<T>>>) -> Response
where
    T: CountFetcher + Send + Sync + 'static,
{
    let page = settled_widget(&state)
        .await
        .and_then(|widget| render::page(&state.site_title, &widget));

    html_response(page)
}

pub async fn widget_handler<T>(StateExtractor(state): StateExtractor<Arc<State<T>>>) -> Response
where
    T: CountFetcher + Send + Sync + 'static,
{
    html_response(settled_widget(&state).await)
}

// a counter failure still yields a page, the widget renders its own error
async fn settled_widget<T>(state: &State<T>) -> Result<String, askama::Error>
where
    T: CountFetcher + Send + Sync + 'static,
{
    let mut widget = state.visit_counter();
    let outcome = widget.settled().await;
    render::visit_counter(&outcome)
}

fn html_response(markup: Result<String, askama::Error>) -> Response {
    match markup {
        Ok(markup) => (
            StatusCode::OK,
            [(header::CACHE_CONTROL, NO_CACHE)],
            Html(markup),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to render page, reason: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
