use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use isomorph_embed::{embed, EmbedMode};
use isomorph_reducer_core::{render, ItemsState};
use isomorph_render_html::{render_page, Hydration, PageOptions};
use serde::Serialize;
use serde_json::Value;
use tower_http::trace::TraceLayer;

use crate::assets::{ClientAssets, COMPONENT_MODULE};
use crate::error::AppError;

const JAVASCRIPT: &str = "text/javascript";
const MOUNT: &str = "#content";

// ── Shared state ────────────────────────────────────────────────────

pub struct AppState {
    /// Render props for the homepage; the same value is embedded for the client.
    pub props: Value,
    pub embed_mode: EmbedMode,
    pub assets: ClientAssets,
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(homepage).fallback(not_found))
        .route("/bundle.js", get(bundle_js).fallback(not_found))
        .route("/runtime.js", get(runtime_js).fallback(not_found))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Handlers ────────────────────────────────────────────────────────

async fn homepage(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let view = ItemsState::from_props(&state.props);
    let page = render_homepage(&view, &state.props, state.embed_mode)?;
    tracing::debug!(items = view.len(), bytes = page.len(), "rendered homepage");
    Ok(Html(page))
}

async fn bundle_js(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, JAVASCRIPT)], state.assets.bundle.clone())
}

async fn runtime_js(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, JAVASCRIPT)], state.assets.runtime.clone())
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Server-render the component and wrap it in the page that hydrates it
/// from the embedded props.
fn render_homepage<P: Serialize + ?Sized>(
    view: &ItemsState,
    props: &P,
    mode: EmbedMode,
) -> Result<String, AppError> {
    let payload = embed(props, mode)?;
    Ok(render_page(&PageOptions {
        root: render(view),
        mount_selector: Some(MOUNT.to_string()),
        title: Some("isomorph".to_string()),
        scripts: vec!["/runtime.js".to_string(), "/bundle.js".to_string()],
        hydrate: Some(Hydration {
            component: COMPONENT_MODULE.to_string(),
            props: payload,
            mode,
        }),
    }))
}
