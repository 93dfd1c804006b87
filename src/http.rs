//! HTTP front-end: four JSON/binary routes over the store plus a static
//! file fallback. The store handle is owned by the server task and shared
//! through application state — no module-level global.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::StoreError;
use crate::layout::Resolution;
use crate::store::ImageStore;

#[derive(Clone)]
struct AppState {
    store: Arc<Mutex<ImageStore>>,
}

#[derive(Serialize)]
struct ListBody {
    #[serde(rename = "Images")]
    images: Vec<String>,
}

#[derive(Deserialize)]
struct ReadQuery {
    res: String,
    img_id: String,
}

#[derive(Deserialize)]
struct DeleteQuery {
    img_id: String,
}

#[derive(Deserialize)]
struct InsertQuery {
    name: String,
}

/// Serves `store` at `addr`, falling back to static files under `doc_root`
/// for any URI not matching the four API routes.
pub async fn serve(
    store: ImageStore,
    addr: SocketAddr,
    doc_root: PathBuf,
) -> crate::error::Result<()> {
    let state = AppState {
        store: Arc::new(Mutex::new(store)),
    };

    let app = Router::new()
        .route("/imgStore/list", get(list_handler))
        .route("/imgStore/read", get(read_handler))
        .route("/imgStore/delete", get(delete_handler))
        .route("/imgStore/insert", post(insert_handler))
        .fallback_service(ServeDir::new(doc_root))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app)
        .await
        .map_err(|e| StoreError::Io(std::io::Error::other(e)))?;
    Ok(())
}

async fn list_handler(State(state): State<AppState>) -> Response {
    let images = state.store.lock().unwrap().list_ids();
    axum::Json(ListBody { images }).into_response()
}

async fn read_handler(State(state): State<AppState>, Query(q): Query<ReadQuery>) -> Response {
    let res = match Resolution::parse(&q.res) {
        Ok(r) => r,
        Err(e) => return error_response(&e),
    };
    let bytes = {
        let mut store = state.store.lock().unwrap();
        store.read(&q.img_id, res)
    };
    match bytes {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn delete_handler(State(state): State<AppState>, Query(q): Query<DeleteQuery>) -> Response {
    let result = state.store.lock().unwrap().delete(&q.img_id);
    match result {
        Ok(()) => Redirect::to("/index.html").into_response(),
        Err(e) => error_response(&e),
    }
}

async fn insert_handler(
    State(state): State<AppState>,
    Query(q): Query<InsertQuery>,
    body: axum::body::Bytes,
) -> Response {
    let result = state.store.lock().unwrap().insert(&body, &q.name);
    match result {
        Ok(()) => Redirect::to("/index.html").into_response(),
        Err(e) => error_response(&e),
    }
}

fn error_response(e: &StoreError) -> Response {
    tracing::error!(error = %e, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, format!("ERROR: {e}")).into_response()
}
