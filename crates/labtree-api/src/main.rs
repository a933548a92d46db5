#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use axum::extract::{Path as UrlPath, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use labtree::{build_lab_tree, to_xml, Lab};

type Labs = Arc<HashMap<u64, Lab>>;

#[derive(Debug, Deserialize)]
struct QuestionsQuery {
    format: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let content_dir =
        std::env::var("LABTREE_CONTENT_DIR").unwrap_or_else(|_| "content".to_string());
    let labs: Labs = Arc::new(load_labs(Path::new(&content_dir)));
    info!("loaded {} labs from {content_dir}", labs.len());

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/labs", get(labs_index))
        .route("/api/labs/{lab_id}/questions", get(questions))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(labs);

    let host = std::env::var("LABTREE_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("LABTREE_PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{host}:{port}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            warn!("failed to bind {addr}: {err}");
            return;
        }
    };

    info!("listening on {addr}");
    if let Err(err) = axum::serve(listener, app).await {
        warn!("server error: {err}");
    }
}

/// Load every `*.json` lab definition under `dir`, keyed by lab id.
/// Unreadable or invalid files are logged and skipped.
fn load_labs(dir: &Path) -> HashMap<u64, Lab> {
    let mut labs = HashMap::new();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("cannot read content dir {}: {err}", dir.display());
            return labs;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) => {
                warn!("skipping {}: {err}", path.display());
                continue;
            }
        };
        match serde_json::from_str::<Lab>(&data) {
            Ok(lab) => {
                labs.insert(lab.id, lab);
            }
            Err(err) => {
                warn!("skipping {}: {err}", path.display());
            }
        }
    }

    labs
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

async fn labs_index(State(labs): State<Labs>) -> Json<Vec<u64>> {
    let mut ids: Vec<u64> = labs.keys().copied().collect();
    ids.sort_unstable();
    Json(ids)
}

async fn questions(
    State(labs): State<Labs>,
    UrlPath(lab_id): UrlPath<u64>,
    Query(query): Query<QuestionsQuery>,
) -> Response {
    let Some(lab) = labs.get(&lab_id) else {
        return error_response(StatusCode::NOT_FOUND, "unknown lab");
    };

    let tree = match build_lab_tree(lab) {
        Ok(tree) => tree,
        Err(err) => {
            warn!("lab {lab_id}: {err}");
            return error_response(StatusCode::UNPROCESSABLE_ENTITY, &err.to_string());
        }
    };

    if query.format.as_deref() == Some("json") {
        return Json(tree).into_response();
    }

    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        to_xml(&tree),
    )
        .into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({"error": message}))).into_response()
}
