use crate::error::{Result, ServiceError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

/// Service health plus default-template discovery status.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let template_path = state
        .config
        .template_path(&state.config.templates.default_template);

    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
        "engine": "frx",
        "template_path": template_path,
        "template_exists": template_path.exists(),
    }))
}

/// Template directory diagnostics: what the service expects to find and
/// what is actually there.
pub async fn template_check(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let template_path = state
        .config
        .template_path(&state.config.templates.default_template);
    let templates_directory = state.config.templates.dir.clone();
    let directory_exists = templates_directory.is_dir();

    let mut files_in_directory = Vec::new();
    if directory_exists {
        let mut entries = tokio::fs::read_dir(&templates_directory).await.map_err(|e| {
            ServiceError::Internal(format!("Failed to read template directory: {}", e))
        })?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            ServiceError::Internal(format!("Failed to read directory entry: {}", e))
        })? {
            files_in_directory.push(entry.path().display().to_string());
        }
        files_in_directory.sort();
    }

    Ok(Json(json!({
        "template_path": template_path,
        "template_exists": template_path.exists(),
        "templates_directory": templates_directory,
        "directory_exists": directory_exists,
        "files_in_directory": files_in_directory,
    })))
}
