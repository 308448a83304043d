use crate::dataset::{coerce, CellValue, Dataset, Table};
use crate::error::{Result, ServiceError};
use crate::render::{self, TemplateSource};
use crate::state::AppState;
use crate::template;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Template file name (without extension); falls back to the configured
    /// default
    pub template_name: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    /// Extra scalar values merged into the ReportData row
    pub parameters: Option<Map<String, Value>>,
    /// Arbitrary report data: each top-level array or object becomes a table
    pub data: Option<Map<String, Value>>,
}

/// Render a PDF from a template file on disk.
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<impl IntoResponse> {
    let template_name = req
        .template_name
        .clone()
        .unwrap_or_else(|| state.config.templates.default_template.clone());
    tracing::info!("Generation request for template '{}'", template_name);

    let _permit = state
        .render_semaphore
        .acquire()
        .await
        .map_err(|_| ServiceError::ServiceOverloaded)?;

    let template_path = state.config.template_path(&template_name);
    if !template_path.exists() {
        return Err(ServiceError::TemplateNotFound(
            template_path.display().to_string(),
        ));
    }

    let dataset = build_dataset(&req);
    let pdf_bytes = render::render_report(
        state.renderer.as_ref(),
        &dataset,
        &TemplateSource::File(template_path),
    )
    .await?;

    tracing::info!(
        "Generation completed for template '{}' ({} bytes)",
        template_name,
        pdf_bytes.len()
    );

    let filename = format!("report_{}.pdf", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    Ok(pdf_response(pdf_bytes, &filename))
}

/// Render a PDF from the built-in inline template; works without any
/// template files on disk.
pub async fn generate_fallback(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!("Fallback generation request");

    let _permit = state
        .render_semaphore
        .acquire()
        .await
        .map_err(|_| ServiceError::ServiceOverloaded)?;

    let markup = template::inline_template(req.title.as_deref(), req.content.as_deref());
    let dataset = build_dataset(&req);
    let pdf_bytes = render::render_report(
        state.renderer.as_ref(),
        &dataset,
        &TemplateSource::Inline(markup),
    )
    .await?;

    tracing::info!("Fallback generation completed ({} bytes)", pdf_bytes.len());

    let filename = format!(
        "fallback_report_{}.pdf",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    Ok(pdf_response(pdf_bytes, &filename))
}

/// Assemble the request dataset: the `data` object projected table by table,
/// plus the synthetic `ReportData` table the stock templates bind, carrying
/// title, content, generation time, and any extra parameters.
pub fn build_dataset(req: &GenerateRequest) -> Dataset {
    let mut dataset = match &req.data {
        Some(root) => Dataset::from_root("Data", root),
        None => Dataset::new("Data"),
    };

    let mut cells = vec![
        (
            "Title".to_string(),
            CellValue::String(
                req.title
                    .clone()
                    .unwrap_or_else(|| template::DEFAULT_TITLE.to_string()),
            ),
        ),
        (
            "Content".to_string(),
            CellValue::String(
                req.content
                    .clone()
                    .unwrap_or_else(|| template::DEFAULT_CONTENT.to_string()),
            ),
        ),
        (
            "GeneratedDate".to_string(),
            CellValue::Timestamp(chrono::Local::now().naive_local()),
        ),
    ];
    if let Some(parameters) = &req.parameters {
        for (key, value) in parameters {
            // Column names stay unique; the built-in cells win over a
            // parameter reusing their name
            if !cells.iter().any(|(name, _)| name == key) {
                cells.push((key.clone(), coerce(value)));
            }
        }
    }
    dataset.push(Table::from_row("ReportData", cells));

    dataset
}

fn pdf_response(pdf_bytes: Vec<u8>, filename: &str) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        pdf_bytes,
    )
}
