//! Report rendering boundary.
//!
//! The service never depends on a concrete engine: handlers hold an
//! `Arc<dyn ReportRenderer>` and everything above this trait is testable
//! with a stub. [`FrxEngine`] is the implementation the binary ships with.

pub mod engine;
pub mod frx;

pub use engine::FrxEngine;

use crate::dataset::Dataset;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// External identifier resolving to report layout instructions: a template
/// file on disk, or inline markup assembled per request.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    File(PathBuf),
    Inline(String),
}

/// Errors that can occur during report rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to parse template: {0}")]
    Template(String),

    #[error("Rendering failed: {message}")]
    Render {
        message: String,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Rendering produced an empty document")]
    EmptyOutput,

    #[error("Template I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Message of the nested cause, if any, for error response bodies.
    pub fn cause_message(&self) -> Option<String> {
        std::error::Error::source(self).map(|cause| cause.to_string())
    }
}

/// The rendering engine boundary: dataset plus template in, PDF bytes out.
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    async fn render(
        &self,
        dataset: &Dataset,
        template: &TemplateSource,
    ) -> Result<Vec<u8>, RenderError>;
}

/// Invoke a renderer and police its output. An engine that "succeeds" with
/// zero bytes still failed from the caller's perspective, so an empty buffer
/// is reclassified before it can reach the HTTP layer.
pub async fn render_report(
    renderer: &dyn ReportRenderer,
    dataset: &Dataset,
    template: &TemplateSource,
) -> Result<Vec<u8>, RenderError> {
    let bytes = renderer.render(dataset, template).await?;
    if bytes.is_empty() {
        return Err(RenderError::EmptyOutput);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRenderer(Vec<u8>);

    #[async_trait]
    impl ReportRenderer for FixedRenderer {
        async fn render(
            &self,
            _dataset: &Dataset,
            _template: &TemplateSource,
        ) -> Result<Vec<u8>, RenderError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn empty_successful_output_is_a_failure() {
        let renderer = FixedRenderer(Vec::new());
        let dataset = Dataset::new("Data");
        let result = render_report(
            &renderer,
            &dataset,
            &TemplateSource::Inline("<Report/>".to_string()),
        )
        .await;
        assert!(matches!(result, Err(RenderError::EmptyOutput)));
    }

    #[tokio::test]
    async fn non_empty_output_passes_through_unchanged() {
        let renderer = FixedRenderer(b"%PDF-stub".to_vec());
        let dataset = Dataset::new("Data");
        let bytes = render_report(
            &renderer,
            &dataset,
            &TemplateSource::Inline("<Report/>".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(bytes, b"%PDF-stub");
    }

    #[test]
    fn cause_message_surfaces_the_nested_error() {
        let inner: Box<dyn std::error::Error + Send + Sync> =
            "glyph table exhausted".to_string().into();
        let err = RenderError::Render {
            message: "engine fault".to_string(),
            cause: Some(inner),
        };
        assert_eq!(err.cause_message().as_deref(), Some("glyph table exhausted"));
        assert!(RenderError::EmptyOutput.cause_message().is_none());
    }
}
