//! frx-pdf-service: HTTP service rendering frx report templates to PDF.
//!
//! Inbound JSON is projected into a tabular [`dataset::Dataset`] (each
//! top-level array or object becomes a named table), then handed to a
//! [`render::ReportRenderer`] together with a template reference. The
//! renderer is an injected trait object; [`render::FrxEngine`] is the
//! implementation the binary ships with.

pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod render;
pub mod state;
pub mod template;
