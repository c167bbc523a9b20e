//! Siteatlas - export site architecture graphs as diagrams and reports
//!
//! Takes a crawler's page-link snapshot and renders it as an SVG
//! diagram, Mermaid markup, a Figma-style scene graph, or a PDF report,
//! all sharing one statistics and recommendation pipeline.

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod graph;

// Re-export main types
pub use analysis::SiteInsights;
pub use config::Config;
pub use error::{Error, Result};
pub use export::{export, ExportArtifact, ExportFormat, ExportOptions, Exporter};
pub use graph::SiteGraph;
