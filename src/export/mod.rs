// Export strategy set: four generators behind one trait, plus the
// façade that resolves a format name, merges options and returns the
// finished artifact.

pub mod figma;
pub mod mermaid;
pub mod report;
pub mod svg;

pub use figma::FigmaExporter;
pub use mermaid::{DiagramType, MermaidExporter};
pub use report::{PassthroughRenderer, PdfRenderer, ReportExporter};
pub use svg::SvgExporter;

use crate::error::{Error, Result};
use crate::graph::{FilterOptions, LinkKind, SiteGraph, SiteMetadata, StatusClass};

/// One export strategy. Each implementation is a single-pass,
/// side-effect-free transformation; failure returns no partial output.
pub trait Exporter {
    /// Render the artifact bytes
    fn generate(&self, graph: &SiteGraph) -> Result<Vec<u8>>;

    /// File extension including the leading dot
    fn extension(&self) -> &'static str;

    /// Declared MIME type
    fn mime_type(&self) -> &'static str;

    /// Suggested filename: slugified project name plus export date
    fn filename(&self, metadata: &SiteMetadata) -> String {
        format!(
            "{}-{}{}",
            slugify(&metadata.project_name),
            metadata.generated_at.format("%Y-%m-%d"),
            self.extension()
        )
    }
}

/// The artifact formats the engine can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Mermaid,
    Figma,
    Report,
}

impl ExportFormat {
    /// Parse a format name as supplied by callers
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "svg" => Ok(ExportFormat::Svg),
            "mermaid" | "mmd" => Ok(ExportFormat::Mermaid),
            "figma" => Ok(ExportFormat::Figma),
            "report" | "pdf" => Ok(ExportFormat::Report),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

/// User-supplied option overrides. Unset fields keep each exporter's
/// defaults; fields a format does not recognize are ignored.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub include_errors: Option<bool>,
    pub include_external: Option<bool>,
    pub diagram_type: Option<String>,
    pub direction: Option<String>,
    pub max_label_length: Option<usize>,
    pub page_size: Option<String>,
    pub orientation: Option<String>,
    pub color_scheme: Option<String>,
}

impl ExportOptions {
    /// Resolve the filter options over the shared defaults
    pub fn filter(&self) -> FilterOptions {
        FilterOptions {
            include_errors: merge_option(false, self.include_errors),
            include_external: merge_option(false, self.include_external),
        }
    }
}

/// Overrides win; unset keeps the default
pub fn merge_option<T>(default: T, user: Option<T>) -> T {
    user.unwrap_or(default)
}

/// Status and link colors shared by the SVG and Figma exporters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    #[default]
    Default,
    Dark,
}

impl ColorScheme {
    /// Fall back to the default scheme on unrecognized names
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dark" => ColorScheme::Dark,
            _ => ColorScheme::Default,
        }
    }

    /// Fill color for a status bucket
    pub fn status_color(&self, status: StatusClass) -> &'static str {
        match (self, status) {
            (ColorScheme::Default, StatusClass::Ok) => "#2e7d32",
            (ColorScheme::Default, StatusClass::Redirect) => "#f9a825",
            (ColorScheme::Default, StatusClass::Error) => "#c62828",
            (ColorScheme::Default, StatusClass::Orphan) => "#6a1b9a",
            (ColorScheme::Dark, StatusClass::Ok) => "#81c784",
            (ColorScheme::Dark, StatusClass::Redirect) => "#ffd54f",
            (ColorScheme::Dark, StatusClass::Error) => "#e57373",
            (ColorScheme::Dark, StatusClass::Orphan) => "#ba68c8",
        }
    }

    /// Stroke color for a link kind
    pub fn link_color(&self, kind: LinkKind) -> &'static str {
        match kind {
            LinkKind::Navigation => "#1565c0",
            LinkKind::Breadcrumb | LinkKind::Pagination => "#00838f",
            LinkKind::Footer | LinkKind::Sidebar | LinkKind::Header => "#78909c",
            LinkKind::External => "#9e9e9e",
            LinkKind::Content | LinkKind::Unknown => match self {
                ColorScheme::Default => "#455a64",
                ColorScheme::Dark => "#b0bec5",
            },
        }
    }

    /// Canvas background
    pub fn background(&self) -> &'static str {
        match self {
            ColorScheme::Default => "#ffffff",
            ColorScheme::Dark => "#1e1e2e",
        }
    }

    /// Primary text color
    pub fn text_color(&self) -> &'static str {
        match self {
            ColorScheme::Default => "#212121",
            ColorScheme::Dark => "#eceff1",
        }
    }
}

/// The finished export: bytes plus delivery metadata
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: &'static str,
}

/// Resolve a format to its exporter and run it.
///
/// Validates the snapshot first; a malformed graph produces no partial
/// artifact. The PDF renderer is only consulted for the report format.
pub fn export(
    graph: &SiteGraph,
    format: ExportFormat,
    options: &ExportOptions,
    pdf_renderer: &dyn PdfRenderer,
) -> Result<ExportArtifact> {
    graph.validate()?;

    let exporter: Box<dyn Exporter + '_> = match format {
        ExportFormat::Svg => Box::new(SvgExporter::from_options(options)),
        ExportFormat::Mermaid => Box::new(MermaidExporter::from_options(options)),
        ExportFormat::Figma => Box::new(FigmaExporter::from_options(options)),
        ExportFormat::Report => Box::new(ReportExporter::from_options(options, pdf_renderer)?),
    };

    let bytes = exporter.generate(graph)?;
    Ok(ExportArtifact {
        bytes,
        filename: exporter.filename(&graph.metadata),
        mime_type: exporter.mime_type(),
    })
}

/// Convert text to a filename-friendly slug
pub fn slugify(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
