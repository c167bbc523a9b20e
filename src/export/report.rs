// Statistical report exporter
//
// Builds a complete, self-styled HTML document from the shared
// analysis pipeline and hands it to the PDF render collaborator.
// This exporter's responsibility ends at the HTML plus page setup;
// the backend owns rasterization, timeouts and retries.

use crate::analysis::{Priority, SiteInsights};
use crate::error::Result;
use crate::export::{merge_option, Exporter, ExportOptions};
use crate::graph::{FilterOptions, SiteGraph};
use serde::Serialize;
use tera::{Context, Tera};

/// Inventory table covers at most this many pages
const INVENTORY_LIMIT: usize = 50;

/// Paper size passed through to the render backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Unrecognized names fall back to A4
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "letter" => PageSize::Letter,
            _ => PageSize::A4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "landscape" => Orientation::Landscape,
            _ => Orientation::Portrait,
        }
    }
}

/// Page setup forwarded to the render backend
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PageSetup {
    pub size: PageSize,
    pub orientation: Orientation,
}

/// The opaque HTML-to-PDF collaborator. Implementations own their
/// timeout policy; failures surface as `Error::RenderBackend` with no
/// retry here.
pub trait PdfRenderer {
    fn render_pdf(&self, html: &str, setup: &PageSetup) -> Result<Vec<u8>>;
}

/// Stand-in renderer that passes the HTML bytes straight through.
/// Used by the CLI and tests; the SaaS host wires the real backend.
#[derive(Debug, Default)]
pub struct PassthroughRenderer;

impl PdfRenderer for PassthroughRenderer {
    fn render_pdf(&self, html: &str, _setup: &PageSetup) -> Result<Vec<u8>> {
        Ok(html.as_bytes().to_vec())
    }
}

/// Report exporter configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportConfig {
    pub filter: FilterOptions,
    pub page: PageSetup,
}

/// PDF report exporter
pub struct ReportExporter<'a> {
    config: ReportConfig,
    tera: Tera,
    renderer: &'a dyn PdfRenderer,
}

#[derive(Serialize)]
struct PageRow {
    title: String,
    path: String,
    status: &'static str,
    status_color: &'static str,
    depth: u32,
    inbound: u32,
}

#[derive(Serialize)]
struct FindingRow {
    priority: &'static str,
    color: &'static str,
    category: String,
    title: String,
    description: String,
    affected_count: Option<usize>,
}

impl<'a> ReportExporter<'a> {
    pub fn new(config: ReportConfig, renderer: &'a dyn PdfRenderer) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![(
            "report.html",
            include_str!("../../templates/report.html.tera"),
        )])?;
        Ok(Self {
            config,
            tera,
            renderer,
        })
    }

    /// Build from user options merged over the report defaults
    pub fn from_options(options: &ExportOptions, renderer: &'a dyn PdfRenderer) -> Result<Self> {
        let defaults = ReportConfig::default();
        Self::new(
            ReportConfig {
                filter: options.filter(),
                page: PageSetup {
                    size: merge_option(
                        defaults.page.size,
                        options.page_size.as_deref().map(PageSize::parse),
                    ),
                    orientation: merge_option(
                        defaults.page.orientation,
                        options.orientation.as_deref().map(Orientation::parse),
                    ),
                },
            },
            renderer,
        )
    }

    /// Render the self-styled HTML document
    pub fn render_html(&self, graph: &SiteGraph) -> Result<String> {
        let insights = SiteInsights::compute(graph, &self.config.filter);
        let pages = graph.filtered_pages(&self.config.filter);

        let inventory: Vec<PageRow> = pages
            .iter()
            .take(INVENTORY_LIMIT)
            .map(|p| {
                let status = p.status_class();
                PageRow {
                    title: p.display_title(),
                    path: p.path.clone(),
                    status: status.name(),
                    status_color: crate::export::ColorScheme::Default.status_color(status),
                    depth: p.depth,
                    inbound: p.inbound_count,
                }
            })
            .collect();

        let findings: Vec<FindingRow> = insights
            .recommendations
            .iter()
            .map(|r| FindingRow {
                priority: r.priority.name(),
                color: priority_color(r.priority),
                category: r.category.clone(),
                title: r.title.clone(),
                description: r.description.clone(),
                affected_count: r.affected_count,
            })
            .collect();

        let score = insights.statistics.health_score;
        let mut context = Context::new();
        context.insert("project_name", &graph.metadata.project_name);
        context.insert(
            "generated_at",
            &graph.metadata.generated_at.format("%Y-%m-%d").to_string(),
        );
        context.insert("stats", &insights.statistics);
        context.insert("health_color", health_color(score));
        context.insert("inventory", &inventory);
        context.insert("inventory_truncated", &(pages.len() > INVENTORY_LIMIT));
        context.insert("findings", &findings);
        context.insert("page_size", &self.config.page.size);
        context.insert("orientation", &self.config.page.orientation);

        Ok(self.tera.render("report.html", &context)?)
    }
}

impl Exporter for ReportExporter<'_> {
    fn generate(&self, graph: &SiteGraph) -> Result<Vec<u8>> {
        let html = self.render_html(graph)?;
        self.renderer.render_pdf(&html, &self.config.page)
    }

    fn extension(&self) -> &'static str {
        ".pdf"
    }

    fn mime_type(&self) -> &'static str {
        "application/pdf"
    }
}

/// Badge color for the health score
fn health_color(score: u8) -> &'static str {
    if score >= 80 {
        "#2e7d32"
    } else if score >= 50 {
        "#f9a825"
    } else {
        "#c62828"
    }
}

/// Callout accent per priority
fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::Critical => "#c62828",
        Priority::High => "#ef6c00",
        Priority::Medium => "#f9a825",
        Priority::Low => "#1565c0",
    }
}
