// SVG vector diagram exporter
//
// Self-contained document: style block, status legend, metadata box,
// one rect-and-label group per page on the hierarchical grid, straight
// edges colored by link kind and dashed when external.

use crate::analysis::{grid_layout, GridOptions, PlacedNode};
use crate::error::Result;
use crate::export::{merge_option, ColorScheme, Exporter, ExportOptions};
use crate::graph::{FilterOptions, PageId, SiteGraph, StatusClass};
use std::collections::HashMap;

const MARGIN: f64 = 40.0;
const LEGEND_WIDTH: f64 = 150.0;
const METADATA_WIDTH: f64 = 220.0;
const NODE_LABEL_MAX: usize = 22;

/// SVG exporter configuration
#[derive(Debug, Clone)]
pub struct SvgConfig {
    pub filter: FilterOptions,
    pub scheme: ColorScheme,
    pub grid: GridOptions,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            filter: FilterOptions::default(),
            scheme: ColorScheme::Default,
            grid: GridOptions::default(),
        }
    }
}

/// Vector diagram exporter
pub struct SvgExporter {
    config: SvgConfig,
}

impl SvgExporter {
    pub fn new(config: SvgConfig) -> Self {
        Self { config }
    }

    /// Build from user options merged over the SVG defaults
    pub fn from_options(options: &ExportOptions) -> Self {
        let defaults = SvgConfig::default();
        Self::new(SvgConfig {
            filter: options.filter(),
            scheme: merge_option(
                defaults.scheme,
                options.color_scheme.as_deref().map(ColorScheme::parse),
            ),
            grid: defaults.grid,
        })
    }

    fn render(&self, graph: &SiteGraph) -> String {
        let pages = graph.filtered_pages(&self.config.filter);
        let links = graph.filtered_links(&self.config.filter);
        let index = graph.page_index(&pages);

        let placed = grid_layout(&pages, &self.config.grid);
        let positions: HashMap<PageId, &PlacedNode> =
            placed.iter().map(|p| (p.id, p)).collect();

        let depth_levels = SiteGraph::max_depth_of(&pages) + 1;
        let height = self.config.grid.base_y
            + f64::from(depth_levels) * self.config.grid.level_spacing
            + MARGIN;
        let width = self.config.grid.canvas_width;
        let scheme = self.config.scheme;

        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n",
        ));
        svg.push_str(&self.style_block());
        svg.push_str(&format!(
            "  <rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
            scheme.background()
        ));

        // Edges first so nodes draw on top. Links whose endpoint was
        // filtered out are skipped.
        for link in &links {
            let (Some(from), Some(to)) = (positions.get(&link.source), positions.get(&link.target))
            else {
                continue;
            };
            let (x1, y1) = from.bottom_center();
            let (x2, y2) = to.top_center();
            let dash = if link.is_external {
                " stroke-dasharray=\"6 4\""
            } else {
                ""
            };
            svg.push_str(&format!(
                "  <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"1.4\"{}/>\n",
                x1,
                y1,
                x2,
                y2,
                scheme.link_color(link.kind),
                dash
            ));
        }

        for node in &placed {
            // positions only holds filtered pages, so the lookup succeeds
            let Some(page) = index.get(&node.id) else {
                continue;
            };
            let status = page.status_class();
            let label = truncate_label(&page.display_title(), NODE_LABEL_MAX);
            let (cx, _) = node.center();

            svg.push_str(&format!("  <g class=\"node {}\">\n", status.name()));
            svg.push_str(&format!(
                "    <rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" rx=\"6\" fill=\"{}\" stroke=\"{}\"/>\n",
                node.x,
                node.y,
                node.width,
                node.height,
                scheme.background(),
                scheme.status_color(status)
            ));
            svg.push_str(&format!(
                "    <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" class=\"label\">{}</text>\n",
                cx,
                node.y + 26.0,
                escape_xml(&label)
            ));
            svg.push_str(&format!(
                "    <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" class=\"path\">{}</text>\n",
                cx,
                node.y + 44.0,
                escape_xml(&truncate_label(&page.path, NODE_LABEL_MAX))
            ));
            svg.push_str("  </g>\n");
        }

        svg.push_str(&self.metadata_box(graph, pages.len(), links.len()));
        svg.push_str(&self.legend(width));
        svg.push_str("</svg>\n");
        svg
    }

    fn style_block(&self) -> String {
        let scheme = self.config.scheme;
        format!(
            "  <style>\n    \
             .label {{ font-family: sans-serif; font-size: 13px; fill: {text}; }}\n    \
             .path {{ font-family: monospace; font-size: 10px; fill: {text}; opacity: 0.7; }}\n    \
             .meta {{ font-family: sans-serif; font-size: 11px; fill: {text}; }}\n  \
             </style>\n",
            text = scheme.text_color()
        )
    }

    fn metadata_box(&self, graph: &SiteGraph, page_count: usize, link_count: usize) -> String {
        let meta = &graph.metadata;
        let scheme = self.config.scheme;
        let lines = [
            meta.project_name.clone(),
            format!("{} pages, {} links", page_count, link_count),
            format!("max depth {}", meta.max_depth),
            format!("exported {}", meta.generated_at.format("%Y-%m-%d")),
        ];

        let mut block = format!(
            "  <g class=\"metadata\">\n    <rect x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"86\" rx=\"4\" fill=\"none\" stroke=\"{stroke}\"/>\n",
            x = 16.0,
            y = 16.0,
            w = METADATA_WIDTH,
            stroke = scheme.text_color()
        );
        for (i, line) in lines.iter().enumerate() {
            block.push_str(&format!(
                "    <text x=\"26\" y=\"{:.1}\" class=\"meta\">{}</text>\n",
                36.0 + i as f64 * 18.0,
                escape_xml(line)
            ));
        }
        block.push_str("  </g>\n");
        block
    }

    fn legend(&self, canvas_width: f64) -> String {
        let scheme = self.config.scheme;
        let x = canvas_width - LEGEND_WIDTH - 16.0;
        let statuses = [
            StatusClass::Ok,
            StatusClass::Redirect,
            StatusClass::Error,
            StatusClass::Orphan,
        ];

        let mut block = format!(
            "  <g class=\"legend\">\n    <rect x=\"{x:.1}\" y=\"16\" width=\"{LEGEND_WIDTH}\" height=\"100\" rx=\"4\" fill=\"none\" stroke=\"{}\"/>\n",
            scheme.text_color()
        );
        for (i, status) in statuses.iter().enumerate() {
            let y = 30.0 + i as f64 * 20.0;
            block.push_str(&format!(
                "    <rect x=\"{:.1}\" y=\"{:.1}\" width=\"12\" height=\"12\" fill=\"{}\"/>\n",
                x + 10.0,
                y,
                scheme.status_color(*status)
            ));
            block.push_str(&format!(
                "    <text x=\"{:.1}\" y=\"{:.1}\" class=\"meta\">{}</text>\n",
                x + 30.0,
                y + 10.0,
                status.name()
            ));
        }
        block.push_str("  </g>\n");
        block
    }
}

impl Exporter for SvgExporter {
    fn generate(&self, graph: &SiteGraph) -> Result<Vec<u8>> {
        Ok(self.render(graph).into_bytes())
    }

    fn extension(&self) -> &'static str {
        ".svg"
    }

    fn mime_type(&self) -> &'static str {
        "image/svg+xml"
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Shorten a label to fit a node, adding an ellipsis
fn truncate_label(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept.trim_end())
    }
}
