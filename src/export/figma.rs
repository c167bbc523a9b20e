// Figma-style scene-graph exporter
//
// Emits a nested document tree (document -> canvas -> frames). Bezier
// connectors come before the page frames so they render behind them.
// Colors follow the same status palette as the SVG exporter.

use crate::analysis::{bezier_path, grid_layout, GridOptions, PlacedNode};
use crate::error::Result;
use crate::export::{merge_option, ColorScheme, Exporter, ExportOptions};
use crate::graph::{FilterOptions, Page, PageId, SiteGraph, StatusClass};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Fixed canvas positions for the decorative frames
const TITLE_FRAME_POS: (f64, f64) = (16.0, 16.0);
const LEGEND_FRAME_POS: (f64, f64) = (16.0, 90.0);

/// Scene-graph exporter configuration
#[derive(Debug, Clone)]
pub struct FigmaConfig {
    pub filter: FilterOptions,
    pub scheme: ColorScheme,
    pub grid: GridOptions,
}

impl Default for FigmaConfig {
    fn default() -> Self {
        Self {
            filter: FilterOptions::default(),
            scheme: ColorScheme::Default,
            grid: GridOptions {
                base_y: 180.0,
                ..GridOptions::default()
            },
        }
    }
}

/// Scene-graph exporter
pub struct FigmaExporter {
    config: FigmaConfig,
}

impl FigmaExporter {
    pub fn new(config: FigmaConfig) -> Self {
        Self { config }
    }

    /// Build from user options merged over the scene-graph defaults
    pub fn from_options(options: &ExportOptions) -> Self {
        let defaults = FigmaConfig::default();
        Self::new(FigmaConfig {
            filter: options.filter(),
            scheme: merge_option(
                defaults.scheme,
                options.color_scheme.as_deref().map(ColorScheme::parse),
            ),
            grid: defaults.grid,
        })
    }

    fn render(&self, graph: &SiteGraph) -> Value {
        let pages = graph.filtered_pages(&self.config.filter);
        let links = graph.filtered_links(&self.config.filter);
        let index = graph.page_index(&pages);

        let placed = grid_layout(&pages, &self.config.grid);
        let positions: HashMap<PageId, &PlacedNode> =
            placed.iter().map(|p| (p.id, p)).collect();

        let mut ids = IdAllocator::default();
        let mut children: Vec<Value> = Vec::new();

        // Connectors first: z-order puts them behind the page frames
        for link in &links {
            let (Some(from), Some(to)) = (positions.get(&link.source), positions.get(&link.target))
            else {
                continue;
            };
            children.push(json!({
                "id": ids.next(),
                "type": "VECTOR",
                "name": format!("connector-{}-{}", link.source.0, link.target.0),
                "strokes": [{"type": "SOLID", "color": self.config.scheme.link_color(link.kind)}],
                "strokeWeight": 1.5,
                "strokeDashes": if link.is_external { json!([6, 4]) } else { json!([]) },
                "vectorPath": bezier_path(from.bottom_center(), to.top_center()),
            }));
        }

        for node in &placed {
            let Some(page) = index.get(&node.id) else {
                continue;
            };
            children.push(self.page_frame(&mut ids, node, page));
        }

        children.push(self.title_frame(&mut ids, graph));
        children.push(self.legend_frame(&mut ids));

        json!({
            "name": format!("{} Site Architecture", graph.metadata.project_name),
            "lastModified": graph.metadata.generated_at.to_rfc3339(),
            "document": {
                "id": "0:0",
                "type": "DOCUMENT",
                "children": [{
                    "id": "0:1",
                    "type": "CANVAS",
                    "name": "Site Map",
                    "backgroundColor": self.config.scheme.background(),
                    "children": children,
                }],
            },
        })
    }

    fn page_frame(&self, ids: &mut IdAllocator, node: &PlacedNode, page: &Page) -> Value {
        let status = page.status_class();
        let accent = self.config.scheme.status_color(status);
        json!({
            "id": ids.next(),
            "type": "FRAME",
            "name": page.display_title(),
            "x": node.x,
            "y": node.y,
            "width": node.width,
            "height": node.height,
            "cornerRadius": 6,
            "fills": [{"type": "SOLID", "color": self.config.scheme.background()}],
            "strokes": [{"type": "SOLID", "color": accent}],
            "strokeWeight": 2,
            "children": [
                {
                    "id": ids.next(),
                    "type": "TEXT",
                    "name": "title",
                    "characters": page.display_title(),
                    "x": 8, "y": 8,
                    "fontSize": 13,
                    "fills": [{"type": "SOLID", "color": self.config.scheme.text_color()}],
                },
                {
                    "id": ids.next(),
                    "type": "TEXT",
                    "name": "path",
                    "characters": page.path.as_str(),
                    "x": 8, "y": 28,
                    "fontSize": 10,
                    "fills": [{"type": "SOLID", "color": self.config.scheme.text_color()}],
                },
                {
                    "id": ids.next(),
                    "type": "FRAME",
                    "name": "depth-badge",
                    "x": node.width - 28.0, "y": 6,
                    "width": 22, "height": 16,
                    "cornerRadius": 8,
                    "fills": [{"type": "SOLID", "color": accent}],
                    "children": [{
                        "id": ids.next(),
                        "type": "TEXT",
                        "name": "depth",
                        "characters": page.depth.to_string(),
                        "fontSize": 9,
                        "fills": [{"type": "SOLID", "color": "#ffffff"}],
                    }],
                },
            ],
        })
    }

    fn title_frame(&self, ids: &mut IdAllocator, graph: &SiteGraph) -> Value {
        let meta = &graph.metadata;
        json!({
            "id": ids.next(),
            "type": "FRAME",
            "name": "title",
            "x": TITLE_FRAME_POS.0,
            "y": TITLE_FRAME_POS.1,
            "width": 360, "height": 60,
            "fills": [],
            "children": [
                {
                    "id": ids.next(),
                    "type": "TEXT",
                    "name": "project",
                    "characters": meta.project_name.as_str(),
                    "fontSize": 22,
                    "fills": [{"type": "SOLID", "color": self.config.scheme.text_color()}],
                },
                {
                    "id": ids.next(),
                    "type": "TEXT",
                    "name": "subtitle",
                    "characters": format!(
                        "{} pages, {} links, exported {}",
                        meta.total_pages,
                        meta.total_links,
                        meta.generated_at.format("%Y-%m-%d")
                    ),
                    "y": 32,
                    "fontSize": 11,
                    "fills": [{"type": "SOLID", "color": self.config.scheme.text_color()}],
                },
            ],
        })
    }

    fn legend_frame(&self, ids: &mut IdAllocator) -> Value {
        let swatches: Vec<Value> = [
            StatusClass::Ok,
            StatusClass::Redirect,
            StatusClass::Error,
            StatusClass::Orphan,
        ]
        .iter()
        .enumerate()
        .map(|(i, status)| {
            json!({
                "id": ids.next(),
                "type": "FRAME",
                "name": format!("legend-{}", status.name()),
                "x": 0, "y": i * 22,
                "width": 140, "height": 18,
                "fills": [],
                "children": [
                    {
                        "id": ids.next(),
                        "type": "RECTANGLE",
                        "name": "swatch",
                        "width": 12, "height": 12,
                        "fills": [{"type": "SOLID", "color": self.config.scheme.status_color(*status)}],
                    },
                    {
                        "id": ids.next(),
                        "type": "TEXT",
                        "name": "label",
                        "characters": status.name(),
                        "x": 20,
                        "fontSize": 11,
                        "fills": [{"type": "SOLID", "color": self.config.scheme.text_color()}],
                    },
                ],
            })
        })
        .collect();

        json!({
            "id": ids.next(),
            "type": "FRAME",
            "name": "legend",
            "x": LEGEND_FRAME_POS.0,
            "y": LEGEND_FRAME_POS.1,
            "width": 150, "height": 96,
            "fills": [],
            "children": swatches,
        })
    }
}

impl Exporter for FigmaExporter {
    fn generate(&self, graph: &SiteGraph) -> Result<Vec<u8>> {
        let doc = self.render(graph);
        let mut bytes = serde_json::to_vec_pretty(&doc)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn extension(&self) -> &'static str {
        ".fig.json"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }
}

/// Sequential node ids in Figma's "session:local" style
#[derive(Debug, Default)]
struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    fn next(&mut self) -> String {
        self.next += 1;
        format!("1:{}", self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Link, LinkKind, Page, SiteMetadata};
    use chrono::{TimeZone, Utc};

    fn make_graph() -> SiteGraph {
        let pages = vec![
            Page {
                id: PageId(1),
                url: "https://example.com/".to_string(),
                path: "/".to_string(),
                title: Some("Home".to_string()),
                depth: 0,
                http_status: 200,
                inbound_count: 2,
                outbound_count: 1,
                link_equity: 1.0,
            },
            Page {
                id: PageId(2),
                url: "https://example.com/about".to_string(),
                path: "/about".to_string(),
                title: None,
                depth: 1,
                http_status: 200,
                inbound_count: 1,
                outbound_count: 0,
                link_equity: 0.4,
            },
        ];
        let links = vec![Link {
            source: PageId(1),
            target: PageId(2),
            kind: LinkKind::Navigation,
            anchor_text: None,
            is_external: false,
        }];
        SiteGraph {
            metadata: SiteMetadata {
                project_name: "Example".to_string(),
                generated_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
                total_pages: 2,
                total_links: 1,
                max_depth: 1,
                orphan_count: 0,
                error_count: 0,
                last_crawled_at: None,
            },
            pages,
            links,
        }
    }

    fn parse(exporter: &FigmaExporter, graph: &SiteGraph) -> Value {
        let bytes = exporter.generate(graph).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn canvas_children(doc: &Value) -> &Vec<Value> {
        doc["document"]["children"][0]["children"]
            .as_array()
            .unwrap()
    }

    #[test]
    fn test_document_structure() {
        let exporter = FigmaExporter::new(FigmaConfig::default());
        let doc = parse(&exporter, &make_graph());

        assert_eq!(doc["document"]["type"], "DOCUMENT");
        assert_eq!(doc["document"]["children"][0]["type"], "CANVAS");
        assert_eq!(doc["name"], "Example Site Architecture");
    }

    #[test]
    fn test_connectors_before_frames() {
        let exporter = FigmaExporter::new(FigmaConfig::default());
        let doc = parse(&exporter, &make_graph());
        let children = canvas_children(&doc);

        let first_vector = children.iter().position(|c| c["type"] == "VECTOR");
        let first_frame = children.iter().position(|c| c["type"] == "FRAME");
        assert!(first_vector.unwrap() < first_frame.unwrap());
    }

    #[test]
    fn test_page_frames_carry_title_path_and_badge() {
        let exporter = FigmaExporter::new(FigmaConfig::default());
        let doc = parse(&exporter, &make_graph());
        let children = canvas_children(&doc);

        let about = children
            .iter()
            .find(|c| c["name"] == "About")
            .expect("frame for /about");
        let names: Vec<&str> = about["children"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["title", "path", "depth-badge"]);
        assert_eq!(about["children"][1]["characters"], "/about");
        assert_eq!(about["children"][2]["children"][0]["characters"], "1");
    }

    #[test]
    fn test_title_and_legend_frames_present() {
        let exporter = FigmaExporter::new(FigmaConfig::default());
        let doc = parse(&exporter, &make_graph());
        let children = canvas_children(&doc);

        assert!(children.iter().any(|c| c["name"] == "title"));
        let legend = children.iter().find(|c| c["name"] == "legend").unwrap();
        assert_eq!(legend["children"].as_array().unwrap().len(), 4);
        assert_eq!(legend["x"], LEGEND_FRAME_POS.0);
    }

    #[test]
    fn test_bezier_connector_path() {
        let exporter = FigmaExporter::new(FigmaConfig::default());
        let doc = parse(&exporter, &make_graph());
        let children = canvas_children(&doc);

        let connector = children.iter().find(|c| c["type"] == "VECTOR").unwrap();
        let path = connector["vectorPath"].as_str().unwrap();
        assert!(path.starts_with("M "));
        assert!(path.contains(" C "));
    }

    #[test]
    fn test_deterministic_output() {
        let graph = make_graph();
        let a = FigmaExporter::new(FigmaConfig::default()).generate(&graph).unwrap();
        let b = FigmaExporter::new(FigmaConfig::default()).generate(&graph).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_mime_and_extension() {
        let exporter = FigmaExporter::new(FigmaConfig::default());
        assert_eq!(exporter.extension(), ".fig.json");
        assert_eq!(exporter.mime_type(), "application/json");
    }
}
