// Mermaid diagram-as-code exporter
//
// Three modes behind one `diagram_type` option: flowchart (status
// shapes, optional depth subgraphs, typed edges), mindmap (recursive
// tree, one indent level per depth) and graph (flat node/edge list).

use crate::analysis::{build_tree, TreeNode};
use crate::error::Result;
use crate::export::{merge_option, ColorScheme, Exporter, ExportOptions};
use crate::graph::{FilterOptions, Link, LinkKind, Page, PageId, SiteGraph, StatusClass};
use std::collections::HashMap;

/// Anchor text longer than this is dropped from edge labels
const EDGE_LABEL_MAX: usize = 20;

/// Which Mermaid dialect to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagramType {
    #[default]
    Flowchart,
    Mindmap,
    Graph,
}

impl DiagramType {
    /// Unrecognized names fall back to the flowchart default
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "mindmap" => DiagramType::Mindmap,
            "graph" => DiagramType::Graph,
            _ => DiagramType::Flowchart,
        }
    }
}

/// Mermaid exporter configuration
#[derive(Debug, Clone)]
pub struct MermaidConfig {
    pub filter: FilterOptions,
    pub diagram_type: DiagramType,
    /// Layout direction (TB, LR, BT, RL)
    pub direction: String,
    pub max_label_length: usize,
    /// Wrap each depth level in a subgraph (flowchart mode)
    pub group_by_depth: bool,
    pub scheme: ColorScheme,
}

impl Default for MermaidConfig {
    fn default() -> Self {
        Self {
            filter: FilterOptions::default(),
            diagram_type: DiagramType::default(),
            direction: "TB".to_string(),
            max_label_length: 30,
            group_by_depth: true,
            scheme: ColorScheme::Default,
        }
    }
}

/// Diagram markup exporter
pub struct MermaidExporter {
    config: MermaidConfig,
}

impl MermaidExporter {
    pub fn new(config: MermaidConfig) -> Self {
        Self { config }
    }

    /// Build from user options merged over the Mermaid defaults
    pub fn from_options(options: &ExportOptions) -> Self {
        let defaults = MermaidConfig::default();
        Self::new(MermaidConfig {
            filter: options.filter(),
            diagram_type: merge_option(
                defaults.diagram_type,
                options.diagram_type.as_deref().map(DiagramType::parse),
            ),
            direction: merge_option(
                defaults.direction,
                options.direction.as_ref().map(|d| normalize_direction(d)),
            ),
            max_label_length: merge_option(defaults.max_label_length, options.max_label_length)
                .max(4),
            group_by_depth: defaults.group_by_depth,
            scheme: merge_option(
                defaults.scheme,
                options.color_scheme.as_deref().map(ColorScheme::parse),
            ),
        })
    }

    fn render(&self, graph: &SiteGraph) -> String {
        let pages = graph.filtered_pages(&self.config.filter);
        let links = graph.filtered_links(&self.config.filter);

        match self.config.diagram_type {
            DiagramType::Flowchart => self.render_flowchart(graph, &pages, &links),
            DiagramType::Mindmap => self.render_mindmap(graph, &pages, &links),
            DiagramType::Graph => self.render_graph(graph, &pages, &links),
        }
    }

    fn render_flowchart(
        &self,
        graph: &SiteGraph,
        pages: &[&Page],
        links: &[&Link],
    ) -> String {
        let index = graph.page_index(pages);
        let mut lines = vec![format!("flowchart {}", self.config.direction)];

        if self.config.group_by_depth {
            let max_depth = SiteGraph::max_depth_of(pages);
            for depth in 0..=max_depth {
                let level: Vec<&&Page> = pages.iter().filter(|p| p.depth == depth).collect();
                if level.is_empty() {
                    continue;
                }
                lines.push(format!("    subgraph d{} [\"Depth {}\"]", depth, depth));
                for page in level {
                    lines.push(format!("        {}", self.node_line(page)));
                }
                lines.push("    end".to_string());
            }
        } else {
            for page in pages {
                lines.push(format!("    {}", self.node_line(page)));
            }
        }

        for link in links {
            if !index.contains_key(&link.source) || !index.contains_key(&link.target) {
                continue;
            }
            let arrow = match (link.is_external, link.kind) {
                (true, _) => "-.->",
                (_, LinkKind::Navigation) => "==>",
                _ => "-->",
            };
            let label = link
                .anchor_text
                .as_deref()
                .filter(|t| t.chars().count() <= EDGE_LABEL_MAX)
                .map(|t| format!("|{}|", escape_label(t, self.config.max_label_length)))
                .unwrap_or_default();
            lines.push(format!(
                "    {} {}{} {}",
                node_id(link.source),
                arrow,
                label,
                node_id(link.target)
            ));
        }

        lines.extend(self.class_defs());
        lines.join("\n")
    }

    fn render_mindmap(
        &self,
        _graph: &SiteGraph,
        pages: &[&Page],
        links: &[&Link],
    ) -> String {
        let max_depth = SiteGraph::max_depth_of(pages);
        let roots = build_tree(pages, links, max_depth);
        let by_id: HashMap<PageId, &&Page> = pages.iter().map(|p| (p.id, p)).collect();

        let mut lines = vec!["mindmap".to_string()];
        for root in &roots {
            self.render_branch(root, &by_id, &mut lines);
        }
        lines.join("\n")
    }

    fn render_branch(
        &self,
        node: &TreeNode,
        by_id: &HashMap<PageId, &&Page>,
        lines: &mut Vec<String>,
    ) {
        let Some(page) = by_id.get(&node.id) else {
            return;
        };
        let indent = "  ".repeat(node.depth as usize + 1);
        lines.push(format!("{}{}", indent, self.node_shape(page)));
        for child in &node.children {
            self.render_branch(child, by_id, lines);
        }
    }

    fn render_graph(
        &self,
        graph: &SiteGraph,
        pages: &[&Page],
        links: &[&Link],
    ) -> String {
        let index = graph.page_index(pages);
        let mut lines = vec![format!("graph {}", self.config.direction)];

        for page in pages {
            let label = escape_label(&page.display_title(), self.config.max_label_length);
            lines.push(format!(
                "    {}[\"{}\"]:::{}",
                node_id(page.id),
                label,
                page.status_class().name()
            ));
        }

        for link in links {
            if !index.contains_key(&link.source) || !index.contains_key(&link.target) {
                continue;
            }
            lines.push(format!(
                "    {} --> {}",
                node_id(link.source),
                node_id(link.target)
            ));
        }

        lines.extend(self.class_defs());
        lines.join("\n")
    }

    /// A node statement with shape and status class
    fn node_line(&self, page: &Page) -> String {
        format!("{}:::{}", self.node_shape(page), page.status_class().name())
    }

    /// Shape per status: error pages double-circled, orphans hexagonal,
    /// entry points rounded, the rest plain rectangles
    fn node_shape(&self, page: &Page) -> String {
        let id = node_id(page.id);
        let label = escape_label(&page.display_title(), self.config.max_label_length);
        match page.status_class() {
            StatusClass::Error => format!("{}(((\"{}\")))", id, label),
            StatusClass::Orphan => format!("{}{{{{\"{}\"}}}}", id, label),
            _ if page.depth == 0 => format!("{}(\"{}\")", id, label),
            _ => format!("{}[\"{}\"]", id, label),
        }
    }

    fn class_defs(&self) -> Vec<String> {
        let scheme = self.config.scheme;
        [
            StatusClass::Ok,
            StatusClass::Redirect,
            StatusClass::Error,
            StatusClass::Orphan,
        ]
        .iter()
        .map(|status| {
            format!(
                "    classDef {} stroke:{},stroke-width:2px",
                status.name(),
                scheme.status_color(*status)
            )
        })
        .collect()
    }
}

impl Exporter for MermaidExporter {
    fn generate(&self, graph: &SiteGraph) -> Result<Vec<u8>> {
        Ok(self.render(graph).into_bytes())
    }

    fn extension(&self) -> &'static str {
        ".mmd"
    }

    fn mime_type(&self) -> &'static str {
        "text/plain"
    }
}

fn node_id(id: PageId) -> String {
    format!("p{}", id.0)
}

fn normalize_direction(dir: &str) -> String {
    match dir.to_uppercase().as_str() {
        d @ ("TB" | "LR" | "BT" | "RL") => d.to_string(),
        _ => "TB".to_string(),
    }
}

/// Strip markup-significant characters and truncate with an ellipsis.
///
/// Quotes, brackets, braces, angle brackets and hashes would break the
/// Mermaid grammar; ampersands read better as "and".
fn escape_label(s: &str, max: usize) -> String {
    let cleaned: String = s
        .replace('&', "and")
        .chars()
        .filter(|c| !matches!(c, '"' | '[' | ']' | '{' | '}' | '<' | '>' | '#'))
        .collect();
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    if cleaned.chars().count() <= max {
        cleaned
    } else {
        let kept: String = cleaned.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept.trim_end())
    }
}
