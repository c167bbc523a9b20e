// Analysis pipeline shared by every exporter

pub mod layout;
pub mod recommend;
pub mod stats;

pub use layout::{bezier_path, build_tree, grid_layout, GridOptions, PlacedNode, TreeNode};
pub use recommend::{generate_recommendations, recommendations_from_stats, Priority, Recommendation};
pub use stats::{compute_statistics, Statistics};

use crate::graph::{FilterOptions, SiteGraph};

/// Statistics and recommendations computed in one pass over a
/// filtered view of the graph
#[derive(Debug, Clone)]
pub struct SiteInsights {
    pub statistics: Statistics,
    pub recommendations: Vec<Recommendation>,
}

impl SiteInsights {
    /// Analyze the graph under the given filter
    pub fn compute(graph: &SiteGraph, filter: &FilterOptions) -> Self {
        let pages = graph.filtered_pages(filter);
        let links = graph.filtered_links(filter);
        let statistics = compute_statistics(&pages, &links);
        let recommendations = recommendations_from_stats(&statistics);
        Self {
            statistics,
            recommendations,
        }
    }
}
