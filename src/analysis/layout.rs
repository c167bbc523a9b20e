// Layout algorithms shared by the visual exporters
//
// Grid layout places pages in depth rows centered on the canvas.
// The tree builder reconstructs parent/child branches from the flat
// depth-indexed page list; depth strictly increases per level, so the
// recursion needs no cycle protection.

use crate::graph::{Link, Page, PageId};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Spacing constants for the hierarchical grid, tuned per format
#[derive(Debug, Clone, Copy)]
pub struct GridOptions {
    pub canvas_width: f64,
    pub node_width: f64,
    pub node_height: f64,
    pub h_spacing: f64,
    pub level_spacing: f64,
    pub base_y: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            canvas_width: 1200.0,
            node_width: 160.0,
            node_height: 60.0,
            h_spacing: 40.0,
            level_spacing: 140.0,
            base_y: 80.0,
        }
    }
}

/// A page with its computed canvas position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedNode {
    pub id: PageId,
    pub depth: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlacedNode {
    /// Center of the node's bottom edge (bezier start)
    pub fn bottom_center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height)
    }

    /// Center of the node's top edge (bezier end)
    pub fn top_center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y)
    }

    /// Geometric center
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Lay pages out on a depth grid.
///
/// Pages at the same depth form one left-to-right row centered on the
/// canvas midline; rows keep snapshot order. Output is ordered by depth
/// ascending, then snapshot order, and is fully deterministic.
pub fn grid_layout(pages: &[&Page], opts: &GridOptions) -> Vec<PlacedNode> {
    let mut by_depth: BTreeMap<u32, Vec<&Page>> = BTreeMap::new();
    for page in pages {
        by_depth.entry(page.depth).or_default().push(page);
    }

    let mid_x = opts.canvas_width / 2.0;
    let mut placed = Vec::with_capacity(pages.len());

    for (depth, row) in by_depth {
        let n = row.len() as f64;
        let row_width = n * opts.node_width + (n - 1.0) * opts.h_spacing;
        let start_x = mid_x - row_width / 2.0;
        let y = opts.base_y + f64::from(depth) * opts.level_spacing;

        for (i, page) in row.into_iter().enumerate() {
            placed.push(PlacedNode {
                id: page.id,
                depth,
                x: start_x + i as f64 * (opts.node_width + opts.h_spacing),
                y,
                width: opts.node_width,
                height: opts.node_height,
            });
        }
    }

    placed
}

/// A reconstructed branch of the site hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: PageId,
    pub depth: u32,
    pub children: Vec<TreeNode>,
}

/// Rebuild parent/child branches from the flat page list.
///
/// Roots are the depth-0 pages. Children of a node at depth d are the
/// depth d+1 pages it links to. A page reachable from several parents
/// appears under each of them; the branches stay independent.
pub fn build_tree(pages: &[&Page], links: &[&Link], max_depth: u32) -> Vec<TreeNode> {
    let mut by_depth: HashMap<u32, Vec<PageId>> = HashMap::new();
    for page in pages {
        by_depth.entry(page.depth).or_default().push(page.id);
    }

    let mut targets_of: HashMap<PageId, HashSet<PageId>> = HashMap::new();
    for link in links {
        targets_of.entry(link.source).or_default().insert(link.target);
    }

    by_depth
        .get(&0)
        .map(|roots| {
            roots
                .iter()
                .map(|&id| build_branch(id, 0, &by_depth, &targets_of, max_depth))
                .collect()
        })
        .unwrap_or_default()
}

fn build_branch(
    id: PageId,
    depth: u32,
    by_depth: &HashMap<u32, Vec<PageId>>,
    targets_of: &HashMap<PageId, HashSet<PageId>>,
    max_depth: u32,
) -> TreeNode {
    let mut children = Vec::new();

    if depth < max_depth {
        if let (Some(next_level), Some(targets)) = (by_depth.get(&(depth + 1)), targets_of.get(&id))
        {
            for &candidate in next_level {
                if targets.contains(&candidate) {
                    children.push(build_branch(candidate, depth + 1, by_depth, targets_of, max_depth));
                }
            }
        }
    }

    TreeNode { id, depth, children }
}

/// SVG path for a vertical S-curve between two node edges.
///
/// Control points sit at the vertical midpoint between the source
/// bottom and target top; no collision avoidance.
pub fn bezier_path(from: (f64, f64), to: (f64, f64)) -> String {
    let mid_y = (from.1 + to.1) / 2.0;
    format!(
        "M {:.1} {:.1} C {:.1} {:.1}, {:.1} {:.1}, {:.1} {:.1}",
        from.0, from.1, from.0, mid_y, to.0, mid_y, to.0, to.1
    )
}
