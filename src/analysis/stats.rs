// Statistics and health scoring over the filtered page/link view
//
// The health score is a contract: the penalty caps, their order, and the
// final round-then-clamp must not change, or scores drift between releases.

use crate::graph::{Link, Page};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate statistics for one snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub total_pages: usize,
    pub total_links: usize,
    pub ok_pages: usize,
    pub redirect_pages: usize,
    pub error_pages: usize,
    pub orphan_pages: usize,
    pub deep_pages: usize,
    pub dead_end_pages: usize,
    pub max_depth: u32,
    pub avg_inbound_links: f64,
    pub avg_outbound_links: f64,
    /// Page count per depth, keys ascending
    pub depth_distribution: BTreeMap<u32, usize>,
    /// 0-100 structural quality heuristic
    pub health_score: u8,
}

/// Compute statistics over an already-filtered page/link view
pub fn compute_statistics(pages: &[&Page], links: &[&Link]) -> Statistics {
    let total_pages = pages.len();

    let mut stats = Statistics {
        total_pages,
        total_links: links.len(),
        ..Default::default()
    };

    let mut inbound_sum = 0u64;
    let mut outbound_sum = 0u64;

    for page in pages {
        match page.http_status {
            s if s < 300 => stats.ok_pages += 1,
            s if s < 400 => stats.redirect_pages += 1,
            _ => stats.error_pages += 1,
        }
        if page.is_orphan() {
            stats.orphan_pages += 1;
        }
        if page.is_deep() {
            stats.deep_pages += 1;
        }
        if page.is_dead_end() {
            stats.dead_end_pages += 1;
        }
        if page.depth > stats.max_depth {
            stats.max_depth = page.depth;
        }
        *stats.depth_distribution.entry(page.depth).or_insert(0) += 1;
        inbound_sum += u64::from(page.inbound_count);
        outbound_sum += u64::from(page.outbound_count);
    }

    if total_pages > 0 {
        stats.avg_inbound_links = inbound_sum as f64 / total_pages as f64;
        stats.avg_outbound_links = outbound_sum as f64 / total_pages as f64;
    }

    stats.health_score = health_score(
        total_pages,
        stats.error_pages,
        stats.orphan_pages,
        stats.deep_pages,
        stats.dead_end_pages,
        stats.avg_inbound_links,
    );

    stats
}

/// The health heuristic.
///
/// Starts at 100, applies capped penalties in a fixed order, adds a small
/// bonus for strong internal linking, then rounds and clamps to [0, 100].
/// An empty page set scores 0 outright.
fn health_score(
    total_pages: usize,
    error_pages: usize,
    orphan_pages: usize,
    deep_pages: usize,
    dead_end_pages: usize,
    avg_inbound: f64,
) -> u8 {
    if total_pages == 0 {
        return 0;
    }

    let total = total_pages as f64;
    let mut score = 100.0_f64;

    score -= f64::min(30.0, (error_pages as f64 / total) * 100.0);
    score -= f64::min(20.0, (orphan_pages as f64 / total) * 100.0);
    score -= f64::min(15.0, (deep_pages as f64 / total) * 50.0);
    score -= f64::min(10.0, (dead_end_pages as f64 / total) * 50.0);

    if avg_inbound >= 3.0 {
        score += 5.0;
    }

    score.round().clamp(0.0, 100.0) as u8
}
