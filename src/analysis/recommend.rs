// Rule-based recommendations derived from the page/link view
//
// Each rule fires independently; the final list is sorted by priority
// with ties keeping rule evaluation order (stable sort).

use crate::analysis::stats::Statistics;
use crate::graph::{Link, Page};
use serde::{Deserialize, Serialize};

/// How urgently a finding should be acted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank, critical first
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// A single human-readable finding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: String,
    pub title: String,
    pub description: String,
    /// How many pages the finding covers; None for site-wide findings
    pub affected_count: Option<usize>,
}

/// Threshold for the dead-end rule: a handful of terminal pages is normal
const DEAD_END_RULE_MIN: usize = 3;

/// Generate prioritized findings for an already-filtered page/link view
pub fn generate_recommendations(pages: &[&Page], links: &[&Link]) -> Vec<Recommendation> {
    let stats = crate::analysis::stats::compute_statistics(pages, links);
    recommendations_from_stats(&stats)
}

/// Generate findings from precomputed statistics (avoids a second pass
/// when the caller already has them)
pub fn recommendations_from_stats(stats: &Statistics) -> Vec<Recommendation> {
    let mut findings = Vec::new();

    if stats.orphan_pages > 0 {
        findings.push(Recommendation {
            priority: Priority::High,
            category: "Internal Linking".to_string(),
            title: "Orphan pages found".to_string(),
            description: format!(
                "{} page(s) have no internal links pointing to them. \
                 Search engines and visitors can only reach them directly. \
                 Link to these pages from related content or navigation.",
                stats.orphan_pages
            ),
            affected_count: Some(stats.orphan_pages),
        });
    }

    if stats.error_pages > 0 {
        findings.push(Recommendation {
            priority: Priority::Critical,
            category: "Technical SEO".to_string(),
            title: "Pages returning errors".to_string(),
            description: format!(
                "{} page(s) respond with an error status. Fix or redirect \
                 them; error pages waste crawl budget and break user journeys.",
                stats.error_pages
            ),
            affected_count: Some(stats.error_pages),
        });
    }

    if stats.deep_pages > 0 {
        findings.push(Recommendation {
            priority: Priority::Medium,
            category: "Site Structure".to_string(),
            title: "Pages buried too deep".to_string(),
            description: format!(
                "{} page(s) sit more than {} clicks from the entry point. \
                 Flatten the structure or add shortcut links so important \
                 content stays within reach.",
                stats.deep_pages,
                crate::graph::DEEP_DEPTH_THRESHOLD
            ),
            affected_count: Some(stats.deep_pages),
        });
    }

    if stats.dead_end_pages > DEAD_END_RULE_MIN {
        findings.push(Recommendation {
            priority: Priority::Low,
            category: "User Experience".to_string(),
            title: "Dead-end pages".to_string(),
            description: format!(
                "{} page(s) link out to nothing, leaving visitors stranded. \
                 Add related-content or next-step links.",
                stats.dead_end_pages
            ),
            affected_count: Some(stats.dead_end_pages),
        });
    }

    if stats.total_pages > 0 && stats.avg_inbound_links < 2.0 {
        findings.push(Recommendation {
            priority: Priority::Medium,
            category: "Internal Linking".to_string(),
            title: "Weak internal linking overall".to_string(),
            description: format!(
                "Pages average {:.1} inbound links. Aim for at least 2-3 \
                 internal links per page to spread link equity.",
                stats.avg_inbound_links
            ),
            affected_count: None,
        });
    }

    findings.sort_by_key(|f| f.priority.rank());
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Page, PageId};

    fn make_page(id: u64, depth: u32, status: u16, inbound: u32, outbound: u32) -> Page {
        Page {
            id: PageId(id),
            url: format!("https://example.com/p{}", id),
            path: format!("/p{}", id),
            title: None,
            depth,
            http_status: status,
            inbound_count: inbound,
            outbound_count: outbound,
            link_equity: 0.0,
        }
    }

    fn recommend(pages: &[Page]) -> Vec<Recommendation> {
        let refs: Vec<&Page> = pages.iter().collect();
        generate_recommendations(&refs, &[])
    }

    #[test]
    fn test_healthy_site_has_no_findings() {
        let pages: Vec<Page> = (1..=4).map(|i| make_page(i, 1, 200, 3, 2)).collect();
        assert!(recommend(&pages).is_empty());
    }

    #[test]
    fn test_orphan_rule() {
        let mut pages: Vec<Page> = (1..=3).map(|i| make_page(i, 1, 200, 3, 2)).collect();
        pages.push(make_page(4, 1, 200, 0, 2));

        let findings = recommend(&pages);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].priority, Priority::High);
        assert_eq!(findings[0].category, "Internal Linking");
        assert_eq!(findings[0].affected_count, Some(1));
    }

    #[test]
    fn test_error_rule_is_critical() {
        let mut pages: Vec<Page> = (1..=3).map(|i| make_page(i, 1, 200, 3, 2)).collect();
        pages.push(make_page(4, 1, 500, 3, 2));

        let findings = recommend(&pages);
        assert_eq!(findings[0].priority, Priority::Critical);
        assert_eq!(findings[0].category, "Technical SEO");
    }

    #[test]
    fn test_deep_rule() {
        let mut pages: Vec<Page> = (1..=3).map(|i| make_page(i, 1, 200, 3, 2)).collect();
        pages.push(make_page(4, 5, 200, 3, 2));

        let findings = recommend(&pages);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].priority, Priority::Medium);
        assert_eq!(findings[0].category, "Site Structure");
    }

    #[test]
    fn test_dead_end_rule_needs_more_than_three() {
        // Exactly 3 dead ends: rule stays quiet
        let mut pages: Vec<Page> = (1..=3).map(|i| make_page(i, 1, 200, 3, 0)).collect();
        pages.push(make_page(4, 1, 200, 3, 2));
        assert!(recommend(&pages).is_empty());

        // 4 dead ends: rule fires at low priority
        let pages: Vec<Page> = (1..=4).map(|i| make_page(i, 1, 200, 3, 0)).collect();
        let findings = recommend(&pages);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].priority, Priority::Low);
        assert_eq!(findings[0].category, "User Experience");
        assert_eq!(findings[0].affected_count, Some(4));
    }

    #[test]
    fn test_weak_linking_rule_has_no_affected_count() {
        let pages: Vec<Page> = (1..=4).map(|i| make_page(i, 1, 200, 1, 2)).collect();

        let findings = recommend(&pages);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].priority, Priority::Medium);
        assert_eq!(findings[0].affected_count, None);
    }

    #[test]
    fn test_findings_sorted_by_priority() {
        // Orphans (high), errors (critical), deep (medium), weak linking
        // (medium) all at once
        let pages = vec![
            make_page(1, 0, 200, 0, 2),
            make_page(2, 5, 500, 1, 2),
            make_page(3, 1, 200, 1, 2),
            make_page(4, 1, 200, 1, 2),
        ];

        let findings = recommend(&pages);
        let ranks: Vec<u8> = findings.iter().map(|f| f.priority.rank()).collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(ranks, sorted);

        assert_eq!(findings[0].priority, Priority::Critical);
        assert_eq!(findings[1].priority, Priority::High);
        // Medium ties keep rule order: deep pages before weak linking
        assert_eq!(findings[2].category, "Site Structure");
        assert_eq!(findings[3].category, "Internal Linking");
    }

    #[test]
    fn test_empty_graph_no_findings() {
        assert!(recommend(&[]).is_empty());
    }
}
