// Site architecture graph: the crawler's snapshot of pages and links.
//
// The crawler computes depth, inbound/outbound counts, and link equity;
// this module only reads them. Accessors apply the filter options and
// derive per-page presentation metadata (title fallback, status class).

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Depth beyond which a page counts as buried in the site structure
pub const DEEP_DEPTH_THRESHOLD: u32 = 3;

/// Unique identifier for a page within one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(pub u64);

/// Where a hyperlink lives on the source page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Navigation,
    Content,
    Footer,
    Sidebar,
    Header,
    Breadcrumb,
    Pagination,
    External,
    #[default]
    Unknown,
}

/// Status bucket used for styling across every exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    Ok,
    Redirect,
    Error,
    Orphan,
}

impl StatusClass {
    /// Stable CSS-style name used in class lists and legends
    pub fn name(&self) -> &'static str {
        match self {
            StatusClass::Ok => "ok",
            StatusClass::Redirect => "redirect",
            StatusClass::Error => "error",
            StatusClass::Orphan => "orphan",
        }
    }
}

/// A crawled page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub url: String,
    pub path: String,
    /// Title from the page's markup, if the crawler found one
    #[serde(default)]
    pub title: Option<String>,
    /// Shortest-path distance from the entry point, 0 = entry point
    pub depth: u32,
    pub http_status: u16,
    pub inbound_count: u32,
    pub outbound_count: u32,
    #[serde(default)]
    pub link_equity: f64,
}

impl Page {
    /// A page no internal link points to
    pub fn is_orphan(&self) -> bool {
        self.inbound_count == 0
    }

    /// A page buried deeper than the policy threshold
    pub fn is_deep(&self) -> bool {
        self.depth > DEEP_DEPTH_THRESHOLD
    }

    /// A page that links out to nothing
    pub fn is_dead_end(&self) -> bool {
        self.outbound_count == 0
    }

    /// Status bucket for styling. Orphan overrides the HTTP buckets.
    pub fn status_class(&self) -> StatusClass {
        if self.is_orphan() {
            StatusClass::Orphan
        } else if self.http_status < 300 {
            StatusClass::Ok
        } else if self.http_status < 400 {
            StatusClass::Redirect
        } else {
            StatusClass::Error
        }
    }

    /// Title for display, falling back to a humanized last path segment
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => title_from_path(&self.path),
        }
    }
}

/// Derive a readable title from a URL path.
///
/// Takes the last segment, strips the extension, turns `-`/`_` into
/// spaces and title-cases the words. The root path becomes "Home".
pub fn title_from_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return "Home".to_string();
    }

    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    let stem = match segment.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => segment,
    };

    stem.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A directed hyperlink between pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub source: PageId,
    /// May reference a synthetic off-site id when `is_external` is set;
    /// generators that need both endpoints skip such links.
    pub target: PageId,
    #[serde(default)]
    pub kind: LinkKind,
    #[serde(default)]
    pub anchor_text: Option<String>,
    #[serde(default)]
    pub is_external: bool,
}

/// Snapshot-level metadata from the crawler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteMetadata {
    pub project_name: String,
    /// Stamped by the caller, never read from the wall clock here,
    /// so identical snapshots export byte-identically
    pub generated_at: DateTime<Utc>,
    pub total_pages: usize,
    pub total_links: usize,
    pub max_depth: u32,
    pub orphan_count: usize,
    pub error_count: usize,
    #[serde(default)]
    pub last_crawled_at: Option<DateTime<Utc>>,
}

/// Filters applied when reading pages and links out of the snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Keep pages outside the 2xx range
    pub include_errors: bool,
    /// Keep links that point off-site
    pub include_external: bool,
}

/// The architecture aggregate: one crawl's pages and links
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteGraph {
    pub metadata: SiteMetadata,
    pub pages: Vec<Page>,
    pub links: Vec<Link>,
}

impl SiteGraph {
    /// Parse a snapshot from the crawler's JSON and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let graph: SiteGraph = serde_json::from_str(json)?;
        graph.validate()?;
        Ok(graph)
    }

    /// Check snapshot integrity before any export touches it.
    ///
    /// Every link source must be a known page. Targets may be unknown
    /// only for external links (the crawler assigns those synthetic ids).
    pub fn validate(&self) -> Result<()> {
        if self.metadata.project_name.trim().is_empty() {
            return Err(Error::input("project_name is empty"));
        }

        let mut seen = HashMap::new();
        for page in &self.pages {
            if page.url.trim().is_empty() {
                return Err(Error::input(format!("page {} has an empty url", page.id.0)));
            }
            if page.path.trim().is_empty() {
                return Err(Error::input(format!("page {} has an empty path", page.id.0)));
            }
            if seen.insert(page.id, ()).is_some() {
                return Err(Error::input(format!("duplicate page id {}", page.id.0)));
            }
        }

        for (i, link) in self.links.iter().enumerate() {
            if !seen.contains_key(&link.source) {
                return Err(Error::input(format!(
                    "link {} has unknown source page {}",
                    i, link.source.0
                )));
            }
            if !link.is_external && !seen.contains_key(&link.target) {
                return Err(Error::input(format!(
                    "link {} has unknown target page {}",
                    i, link.target.0
                )));
            }
        }

        Ok(())
    }

    /// Pages passing the filter, in snapshot order
    pub fn filtered_pages(&self, filter: &FilterOptions) -> Vec<&Page> {
        self.pages
            .iter()
            .filter(|p| filter.include_errors || (200..300).contains(&p.http_status))
            .collect()
    }

    /// Links passing the filter, in snapshot order
    pub fn filtered_links(&self, filter: &FilterOptions) -> Vec<&Link> {
        self.links
            .iter()
            .filter(|l| filter.include_external || !l.is_external)
            .collect()
    }

    /// Lookup table over the filtered page set.
    ///
    /// Generators that draw both link endpoints resolve through this and
    /// silently skip links whose endpoint was filtered out. That skip is
    /// deliberate: with `include_external=false` dropped targets are the
    /// common case, not an error.
    pub fn page_index<'a>(&self, pages: &[&'a Page]) -> HashMap<PageId, &'a Page> {
        pages.iter().map(|p| (p.id, *p)).collect()
    }

    /// Highest depth present in the given page set
    pub fn max_depth_of(pages: &[&Page]) -> u32 {
        pages.iter().map(|p| p.depth).max().unwrap_or(0)
    }
}
