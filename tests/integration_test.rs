// Integration tests for siteatlas
// Exercises the full export pipeline end-to-end against a realistic snapshot.

use chrono::{TimeZone, Utc};
use siteatlas::export::{export, ExportFormat, ExportOptions, PassthroughRenderer};
use siteatlas::graph::{Link, LinkKind, Page, PageId, SiteGraph, SiteMetadata};
use siteatlas::{SiteInsights, Config};
use std::io::Write;

// ============================================================
// Fixtures
// ============================================================

fn page(id: u64, path: &str, depth: u32, status: u16, inbound: u32, outbound: u32) -> Page {
    Page {
        id: PageId(id),
        url: format!("https://example.com{}", path),
        path: path.to_string(),
        title: None,
        depth,
        http_status: status,
        inbound_count: inbound,
        outbound_count: outbound,
        link_equity: 1.0,
    }
}

fn link(source: u64, target: u64, kind: LinkKind) -> Link {
    Link {
        source: PageId(source),
        target: PageId(target),
        kind,
        anchor_text: None,
        is_external: false,
    }
}

fn metadata(project: &str, pages: usize, links: usize, max_depth: u32) -> SiteMetadata {
    SiteMetadata {
        project_name: project.to_string(),
        generated_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        total_pages: pages,
        total_links: links,
        max_depth,
        orphan_count: 0,
        error_count: 0,
        last_crawled_at: None,
    }
}

/// Five pages at depths 0, 1, 1, 2, 2. Page 5 has no inbound links.
fn sample_graph() -> SiteGraph {
    SiteGraph {
        metadata: metadata("Example Site", 5, 4, 2),
        pages: vec![
            page(1, "/", 0, 200, 3, 2),
            page(2, "/about", 1, 200, 1, 1),
            page(3, "/blog", 1, 200, 1, 2),
            page(4, "/blog/first-post", 2, 200, 2, 1),
            page(5, "/contact", 2, 200, 0, 0),
        ],
        links: vec![
            link(1, 2, LinkKind::Navigation),
            link(1, 3, LinkKind::Navigation),
            link(3, 4, LinkKind::Content),
            link(4, 1, LinkKind::Footer),
        ],
    }
}

/// Well-linked site: all 200, no orphans, every page has >= 5 inbound links.
fn healthy_graph() -> SiteGraph {
    let pages: Vec<Page> = (1..=4)
        .map(|n| page(n, &format!("/p{}", n), if n == 1 { 0 } else { 1 }, 200, 5, 3))
        .collect();
    let links = vec![
        link(1, 2, LinkKind::Navigation),
        link(1, 3, LinkKind::Navigation),
        link(1, 4, LinkKind::Navigation),
        link(2, 1, LinkKind::Footer),
        link(3, 1, LinkKind::Footer),
        link(4, 1, LinkKind::Footer),
    ];
    SiteGraph {
        metadata: metadata("Healthy Site", 4, 6, 1),
        pages,
        links,
    }
}

// ============================================================
// Statistics and recommendations
// ============================================================

#[test]
fn test_sample_graph_counts_one_orphan() {
    let graph = sample_graph();
    let insights = SiteInsights::compute(&graph, &Default::default());

    assert_eq!(insights.statistics.total_pages, 5);
    assert_eq!(insights.statistics.orphan_pages, 1);
    assert_eq!(insights.statistics.error_pages, 0);
}

#[test]
fn test_sample_graph_recommends_internal_linking() {
    let graph = sample_graph();
    let insights = SiteInsights::compute(&graph, &Default::default());

    let orphan_finding = insights
        .recommendations
        .iter()
        .find(|f| f.title.contains("Orphan"))
        .expect("orphan recommendation present");
    assert_eq!(orphan_finding.category, "Internal Linking");
    assert_eq!(orphan_finding.affected_count, Some(1));
}

#[test]
fn test_healthy_graph_scores_100() {
    let graph = healthy_graph();
    let insights = SiteInsights::compute(&graph, &Default::default());

    assert_eq!(insights.statistics.health_score, 100);
    assert!(insights
        .recommendations
        .iter()
        .all(|f| !f.title.contains("Orphan")));
}

// ============================================================
// SVG export
// ============================================================

#[test]
fn test_svg_export_artifact() {
    let graph = sample_graph();
    let artifact = export(
        &graph,
        ExportFormat::Svg,
        &ExportOptions::default(),
        &PassthroughRenderer,
    )
    .unwrap();

    assert_eq!(artifact.filename, "example-site-2024-03-01.svg");
    assert_eq!(artifact.mime_type, "image/svg+xml");

    let svg = String::from_utf8(artifact.bytes).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("</svg>"));
    assert!(svg.contains("class=\"node orphan\""));
}

#[test]
fn test_svg_export_is_deterministic() {
    let graph = sample_graph();
    let options = ExportOptions::default();
    let a = export(&graph, ExportFormat::Svg, &options, &PassthroughRenderer).unwrap();
    let b = export(&graph, ExportFormat::Svg, &options, &PassthroughRenderer).unwrap();
    assert_eq!(a.bytes, b.bytes);
}

// ============================================================
// Mermaid export
// ============================================================

#[test]
fn test_flowchart_has_exactly_one_hexagon() {
    let graph = sample_graph();
    let artifact = export(
        &graph,
        ExportFormat::Mermaid,
        &ExportOptions::default(),
        &PassthroughRenderer,
    )
    .unwrap();

    let text = String::from_utf8(artifact.bytes).unwrap();
    assert!(text.starts_with("flowchart TB"));

    // The orphan page renders as a hexagon.
    let hexagons = text.matches("{{\"").count();
    assert_eq!(hexagons, 1);
    assert!(text.contains("p5{{\"Contact\"}}:::orphan"));
}

#[test]
fn test_mindmap_export() {
    let graph = sample_graph();
    let options = ExportOptions {
        diagram_type: Some("mindmap".to_string()),
        ..Default::default()
    };
    let artifact = export(&graph, ExportFormat::Mermaid, &options, &PassthroughRenderer).unwrap();

    let text = String::from_utf8(artifact.bytes).unwrap();
    assert!(text.starts_with("mindmap"));
    assert!(text.contains("Home"));
    assert!(text.contains("First Post"));
}

#[test]
fn test_mermaid_filename_and_mime() {
    let graph = sample_graph();
    let artifact = export(
        &graph,
        ExportFormat::Mermaid,
        &ExportOptions::default(),
        &PassthroughRenderer,
    )
    .unwrap();
    assert_eq!(artifact.filename, "example-site-2024-03-01.mmd");
    assert_eq!(artifact.mime_type, "text/plain");
}

// ============================================================
// Figma export
// ============================================================

#[test]
fn test_figma_export_document() {
    let graph = sample_graph();
    let artifact = export(
        &graph,
        ExportFormat::Figma,
        &ExportOptions::default(),
        &PassthroughRenderer,
    )
    .unwrap();

    assert_eq!(artifact.filename, "example-site-2024-03-01.fig.json");
    assert_eq!(artifact.mime_type, "application/json");

    let doc: serde_json::Value = serde_json::from_slice(&artifact.bytes).unwrap();
    assert_eq!(doc["document"]["type"], "DOCUMENT");
    let children = doc["document"]["children"][0]["children"]
        .as_array()
        .unwrap();
    let frames = children.iter().filter(|n| n["type"] == "FRAME").count();
    let vectors = children.iter().filter(|n| n["type"] == "VECTOR").count();
    // 5 page frames + title + legend, 4 connectors
    assert_eq!(frames, 7);
    assert_eq!(vectors, 4);
}

// ============================================================
// Report export
// ============================================================

#[test]
fn test_report_export_contains_recommendations() {
    let graph = sample_graph();
    let artifact = export(
        &graph,
        ExportFormat::Report,
        &ExportOptions::default(),
        &PassthroughRenderer,
    )
    .unwrap();

    assert_eq!(artifact.filename, "example-site-2024-03-01.pdf");
    assert_eq!(artifact.mime_type, "application/pdf");

    // PassthroughRenderer returns the intermediate HTML verbatim.
    let html = String::from_utf8(artifact.bytes).unwrap();
    assert!(html.contains("Example Site"));
    assert!(html.contains("Internal Linking"));
    assert!(html.contains("/blog/first-post"));
}

#[test]
fn test_report_respects_page_setup() {
    let graph = sample_graph();
    let options = ExportOptions {
        page_size: Some("letter".to_string()),
        orientation: Some("landscape".to_string()),
        ..Default::default()
    };
    let artifact = export(&graph, ExportFormat::Report, &options, &PassthroughRenderer).unwrap();
    let html = String::from_utf8(artifact.bytes).unwrap();
    assert!(html.contains("size: letter landscape"));
}

// ============================================================
// Validation and error paths
// ============================================================

#[test]
fn test_export_rejects_unknown_link_source() {
    let mut graph = sample_graph();
    graph.links.push(link(99, 1, LinkKind::Content));

    let result = export(
        &graph,
        ExportFormat::Svg,
        &ExportOptions::default(),
        &PassthroughRenderer,
    );
    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(message.contains("Invalid graph snapshot"));
}

#[test]
fn test_unknown_format_is_rejected() {
    let result = ExportFormat::parse("docx");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("docx"));
}

#[test]
fn test_snapshot_round_trip_from_json() {
    let graph = sample_graph();
    let json = serde_json::to_string(&graph).unwrap();
    let parsed = SiteGraph::from_json(&json).unwrap();
    assert_eq!(parsed.pages.len(), 5);
    assert_eq!(parsed.metadata.project_name, "Example Site");
}

// ============================================================
// Config file
// ============================================================

#[test]
fn test_config_file_drives_options() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[export]
format = "mermaid"
diagram_type = "graph"
max_label_length = 12
"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.export.format, "mermaid");
    let options = config.to_options();
    assert_eq!(options.diagram_type.as_deref(), Some("graph"));
    assert_eq!(options.max_label_length, Some(12));
}

// ============================================================
// CLI
// ============================================================

#[test]
fn test_cli_stats_command() {
    use assert_cmd::Command;
    use predicates::prelude::*;

    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("graph.json");
    std::fs::write(&snapshot, serde_json::to_string(&sample_graph()).unwrap()).unwrap();

    let mut cmd = Command::cargo_bin("siteatlas").unwrap();
    cmd.arg("stats")
        .arg(&snapshot)
        .assert()
        .success()
        .stdout(predicate::str::contains("health score"))
        .stdout(predicate::str::contains("Internal Linking"));
}

#[test]
fn test_cli_export_writes_file() {
    use assert_cmd::Command;

    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("graph.json");
    let output = dir.path().join("out.mmd");
    std::fs::write(&snapshot, serde_json::to_string(&sample_graph()).unwrap()).unwrap();

    let mut cmd = Command::cargo_bin("siteatlas").unwrap();
    cmd.arg("export")
        .arg(&snapshot)
        .arg("--format")
        .arg("mermaid")
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("flowchart"));
}

#[test]
fn test_cli_export_rejects_unknown_format() {
    use assert_cmd::Command;
    use predicates::prelude::*;

    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("graph.json");
    std::fs::write(&snapshot, serde_json::to_string(&sample_graph()).unwrap()).unwrap();

    let mut cmd = Command::cargo_bin("siteatlas").unwrap();
    cmd.arg("export")
        .arg(&snapshot)
        .arg("--format")
        .arg("docx")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown export format"));
}
