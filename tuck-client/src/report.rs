//! Plain-text rendering of a canonical result

use crate::models::{CanonicalResult, Category, Finding, ResponseShape};

fn category_heading(category: Category, shape: ResponseShape) -> &'static str {
    match (shape, category) {
        (ResponseShape::Batch, Category::Errors) => "🚨 Errors",
        (ResponseShape::Batch, Category::Warnings) => "⚠️ Warnings",
        (ResponseShape::Batch, Category::Suggestions) => "💡 Suggestions",
        (ResponseShape::Legacy, Category::Errors) => "🚨 Phase 1: Structure Errors",
        (ResponseShape::Legacy, Category::Warnings) => "⚠️ Phase 2: Grammar & Spelling Errors",
        (ResponseShape::Legacy, Category::Suggestions) => {
            "💡 Phase 3: Content Enhancement Suggestions"
        }
    }
}

fn finding_line(index: usize, finding: &Finding) -> String {
    match finding.section_tag() {
        Some(tag) => format!(
            "  {}. {} [{}] {}",
            index + 1,
            finding.page(),
            tag,
            finding.body_text()
        ),
        None => format!("  {}. {} {}", index + 1, finding.page(), finding.body_text()),
    }
}

/// Render a result as a terminal report
pub fn render(result: &CanonicalResult) -> String {
    let mut lines = vec!["Analysis Results".to_string(), String::new()];

    if let Some(summary) = &result.overall_summary {
        lines.push(summary.trim_end().to_string());
        lines.push(String::new());
    }

    if !result.phase_summary.is_empty() {
        lines.push("📊 Phase Breakdown".to_string());
        for entry in &result.phase_summary {
            let noun = if entry.count == 1 { "issue" } else { "issues" };
            lines.push(format!("  {} {}: {} {}", entry.icon, entry.title, entry.count, noun));
        }
        lines.push(String::new());
    }

    for (category, findings) in result.categories.iter() {
        if findings.is_empty() {
            continue;
        }
        lines.push(format!(
            "{} ({})",
            category_heading(category, result.shape),
            findings.len()
        ));
        lines.extend(
            findings
                .iter()
                .enumerate()
                .map(|(index, finding)| finding_line(index, finding)),
        );
        lines.push(String::new());
    }

    if result.is_clean() && result.overall_summary.is_some() {
        lines.push("✅ Perfect! No Issues Found".to_string());
        lines.push(format!(
            "All {} pages comply with TU format standards.",
            result.total_pages_analyzed
        ));
        lines.push(String::new());
    }

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
