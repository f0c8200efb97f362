//! Canonical, render-ready analysis result
//!
//! Whatever shape the analysis service answered with, the presentation layer
//! only ever sees a [`CanonicalResult`].

use super::finding::Finding;
use serde::Serialize;
use std::fmt;

/// Fixed result buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Errors,
    Warnings,
    Suggestions,
}

impl Category {
    /// Display order
    pub const ALL: [Category; 3] = [Category::Errors, Category::Warnings, Category::Suggestions];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Errors => "errors",
            Self::Warnings => "warnings",
            Self::Suggestions => "suggestions",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Findings per category, each in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorizedFindings {
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub suggestions: Vec<Finding>,
}

impl CategorizedFindings {
    pub fn get(&self, category: Category) -> &[Finding] {
        match category {
            Category::Errors => &self.errors,
            Category::Warnings => &self.warnings,
            Category::Suggestions => &self.suggestions,
        }
    }

    pub(crate) fn get_mut(&mut self, category: Category) -> &mut Vec<Finding> {
        match category {
            Category::Errors => &mut self.errors,
            Category::Warnings => &mut self.warnings,
            Category::Suggestions => &mut self.suggestions,
        }
    }

    /// Categories with their findings, in display order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Finding])> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn total(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.suggestions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Display metadata for one phase of the breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseSummaryEntry {
    /// Phase key as sent by the service (`structure`, `grammar`, ...)
    pub phase: String,
    pub title: String,
    pub icon: String,
    pub color: String,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Which response shape the service answered with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseShape {
    /// `errors` / `warnings` / `suggestions` buckets
    Batch,
    /// `structure` / `grammar` / `enhancement` phases
    #[default]
    Legacy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonicalResult {
    pub overall_summary: Option<String>,
    pub categories: CategorizedFindings,
    /// Ordered phase key → metadata
    pub phase_summary: Vec<PhaseSummaryEntry>,
    pub total_errors_found: u64,
    pub total_pages_analyzed: u64,
    pub shape: ResponseShape,
}

impl CanonicalResult {
    /// No issues reported for a document that was actually analyzed
    pub fn is_clean(&self) -> bool {
        self.total_errors_found == 0 && self.total_pages_analyzed > 0
    }

    pub fn phase(&self, key: &str) -> Option<&PhaseSummaryEntry> {
        self.phase_summary.iter().find(|entry| entry.phase == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageRef;

    #[test]
    fn test_is_clean_requires_analyzed_pages() {
        let mut result = CanonicalResult::default();
        assert!(!result.is_clean());

        result.total_pages_analyzed = 12;
        assert!(result.is_clean());

        result.total_errors_found = 1;
        assert!(!result.is_clean());
    }

    #[test]
    fn test_iter_is_in_display_order() {
        let mut findings = CategorizedFindings::default();
        findings
            .get_mut(Category::Warnings)
            .push(Finding::new(PageRef::Page(1), "Flow problem"));

        let keys: Vec<_> = findings.iter().map(|(c, items)| (c.key(), items.len())).collect();
        assert_eq!(keys, vec![("errors", 0), ("warnings", 1), ("suggestions", 0)]);
        assert_eq!(findings.total(), 1);
    }
}
