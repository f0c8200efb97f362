//! Phase breakdown metadata
//!
//! Server-supplied `phase_summary` objects are passed through. Only a legacy
//! response without one gets a breakdown computed here, from the lengths of
//! its three phase sequences.

use super::result_normalizer::NormalizeError;
use crate::models::{Category, PhaseSummaryEntry};
use serde_json::Value;

/// Legacy result phases, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyPhase {
    Structure,
    Grammar,
    Enhancement,
}

struct PhaseMetadata {
    title: &'static str,
    icon: &'static str,
    color: &'static str,
    description: &'static str,
}

impl LegacyPhase {
    pub const ALL: [LegacyPhase; 3] = [
        LegacyPhase::Structure,
        LegacyPhase::Grammar,
        LegacyPhase::Enhancement,
    ];

    /// Key under `categorized_results`
    pub fn key(&self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::Grammar => "grammar",
            Self::Enhancement => "enhancement",
        }
    }

    /// Canonical category the phase's findings land in
    pub fn category(&self) -> Category {
        match self {
            Self::Structure => Category::Errors,
            Self::Grammar => Category::Warnings,
            Self::Enhancement => Category::Suggestions,
        }
    }

    fn metadata(&self) -> PhaseMetadata {
        match self {
            Self::Structure => PhaseMetadata {
                title: "Structure Errors",
                icon: "🚨",
                color: "#dc3545",
                description: "Critical structure and formatting issues that need immediate attention",
            },
            Self::Grammar => PhaseMetadata {
                title: "Grammar & Spelling Errors",
                icon: "⚠️",
                color: "#ffc107",
                description: "Grammar and spelling errors that need correction",
            },
            Self::Enhancement => PhaseMetadata {
                title: "Content Enhancement Suggestions",
                icon: "💡",
                color: "#17a2b8",
                description: "Content improvement suggestions for better quality",
            },
        }
    }
}

/// Build the breakdown from per-phase finding counts
///
/// Phases with a zero count are left out entirely.
pub fn build(counts: &[(LegacyPhase, usize)]) -> Vec<PhaseSummaryEntry> {
    counts
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(phase, count)| {
            let meta = phase.metadata();
            PhaseSummaryEntry {
                phase: phase.key().to_string(),
                title: meta.title.to_string(),
                icon: meta.icon.to_string(),
                color: meta.color.to_string(),
                count: *count as u64,
                description: Some(meta.description.to_string()),
            }
        })
        .collect()
}

/// Read a server-supplied `phase_summary` object, keeping its order
///
/// Missing display fields default to empty strings and a missing count to 0.
pub fn from_server(value: &Value) -> Result<Vec<PhaseSummaryEntry>, NormalizeError> {
    let phases = value.as_object().ok_or(NormalizeError::WrongType {
        field: "phase_summary",
        expected: "an object",
    })?;

    phases
        .iter()
        .map(|(phase, entry)| {
            let entry = entry.as_object().ok_or(NormalizeError::WrongType {
                field: "phase_summary entry",
                expected: "an object",
            })?;
            let text = |name: &str| {
                entry
                    .get(name)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            Ok(PhaseSummaryEntry {
                phase: phase.clone(),
                title: text("title"),
                icon: text("icon"),
                color: text("color"),
                count: entry.get("count").and_then(Value::as_u64).unwrap_or(0),
                description: entry
                    .get("description")
                    .and_then(Value::as_str)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_omits_empty_phases() {
        let summary = build(&[
            (LegacyPhase::Structure, 2),
            (LegacyPhase::Grammar, 0),
            (LegacyPhase::Enhancement, 1),
        ]);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].phase, "structure");
        assert_eq!(summary[0].title, "Structure Errors");
        assert_eq!(summary[0].icon, "🚨");
        assert_eq!(summary[0].color, "#dc3545");
        assert_eq!(summary[0].count, 2);
        assert_eq!(summary[1].phase, "enhancement");
        assert_eq!(summary[1].count, 1);
    }

    #[test]
    fn test_build_all_empty() {
        assert!(build(&[(LegacyPhase::Grammar, 0)]).is_empty());
    }

    #[test]
    fn test_from_server_keeps_order_and_defaults() {
        let value = json!({
            "grammar": {"title": "Grammar", "icon": "⚠️", "color": "#ffc107", "count": 4, "description": ""},
            "structure": {"count": 1}
        });

        let summary = from_server(&value).unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].phase, "grammar");
        assert_eq!(summary[0].count, 4);
        assert_eq!(summary[0].description, None);
        assert_eq!(summary[1].phase, "structure");
        assert_eq!(summary[1].title, "");
        assert_eq!(summary[1].count, 1);
    }

    #[test]
    fn test_from_server_rejects_non_object() {
        assert!(matches!(
            from_server(&json!([1, 2])),
            Err(NormalizeError::WrongType { .. })
        ));
        assert!(matches!(
            from_server(&json!({"structure": 3})),
            Err(NormalizeError::WrongType { .. })
        ));
    }

    #[test]
    fn test_phase_category_mapping() {
        assert_eq!(LegacyPhase::Structure.category(), Category::Errors);
        assert_eq!(LegacyPhase::Grammar.category(), Category::Warnings);
        assert_eq!(LegacyPhase::Enhancement.category(), Category::Suggestions);
    }
}
