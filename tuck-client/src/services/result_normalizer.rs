//! Analysis response normalization
//!
//! The analysis service has answered with two incompatible shapes over time:
//!
//! - **batch**: `categorized_results.{errors, warnings, suggestions}`
//!   (older batch builds send `enhancement` instead of `suggestions`)
//! - **legacy**: `categorized_results.{structure, grammar, enhancement}`
//!
//! The shape is decided once, up front. Batch wins whenever `errors` or
//! `warnings` is present; legacy keys are then ignored.

use super::phase_summary::{self, LegacyPhase};
use crate::models::{CanonicalResult, Finding, PageRef, ResponseShape};
use serde_json::{Map, Value};
use thiserror::Error;

/// Why a success body could not be normalized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("response body is not a JSON object")]
    NotAnObject,

    #[error("malformed response: {field} must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("malformed response: finding {index} in {field} has no text")]
    MissingText { field: &'static str, index: usize },

    /// The service reported its own failure inside a success response
    #[error("{0}")]
    Reported(String),
}

/// Shape detected in `categorized_results`
enum RawShape<'a> {
    Batch {
        errors: Option<&'a Value>,
        warnings: Option<&'a Value>,
        /// Source key and value of the suggestions bucket
        suggestions: Option<(&'static str, &'a Value)>,
    },
    Legacy {
        phases: [(LegacyPhase, Option<&'a Value>); 3],
    },
}

impl<'a> RawShape<'a> {
    fn detect(categorized: Option<&'a Map<String, Value>>) -> Self {
        let field = |key: &str| categorized.and_then(|map| present(map, key));

        let errors = field("errors");
        let warnings = field("warnings");
        if errors.is_some() || warnings.is_some() {
            let suggestions = field("suggestions")
                .map(|v| ("suggestions", v))
                .or_else(|| field("enhancement").map(|v| ("enhancement", v)));
            return RawShape::Batch {
                errors,
                warnings,
                suggestions,
            };
        }

        RawShape::Legacy {
            phases: LegacyPhase::ALL.map(|phase| (phase, field(phase.key()))),
        }
    }
}

/// Normalize a raw analysis response into a [`CanonicalResult`]
///
/// Pure: the same input always yields the same result. Absent fields default
/// to empty or zero.
pub fn normalize(raw: &Value) -> Result<CanonicalResult, NormalizeError> {
    let root = raw.as_object().ok_or(NormalizeError::NotAnObject)?;

    let categorized = match present(root, "categorized_results") {
        Some(value) => Some(value.as_object().ok_or(NormalizeError::WrongType {
            field: "categorized_results",
            expected: "an object",
        })?),
        None => {
            if let Some(message) = present(root, "error").and_then(Value::as_str) {
                return Err(NormalizeError::Reported(message.to_string()));
            }
            None
        }
    };

    let mut result = CanonicalResult {
        overall_summary: optional_string(root, "overall_summary")?,
        total_errors_found: optional_count(root, "total_errors_found")?,
        total_pages_analyzed: optional_count(root, "total_pages_analyzed")?,
        ..Default::default()
    };

    let mut legacy_counts = None;
    match RawShape::detect(categorized) {
        RawShape::Batch {
            errors,
            warnings,
            suggestions,
        } => {
            result.shape = ResponseShape::Batch;
            result.categories.errors = parse_findings("errors", errors)?;
            result.categories.warnings = parse_findings("warnings", warnings)?;
            if let Some((key, value)) = suggestions {
                result.categories.suggestions = parse_findings(key, Some(value))?;
            }
        }
        RawShape::Legacy { phases } => {
            result.shape = ResponseShape::Legacy;
            let mut counts = Vec::with_capacity(phases.len());
            for (phase, value) in phases {
                let findings = parse_findings(phase.key(), value)?;
                counts.push((phase, findings.len()));
                result
                    .categories
                    .get_mut(phase.category())
                    .extend(findings);
            }
            legacy_counts = Some(counts);
        }
    }

    result.phase_summary = match (present(root, "phase_summary"), legacy_counts) {
        (Some(value), _) => phase_summary::from_server(value)?,
        (None, Some(counts)) => phase_summary::build(&counts),
        (None, None) => Vec::new(),
    };

    Ok(result)
}

/// Field value, treating JSON `null` as absent
fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn optional_string(
    map: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, NormalizeError> {
    present(map, key)
        .map(|v| {
            v.as_str().map(str::to_string).ok_or(NormalizeError::WrongType {
                field: key,
                expected: "a string",
            })
        })
        .transpose()
}

fn optional_count(map: &Map<String, Value>, key: &'static str) -> Result<u64, NormalizeError> {
    match present(map, key) {
        Some(v) => v.as_u64().ok_or(NormalizeError::WrongType {
            field: key,
            expected: "a non-negative integer",
        }),
        None => Ok(0),
    }
}

fn parse_findings(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Vec<Finding>, NormalizeError> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    let items = value.as_array().ok_or(NormalizeError::WrongType {
        field,
        expected: "an array",
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let text = item
                .get("text")
                .and_then(Value::as_str)
                .ok_or(NormalizeError::MissingText { field, index })?;
            Ok(Finding::new(parse_page(item.get("page")), text))
        })
        .collect()
}

/// Page numbers arrive as integers or numeric strings; anything else
/// (the batch service's "general") is a document-wide finding.
fn parse_page(value: Option<&Value>) -> PageRef {
    let number = match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n >= 1 => PageRef::Page(n),
        _ => PageRef::Document,
    }
}
