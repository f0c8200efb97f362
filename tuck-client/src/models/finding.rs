//! Reported issues

use crate::services::section_tag::{self, SectionTag};
use serde::{Serialize, Serializer};
use std::fmt;

/// Where a finding applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PageRef {
    /// 1-based page number
    Page(u32),
    /// Not tied to a page (the batch service labels these "general")
    Document,
}

impl PageRef {
    /// Page number, `None` for document-wide findings
    pub fn number(&self) -> Option<u32> {
        match self {
            Self::Page(n) => Some(*n),
            Self::Document => None,
        }
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(n) => write!(f, "Page {}", n),
            Self::Document => f.write_str("General"),
        }
    }
}

impl Serialize for PageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Page(n) => serializer.serialize_u32(*n),
            Self::Document => serializer.serialize_str("general"),
        }
    }
}

/// One reported issue
///
/// The section tag and body are derived from the raw text when the finding
/// is built and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    page: PageRef,
    raw_text: String,
    section_tag: Option<String>,
    body_text: String,
}

impl Finding {
    pub fn new(page: PageRef, raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let SectionTag { tag, body } = section_tag::extract(&raw_text);
        Self {
            page,
            section_tag: tag,
            body_text: body,
            raw_text,
        }
    }

    pub fn page(&self) -> PageRef {
        self.page
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn section_tag(&self) -> Option<&str> {
        self.section_tag.as_deref()
    }

    pub fn body_text(&self) -> &str {
        &self.body_text
    }
}
