//! Selected document handle

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tuck_common::{Error, Result};

/// The only media type the analysis service accepts
pub const ACCEPTED_MEDIA_TYPE: &str = "application/pdf";

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Immutable handle to a file chosen for analysis
///
/// Cloning is cheap: the file contents are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    declared_media_type: String,
    contents: Arc<[u8]>,
}

impl Document {
    pub fn new(
        name: impl Into<String>,
        declared_media_type: impl Into<String>,
        contents: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_media_type: declared_media_type.into(),
            contents: contents.into(),
        }
    }

    /// Read a file from disk and declare its media type
    ///
    /// The media type is sniffed from the file contents; when the contents
    /// are not recognized the extension decides.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidInput(format!("not a file path: {}", path.display())))?
            .to_string();

        let contents = tokio::fs::read(path).await?;
        let media_type = declare_media_type(path, &contents);

        tracing::debug!(
            file = %name,
            bytes = contents.len(),
            media_type = %media_type,
            "Document loaded"
        );

        Ok(Self::new(name, media_type, contents))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn byte_size(&self) -> u64 {
        self.contents.len() as u64
    }

    pub fn declared_media_type(&self) -> &str {
        &self.declared_media_type
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// True when the service will accept this document
    pub fn is_accepted_type(&self) -> bool {
        self.declared_media_type == ACCEPTED_MEDIA_TYPE
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("byte_size", &self.byte_size())
            .field("declared_media_type", &self.declared_media_type)
            .finish()
    }
}

fn declare_media_type(path: &Path, contents: &[u8]) -> String {
    if let Some(kind) = infer::get(contents) {
        return kind.mime_type().to_string();
    }

    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => ACCEPTED_MEDIA_TYPE.to_string(),
        _ => FALLBACK_MEDIA_TYPE.to_string(),
    }
}
