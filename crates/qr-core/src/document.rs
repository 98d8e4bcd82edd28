//! Documents linked from an entry: external URLs and inlined files

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

use crate::error::{QrError, Result};

/// `documentType` marker for external links
pub const URL_DOCUMENT_TYPE: &str = "url";

/// MIME type used when the extension is unknown
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Where an edited entry's document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Read a local file and inline it as a data URI
    File(PathBuf),
    /// Link an external URL
    Url(String),
    /// Leave the current document as it is
    Keep,
}

/// Check that `raw` is an absolute http(s) URL
pub fn validate_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| QrError::InvalidDocument(format!("{}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(QrError::InvalidDocument(format!(
            "unsupported URL scheme {:?}",
            other
        ))),
    }
}

/// Guess a MIME type from the file extension
pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("txt") => "text/plain",
        Some("html") | Some("htm") => "text/html",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("zip") => "application/zip",
        _ => FALLBACK_MIME,
    }
}

/// Read a file into a `data:` URI. Returns the URI and its MIME type.
pub async fn read_data_uri(path: &Path, limit: Option<usize>) -> Result<(String, String)> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| QrError::InvalidDocument(format!("{}: {}", path.display(), e)))?;

    if let Some(limit) = limit {
        if bytes.len() > limit {
            return Err(QrError::DocumentTooLarge {
                size: bytes.len(),
                limit,
            });
        }
    }

    let mime = guess_mime(path);
    debug!("Inlining {} ({} bytes, {})", path.display(), bytes.len(), mime);

    Ok((encode_data_uri(mime, &bytes), mime.to_string()))
}

/// Build a base64 `data:` URI
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// A decoded `data:` URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUri {
    /// Whether `raw` looks like a data URI at all
    pub fn is_data_uri(raw: &str) -> bool {
        raw.starts_with("data:")
    }

    /// Decode `data:<mime>[;params];base64,<payload>`
    pub fn parse(raw: &str) -> Result<Self> {
        let rest = raw
            .strip_prefix("data:")
            .ok_or_else(|| QrError::InvalidDocument("missing data: prefix".to_string()))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| QrError::InvalidDocument("missing data URI payload".to_string()))?;

        let header = header
            .strip_suffix(";base64")
            .ok_or_else(|| QrError::InvalidDocument("data URI is not base64".to_string()))?;

        let mime = if header.is_empty() {
            FALLBACK_MIME.to_string()
        } else {
            header.to_string()
        };

        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| QrError::InvalidDocument(format!("bad base64 payload: {}", e)))?;

        Ok(Self { mime, bytes })
    }
}
