//! Inline image payloads as `data:` URIs.
//!
//! The upload client submits images as `data:<mime>;base64,<payload>`
//! strings. This module parses them back into their parts and builds them
//! for the CLI ingest path.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use once_cell::sync::Lazy;
use regex::Regex;

/// Accepted payload shape: a MIME type followed by a non-empty base64
/// body. Anything else is rejected before the model is ever involved.
static DATA_URI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:([^;,]+);base64,(.+)$").expect("valid data URI regex"));

/// An image held as its MIME type plus base64-encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub data: String,
}

impl DataUri {
    /// Parse a `data:` URI string, or `None` when it does not match the
    /// expected shape (missing MIME type, missing `;base64,` marker, or an
    /// empty payload).
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = DATA_URI_RE.captures(raw)?;
        Some(Self {
            mime_type: caps[1].to_string(),
            data: caps[2].to_string(),
        })
    }

    /// Encode raw bytes into a payload the relay accepts.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}
