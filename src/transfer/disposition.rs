//! Content-Disposition parsing for download responses.
//!
//! The server suggests a save name via `Content-Disposition: attachment;
//! filename=...`. Parsing is tolerant by contract: an absent header, a
//! header with no parameters, or a malformed header all yield "no filename"
//! rather than an error.

use reqwest::header::{CONTENT_DISPOSITION, HeaderMap};
use tracing::debug;

/// Extracts the server-suggested filename from a response header map.
///
/// Returns `None` when the Content-Disposition header is absent, carries no
/// `filename` parameter, or cannot be parsed. Never returns `Some("")`.
#[must_use]
pub fn filename_from_headers(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(CONTENT_DISPOSITION)?.to_str().ok()?;
    let file_name = parse_content_disposition(header);
    debug!(?file_name, "parsed Content-Disposition");
    file_name
}

/// Parses a Content-Disposition value to extract the filename parameter.
///
/// Handles:
/// - `attachment; filename="example.pdf"`
/// - `attachment; filename=example.pdf`
/// - `attachment; filename*=UTF-8''example.pdf` (RFC 5987)
pub(crate) fn parse_content_disposition(header: &str) -> Option<String> {
    // Try filename*= first (RFC 5987 encoded)
    if let Some(pos) = header.find("filename*=") {
        let value = header[pos + 10..].trim();
        // Format: charset'language'encoded_value
        if let Some(quote_pos) = value.find("''") {
            let encoded = &value[quote_pos + 2..];
            let end = encoded.find(';').unwrap_or(encoded.len());
            let encoded_name = encoded[..end].trim();
            if let Ok(decoded) = urlencoding::decode(encoded_name)
                && !decoded.is_empty()
            {
                return Some(decoded.into_owned());
            }
        }
    }

    // Try regular filename=
    if let Some(pos) = header.find("filename=") {
        let value = header[pos + 9..].trim();

        // Handle quoted filename
        if let Some(stripped) = value.strip_prefix('"') {
            if let Some(end) = stripped.find('"') {
                let filename = &stripped[..end];
                if !filename.is_empty() {
                    return Some(filename.to_string());
                }
            }
        } else {
            // Unquoted - take until ; or end
            let end = value.find(';').unwrap_or(value.len());
            let filename = value[..end].trim();
            if !filename.is_empty() {
                return Some(filename.to_string());
            }
        }
    }

    None
}
