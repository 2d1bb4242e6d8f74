//! Minimal multipart/form-data inspection.
//!
//! The upload route only needs to know whether the request carries a file
//! part and, if so, its filename and declared content type. This module scans
//! part headers for that; part payloads are never interpreted.

use crate::error::WebError;

/// Metadata of the first file part found in a multipart body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub filename: String,
    pub content_type: Option<String>,
}

/// Finds the first part carrying a `filename` in a multipart/form-data body.
///
/// Returns `Ok(None)` when the body is well-formed multipart but contains no
/// file part. A missing or non-multipart content type is a validation error.
pub fn first_file(content_type: Option<&str>, body: &[u8]) -> Result<Option<FilePart>, WebError> {
    let content_type = content_type.ok_or_else(|| WebError::validation("expected multipart/form-data"))?;
    let mime: mime::Mime =
        content_type.parse().map_err(|_| WebError::validation("malformed content-type header"))?;

    if mime.essence_str() != "multipart/form-data" {
        return Err(WebError::validation("expected multipart/form-data"));
    }

    let boundary = mime
        .get_param(mime::BOUNDARY)
        .ok_or_else(|| WebError::validation("multipart body without boundary"))?;

    // Part headers are ASCII; a lossy view is fine for scanning them even if
    // the file payloads are binary.
    let text = String::from_utf8_lossy(body);
    let delimiter = format!("--{boundary}");

    for part in text.split(delimiter.as_str()) {
        let part = part.trim_start_matches("\r\n");
        if part.is_empty() || part.starts_with("--") {
            continue;
        }

        let head = match part.split_once("\r\n\r\n").or_else(|| part.split_once("\n\n")) {
            Some((head, _payload)) => head,
            None => continue,
        };

        let mut filename = None;
        let mut part_content_type = None;
        for line in head.lines() {
            let lower = line.to_ascii_lowercase();
            if lower.starts_with("content-disposition:") {
                filename = extract_quoted(line, "filename=");
            } else if lower.starts_with("content-type:") {
                part_content_type = line.split_once(':').map(|(_, value)| value.trim().to_string());
            }
        }

        if let Some(filename) = filename {
            return Ok(Some(FilePart { filename, content_type: part_content_type }));
        }
    }

    Ok(None)
}

fn extract_quoted(line: &str, key: &str) -> Option<String> {
    let start = line.find(key)? + key.len();
    let rest = line[start..].strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}
