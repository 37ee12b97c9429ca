//! Isolates the first balanced JSON object in raw model output.

use crate::error::{preview_of, ItineraryError, Result};
use regex::Regex;
use serde_json::Value;
use std::{ops::Range, sync::OnceLock};
use tracing::debug;

fn leading_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\A```[a-z0-9_+\-]*").expect("leading fence regex must compile"))
}

fn trailing_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```\z").expect("trailing fence regex must compile"))
}

/// Byte range of `text` left after trimming and removing a leading
/// (optionally language-tagged) and a trailing markdown fence.
fn fenced_body(text: &str) -> Range<usize> {
    let mut start = text.len() - text.trim_start().len();
    let mut end = text.trim_end().len().max(start);

    if let Some(fence) = leading_fence_re().find(&text[start..end]) {
        start += fence.end();
        start = end - text[start..end].trim_start().len();
    }
    if let Some(fence) = trailing_fence_re().find(&text[start..end]) {
        end = start + fence.start();
        end = start + text[start..end].trim_end().len();
    }

    start..end
}

/// Remove a leading (optionally language-tagged) and a trailing markdown fence.
pub fn strip_code_fence(text: &str) -> &str {
    &text[fenced_body(text)]
}

/// Byte length of the balanced object starting at `text[0] == '{'`.
///
/// Braces count only outside string literals. A backslash consumes the next
/// character, so `\"` never toggles the string state and `\\` never leaves an
/// escape armed.
fn balanced_object_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, byte) in text.bytes().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// The first balanced object in a raw reply, with its byte position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectSpan<'a> {
    raw: &'a str,
    start: usize,
    len: usize,
}

impl<'a> ObjectSpan<'a> {
    /// Byte offset of the opening brace in the raw reply.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_str(&self) -> &'a str {
        &self.raw[self.start..self.start + self.len]
    }

    /// Reply text before and after the object.
    pub fn surrounding_text(&self) -> (&'a str, &'a str) {
        (&self.raw[..self.start], &self.raw[self.start + self.len..])
    }

    /// Decode the span as is; malformed JSON is reported, never repaired.
    pub fn decode(&self) -> Result<Value> {
        let span = self.as_str();
        serde_json::from_str(span).map_err(|source| ItineraryError::InvalidSyntax {
            preview: preview_of(span),
            source,
        })
    }
}

/// Locate the first balanced `{...}` span in `raw_text`, after fence stripping.
pub fn find_object_span(raw_text: &str) -> Result<ObjectSpan<'_>> {
    if raw_text.trim().is_empty() {
        return Err(ItineraryError::EmptyInput);
    }

    let body = fenced_body(raw_text);
    let text = &raw_text[body.clone()];
    let offset = text.find('{').ok_or_else(|| ItineraryError::NoObjectStart {
        preview: preview_of(text),
    })?;

    let start = body.start + offset;
    let candidate = &raw_text[start..body.end];
    let len = balanced_object_len(candidate).ok_or_else(|| ItineraryError::UnbalancedObject {
        preview: preview_of(candidate),
    })?;

    Ok(ObjectSpan {
        raw: raw_text,
        start,
        len,
    })
}

/// Decode the first balanced JSON object embedded in `raw_text`.
///
/// Surrounding prose and markdown fences are ignored.
pub fn extract_structured_object(raw_text: &str) -> Result<Value> {
    let span = find_object_span(raw_text)?;
    debug!(
        target: "itinerary::extract",
        span_start = span.start(),
        span_len = span.len(),
        raw_len = raw_text.len(),
        "located balanced object"
    );
    span.decode()
}
