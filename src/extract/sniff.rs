/// Number of leading bytes inspected when sniffing
const SNIFF_LEN: usize = 512;

const HTML_MARKERS: &[&[u8]] = &[
    b"<!doctype html",
    b"<html",
    b"<head",
    b"<body",
    b"<title",
    b"<p>",
    b"<h1",
    b"<div",
];

/// Guesses a content type from the leading bytes of a local file
///
/// Only unambiguous signatures are recognized. Generic text returns an empty
/// string so that the file extension decides which extractor runs.
///
/// # Examples
///
/// ```
/// use chew::extract::sniff_content_type;
///
/// assert_eq!(sniff_content_type(b"%PDF-1.7 ..."), "application/pdf");
/// assert_eq!(sniff_content_type(b"\n  <!DOCTYPE html><html>"), "text/html");
/// assert_eq!(sniff_content_type(b"{\"plain\": \"json\"}"), "");
/// ```
pub fn sniff_content_type(body: &[u8]) -> &'static str {
    let head = &body[..body.len().min(SNIFF_LEN)];

    if head.starts_with(b"%PDF-") {
        return "application/pdf";
    }
    if head.starts_with(b"PK\x03\x04") {
        return "application/zip";
    }

    let start = head
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(head.len());
    let trimmed = head[start..].to_ascii_lowercase();

    if trimmed.starts_with(b"<?xml") {
        return "text/xml";
    }
    if HTML_MARKERS.iter().any(|marker| trimmed.starts_with(marker)) {
        return "text/html";
    }

    ""
}
