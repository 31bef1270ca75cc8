//! Body text extraction from the message part tree.

use mail_parser::{Message, MessagePart, MimeHeaders};

/// Best-effort plain-text rendition of a message body.
///
/// Walks every part once per pass: the first plain-text part not delivered
/// as an attachment wins; failing that, the first HTML part with its tags
/// stripped; failing that, empty text. A part that cannot be decoded is
/// skipped, never fatal. A message without nested parts is just a
/// single-part walk over its root.
pub fn extract_text(message: &Message) -> String {
    for part in &message.parts {
        if !part.is_text() || is_html(part) || is_attachment(part) {
            continue;
        }
        if let Some(text) = part.text_contents() {
            return text.trim().to_string();
        }
    }
    for part in &message.parts {
        if !is_html(part) {
            continue;
        }
        if let Some(html) = part.text_contents() {
            return strip_html(html);
        }
    }
    String::new()
}

fn is_html(part: &MessagePart) -> bool {
    part.content_type().is_some_and(|ct| {
        ct.ctype().eq_ignore_ascii_case("text")
            && ct.subtype().is_some_and(|s| s.eq_ignore_ascii_case("html"))
    })
}

fn is_attachment(part: &MessagePart) -> bool {
    part.content_disposition()
        .is_some_and(|cd| cd.ctype().eq_ignore_ascii_case("attachment"))
}

/// Strip HTML tags and collapse whitespace runs to single spaces.
pub fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result.split_whitespace().collect::<Vec<_>>().join(" ")
}
