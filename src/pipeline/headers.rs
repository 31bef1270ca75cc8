//! Decoded header access.
//!
//! The actual RFC 2047 work is `mail-parser`'s: mixed encoded and plain
//! segments come back concatenated in their original order, and
//! undecodable bytes turn into replacement characters instead of errors.
//! The helpers here only add absent-header defaults and the sender display
//! string on top of that.

use mail_parser::{HeaderValue, Message};

/// Decoded, trimmed text of the named header. Falls back to the raw value
/// for headers mail-parser keeps in structured form (Date, address lists).
/// `None` only when the header is absent.
pub fn header_text(message: &Message, name: &str) -> Option<String> {
    if let Some(text) = message.header(name).and_then(HeaderValue::as_text) {
        return Some(text.trim().to_string());
    }
    message.header_raw(name).map(|raw| raw.trim().to_string())
}

/// Decoded subject, or `default` when the header is absent.
pub fn subject_or(message: &Message, default: &str) -> String {
    message
        .subject()
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| default.to_string())
}

/// Human-readable sender: `Name <address>` when both parts are present,
/// whichever part exists otherwise. A display string only — never
/// validated as an address.
pub fn sender_display(message: &Message, default: &str) -> String {
    match message.from().and_then(|addr| addr.first()) {
        Some(sender) => match (sender.name(), sender.address()) {
            (Some(name), Some(address)) => format!("{} <{}>", name.trim(), address),
            (None, Some(address)) => address.to_string(),
            (Some(name), None) => name.trim().to_string(),
            (None, None) => default.to_string(),
        },
        None => header_text(message, "From").unwrap_or_else(|| default.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mail_parser::MessageParser;

    fn parse(raw: &str) -> mail_parser::Message<'_> {
        MessageParser::default().parse(raw.as_bytes()).unwrap()
    }

    #[test]
    fn subject_decodes_encoded_words() {
        let msg = parse(
            "Subject: =?UTF-8?B?UmV1bmnDs24gdXJnZW50ZQ==?=\r\n\
             From: alice@example.com\r\n\r\nhola",
        );
        assert_eq!(subject_or(&msg, "(no subject)"), "Reunión urgente");
    }

    #[test]
    fn subject_defaults_when_absent() {
        let msg = parse("From: alice@example.com\r\n\r\nhola");
        assert_eq!(subject_or(&msg, "(no subject)"), "(no subject)");
    }

    #[test]
    fn sender_formats_name_and_address() {
        let msg = parse(
            "From: Alice Araya <alice@example.com>\r\n\
             Subject: hola\r\n\r\nhola",
        );
        assert_eq!(
            sender_display(&msg, "(unknown sender)"),
            "Alice Araya <alice@example.com>"
        );
    }

    #[test]
    fn sender_bare_address() {
        let msg = parse("From: bob@example.com\r\nSubject: x\r\n\r\nx");
        assert_eq!(sender_display(&msg, "(unknown sender)"), "bob@example.com");
    }

    #[test]
    fn sender_defaults_when_absent() {
        let msg = parse("Subject: x\r\n\r\nx");
        assert_eq!(sender_display(&msg, "(unknown sender)"), "(unknown sender)");
    }

    #[test]
    fn header_text_reads_unstructured_headers() {
        let msg = parse(
            "Subject: x\r\nX-Priority: 1 (Highest)\r\n\r\nx",
        );
        assert_eq!(
            header_text(&msg, "X-Priority").as_deref(),
            Some("1 (Highest)")
        );
    }

    #[test]
    fn header_text_falls_back_to_raw_for_date() {
        let msg = parse(
            "Subject: x\r\nDate: Fri, 10 May 2024 10:00:00 +0200\r\n\r\nx",
        );
        let raw = header_text(&msg, "Date").unwrap();
        assert!(raw.contains("10 May 2024"));
    }

    #[test]
    fn header_text_none_when_absent() {
        let msg = parse("Subject: x\r\n\r\nx");
        assert_eq!(header_text(&msg, "Reply-By"), None);
    }
}
