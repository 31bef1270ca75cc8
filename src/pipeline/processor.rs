//! Record assembly and ordering — the pipeline entry points.
//!
//! Flow per message: decode subject/sender → normalize received date →
//! extract body text → infer due date → classify priority → detect pending
//! task → resolve read state from protocol flags. Heuristic failures
//! degrade to defaults; only a message whose raw bytes will not parse at
//! all produces no record (skip-and-continue, never abort).

use mail_parser::MessageParser;
use tracing::{debug, info, warn};

use crate::pipeline::body;
use crate::pipeline::dates::DateNormalizer;
use crate::pipeline::due::DueDateScanner;
use crate::pipeline::headers;
use crate::pipeline::priority::PriorityClassifier;
use crate::pipeline::tasks::TaskDetector;
use crate::pipeline::types::{MessageRecord, RawMessage};

/// Subject shown when the header is missing.
const NO_SUBJECT: &str = "(no subject)";

/// Sender shown when the From header is missing.
const UNKNOWN_SENDER: &str = "(unknown sender)";

/// Protocol flag marking a message as read, compared case-insensitively.
const SEEN_FLAG: &str = "\\Seen";

/// Builds one [`MessageRecord`] per raw message.
///
/// Holds the compiled sub-strategies (pattern sets, date cascades) so a
/// batch run compiles them once.
pub struct RecordAssembler {
    received_dates: DateNormalizer,
    due: DueDateScanner,
    priority: PriorityClassifier,
    tasks: TaskDetector,
}

impl RecordAssembler {
    pub fn new() -> Self {
        Self {
            received_dates: DateNormalizer::header(),
            due: DueDateScanner::new(),
            priority: PriorityClassifier::new(),
            tasks: TaskDetector::new(),
        }
    }

    /// Assemble the record for one raw message.
    ///
    /// `None` only when the raw bytes cannot be parsed as a message at
    /// all; every structurally valid message yields a fully-populated
    /// record. Deterministic: the same input always produces a
    /// field-for-field identical record.
    pub fn process(&self, raw: &RawMessage) -> Option<MessageRecord> {
        let Some(message) = MessageParser::default().parse(&raw.body) else {
            warn!(uid = %raw.uid, "unparseable message, no record produced");
            return None;
        };

        let subject = headers::subject_or(&message, NO_SUBJECT);
        let sender = headers::sender_display(&message, UNKNOWN_SENDER);
        let received_at = headers::header_text(&message, "Date")
            .and_then(|value| self.received_dates.normalize(&value));
        let body_text = body::extract_text(&message);
        let due_at = self.due.infer(&message, &body_text);
        let priority = self.priority.classify(&message, &subject, &body_text);
        let has_pending_task = self.tasks.detect(&subject, &body_text);
        let is_read = raw
            .flags
            .iter()
            .any(|flag| flag.eq_ignore_ascii_case(SEEN_FLAG));

        debug!(
            uid = %raw.uid,
            priority = priority.label(),
            is_read,
            has_pending_task,
            has_due = due_at.is_some(),
            "assembled record"
        );

        Some(MessageRecord {
            uid: raw.uid.clone(),
            subject,
            sender,
            received_at,
            due_at,
            priority,
            is_read,
            has_pending_task,
        })
    }

    /// Assemble a whole fetch, skipping unparseable messages.
    pub fn process_all(&self, raw: &[RawMessage]) -> Vec<MessageRecord> {
        let records: Vec<MessageRecord> = raw.iter().filter_map(|m| self.process(m)).collect();
        info!(
            processed = records.len(),
            total = raw.len(),
            "message batch assembled"
        );
        records
    }
}

/// Canonical display ordering: unread before read, then received-date
/// descending within each read-state group. Records without a received
/// date sort as the earliest possible time. Stable, so equal keys keep
/// their input order; never mutates the records themselves.
pub fn order(mut records: Vec<MessageRecord>) -> Vec<MessageRecord> {
    records.sort_by(|a, b| {
        a.is_read
            .cmp(&b.is_read)
            .then_with(|| b.received_key().cmp(&a.received_key()))
    });
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{PointInTime, Priority};
    use chrono::NaiveDate;

    fn raw(uid: &str, content: &str, flags: &[&str]) -> RawMessage {
        RawMessage {
            uid: uid.into(),
            body: content.as_bytes().to_vec(),
            flags: flags.iter().map(|f| f.to_string()).collect(),
        }
    }

    fn record(uid: &str, received: Option<(i32, u32, u32)>, is_read: bool) -> MessageRecord {
        MessageRecord {
            uid: uid.into(),
            subject: String::new(),
            sender: String::new(),
            received_at: received.map(|(y, m, d)| {
                PointInTime::ZoneUnknown(
                    NaiveDate::from_ymd_opt(y, m, d)
                        .unwrap()
                        .and_hms_opt(12, 0, 0)
                        .unwrap(),
                )
            }),
            due_at: None,
            priority: Priority::Normal,
            is_read,
            has_pending_task: false,
        }
    }

    #[test]
    fn assembles_full_record() {
        let assembler = RecordAssembler::new();
        let message = "From: Alice <alice@example.com>\r\n\
                       Subject: Informe mensual\r\n\
                       Date: Fri, 10 May 2024 10:00:00 +0200\r\n\r\n\
                       Por favor enviar el informe antes del 2024-05-10\r\n";
        let rec = assembler
            .process(&raw("42", message, &["\\Seen"]))
            .unwrap();

        assert_eq!(rec.uid, "42");
        assert_eq!(rec.subject, "Informe mensual");
        assert_eq!(rec.sender, "Alice <alice@example.com>");
        assert!(rec.received_at.is_some());
        assert_eq!(
            rec.due_at.unwrap().local_key().date(),
            NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
        );
        assert!(rec.is_read);
        assert!(rec.has_pending_task);
    }

    #[test]
    fn seen_flag_is_case_insensitive() {
        let assembler = RecordAssembler::new();
        let message = "Subject: x\r\n\r\nx";
        assert!(assembler.process(&raw("1", message, &["\\SEEN"])).unwrap().is_read);
        assert!(!assembler.process(&raw("1", message, &["\\Flagged"])).unwrap().is_read);
        assert!(!assembler.process(&raw("1", message, &[])).unwrap().is_read);
    }

    #[test]
    fn missing_date_header_is_explicit_none() {
        let assembler = RecordAssembler::new();
        let rec = assembler
            .process(&raw("1", "Subject: x\r\n\r\nhola", &[]))
            .unwrap();
        assert_eq!(rec.received_at, None);
        assert_eq!(rec.due_at, None);
        assert_eq!(rec.priority, Priority::Normal);
    }

    #[test]
    fn process_is_idempotent() {
        let assembler = RecordAssembler::new();
        let message = raw(
            "9",
            "From: a@b.c\r\nSubject: urgente: tarea\r\nDate: Fri, 10 May 2024 10:00:00 +0000\r\n\r\nvence 2024-06-01",
            &["\\Seen"],
        );
        let first = assembler.process(&message).unwrap();
        let second = assembler.process(&message).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn process_all_skips_unparseable_input() {
        let assembler = RecordAssembler::new();
        let batch = vec![
            raw("1", "Subject: ok\r\n\r\nhola", &[]),
            RawMessage {
                uid: "2".into(),
                body: Vec::new(),
                flags: vec![],
            },
        ];
        let records = assembler.process_all(&batch);
        // The empty message yields no record; the batch never aborts.
        assert!(records.iter().any(|r| r.uid == "1"));
        assert!(records.iter().all(|r| r.uid != "2"));
    }

    #[test]
    fn order_puts_unread_first() {
        let ordered = order(vec![
            record("read-new", Some((2024, 6, 1)), true),
            record("unread-old", Some((2024, 1, 1)), false),
        ]);
        assert_eq!(ordered[0].uid, "unread-old");
        assert_eq!(ordered[1].uid, "read-new");
    }

    #[test]
    fn order_is_received_descending_within_group() {
        let ordered = order(vec![
            record("old", Some((2024, 1, 1)), false),
            record("new", Some((2024, 6, 1)), false),
            record("undated", None, false),
        ]);
        assert_eq!(ordered[0].uid, "new");
        assert_eq!(ordered[1].uid, "old");
        assert_eq!(ordered[2].uid, "undated");
    }

    #[test]
    fn order_is_stable_for_equal_keys() {
        let ordered = order(vec![
            record("a", Some((2024, 3, 3)), false),
            record("b", Some((2024, 3, 3)), false),
        ]);
        assert_eq!(ordered[0].uid, "a");
        assert_eq!(ordered[1].uid, "b");
    }
}
