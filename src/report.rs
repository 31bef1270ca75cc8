//! Report export — the downstream collaborator boundary.
//!
//! Presentation decisions (column labels, yes/no rendering, timestamp
//! formatting) live here and nowhere else. The pipeline hands over the
//! ordered records and keeps no copy of them.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::error::ExportError;
use crate::pipeline::types::{MessageRecord, PointInTime};

/// Downstream collaborator seam: consumes an ordered record sequence.
pub trait RecordSink {
    fn export(&self, records: &[MessageRecord]) -> Result<(), ExportError>;
}

const HEADER: &str = "uid,subject,sender,received_at,due_at,priority,read_status,pending_task";

/// CSV report writer.
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for CsvExporter {
    fn export(&self, records: &[MessageRecord]) -> Result<(), ExportError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ExportError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let mut out = String::with_capacity(HEADER.len() + records.len() * 96);
        out.push_str(HEADER);
        out.push('\n');
        for record in records {
            let row = [
                csv_escape(&record.uid),
                csv_escape(&record.subject),
                csv_escape(&record.sender),
                format_instant(record.received_at.as_ref()),
                format_instant(record.due_at.as_ref()),
                record.priority.label().to_string(),
                if record.is_read { "read" } else { "unread" }.to_string(),
                if record.has_pending_task { "yes" } else { "no" }.to_string(),
            ]
            .join(",");
            out.push_str(&row);
            out.push('\n');
        }

        fs::write(&self.path, out).map_err(|source| ExportError::Write {
            path: self.path.display().to_string(),
            source,
        })?;
        info!(path = %self.path.display(), rows = records.len(), "report written");
        Ok(())
    }
}

/// Minimal RFC 4180 quoting: wrap when the value contains a comma, quote
/// or line break; double any embedded quotes.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn format_instant(value: Option<&PointInTime>) -> String {
    match value {
        Some(PointInTime::Zoned(dt)) => dt.to_rfc3339(),
        Some(PointInTime::ZoneUnknown(naive)) => naive.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::Priority;
    use chrono::NaiveDate;

    fn sample(uid: &str, subject: &str) -> MessageRecord {
        MessageRecord {
            uid: uid.into(),
            subject: subject.into(),
            sender: "Alice <alice@example.com>".into(),
            received_at: None,
            due_at: Some(PointInTime::ZoneUnknown(
                NaiveDate::from_ymd_opt(2024, 5, 10)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            )),
            priority: Priority::High,
            is_read: false,
            has_pending_task: true,
        }
    }

    #[test]
    fn csv_escape_quotes_commas_and_quotes() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn naive_due_date_formats_without_offset() {
        let record = sample("1", "x");
        assert_eq!(
            format_instant(record.due_at.as_ref()),
            "2024-05-10 00:00:00"
        );
    }

    #[test]
    fn export_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/report.csv");
        let exporter = CsvExporter::new(&path);
        exporter
            .export(&[sample("1", "Informe, urgente"), sample("2", "Hola")])
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some(HEADER));
        let first = lines.next().unwrap();
        assert!(first.starts_with("1,\"Informe, urgente\""));
        assert!(first.ends_with("high,unread,yes"));
        assert_eq!(lines.next().map(|l| l.starts_with("2,Hola")), Some(true));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn export_empty_set_is_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        CsvExporter::new(&path).export(&[]).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, format!("{HEADER}\n"));
    }
}
