//! Run configuration, built from environment variables.

use std::path::PathBuf;

/// Default report location when `INBOX_REPORT_PATH` is unset.
const DEFAULT_REPORT_PATH: &str = "./reports/inbox-report.csv";

/// Everything one analysis run needs to know.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub imap_host: String,
    pub imap_port: u16,
    pub username: String,
    pub password: String,
    /// Folder to analyze.
    pub mailbox: String,
    /// Cap on how many of the most recent messages to fetch.
    pub fetch_limit: Option<usize>,
    /// Where the CSV report lands.
    pub report_path: PathBuf,
}

impl ReportConfig {
    /// Build config from environment variables.
    /// Returns `None` if `INBOX_IMAP_HOST` is not set (nothing to analyze).
    pub fn from_env() -> Option<Self> {
        let imap_host = std::env::var("INBOX_IMAP_HOST").ok()?;

        let imap_port: u16 = std::env::var("INBOX_IMAP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(993);

        let username = std::env::var("INBOX_USERNAME").unwrap_or_default();
        let password = std::env::var("INBOX_PASSWORD").unwrap_or_default();

        let mailbox = std::env::var("INBOX_MAILBOX").unwrap_or_else(|_| "INBOX".to_string());

        let fetch_limit: Option<usize> = std::env::var("INBOX_FETCH_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n| *n > 0);

        let report_path = std::env::var("INBOX_REPORT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_REPORT_PATH));

        Some(Self {
            imap_host,
            imap_port,
            username,
            password,
            mailbox,
            fetch_limit,
            report_path,
        })
    }
}
