use anyhow::Context;

use inbox_triage::config::ReportConfig;
use inbox_triage::mailbox::{ImapMailbox, MailSource};
use inbox_triage::pipeline::{RecordAssembler, order};
use inbox_triage::report::{CsvExporter, RecordSink};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let Some(config) = ReportConfig::from_env() else {
        eprintln!("Error: INBOX_IMAP_HOST not set");
        eprintln!("  export INBOX_IMAP_HOST=imap.example.com");
        eprintln!("  export INBOX_USERNAME=you@example.com INBOX_PASSWORD=...");
        std::process::exit(1);
    };

    eprintln!("📬 Inbox Triage v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   Mailbox: {} on {}:{}",
        config.mailbox, config.imap_host, config.imap_port
    );
    eprintln!("   Report: {}", config.report_path.display());
    if let Some(limit) = config.fetch_limit {
        eprintln!("   Limit: most recent {limit} messages");
    }

    let report_path = config.report_path.clone();
    let mailbox = ImapMailbox::new(config);
    let raw = mailbox.fetch().await.context("mailbox fetch failed")?;

    let assembler = RecordAssembler::new();
    let records = order(assembler.process_all(&raw));

    let unread = records.iter().filter(|r| !r.is_read).count();
    let pending = records.iter().filter(|r| r.has_pending_task).count();

    CsvExporter::new(&report_path)
        .export(&records)
        .context("report export failed")?;

    eprintln!(
        "   {} messages — {} unread, {} with pending tasks",
        records.len(),
        unread,
        pending
    );

    Ok(())
}
