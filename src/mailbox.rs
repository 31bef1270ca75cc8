//! Mailbox collaborator — a blocking IMAP session over TLS behind an
//! async seam.
//!
//! The session is strictly read-only: messages come down via
//! `BODY.PEEK[]` and the client never issues `STORE`, so server-side
//! flags survive the run untouched. A message whose fetch fails is
//! logged and skipped; only session-level failures (connect, login,
//! select, listing) surface as errors.

use std::io::{Read, Write as IoWrite};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::ReportConfig;
use crate::error::MailboxError;
use crate::pipeline::types::RawMessage;

/// Upstream collaborator seam: anything able to hand over raw messages
/// with their protocol flags.
#[async_trait]
pub trait MailSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RawMessage>, MailboxError>;
}

/// IMAP mailbox over TLS.
pub struct ImapMailbox {
    config: ReportConfig,
}

impl ImapMailbox {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MailSource for ImapMailbox {
    async fn fetch(&self) -> Result<Vec<RawMessage>, MailboxError> {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || fetch_mailbox(&config))
            .await
            .map_err(|e| MailboxError::ListFailed(format!("fetch task panicked: {e}")))?
    }
}

type TlsStream = rustls::StreamOwned<rustls::ClientConnection, TcpStream>;

/// Run one complete read-only session: greeting → LOGIN → SELECT →
/// SEARCH ALL → per-id FETCH → LOGOUT. Blocking — run under
/// `spawn_blocking`.
fn fetch_mailbox(config: &ReportConfig) -> Result<Vec<RawMessage>, MailboxError> {
    let mut tls = connect(config)?;
    let _greeting = read_line(&mut tls)?;

    let login = send_cmd(
        &mut tls,
        "A1",
        &format!("LOGIN \"{}\" \"{}\"", config.username, config.password),
    )?;
    if !is_ok(&login) {
        return Err(MailboxError::AuthFailed {
            username: config.username.clone(),
        });
    }

    let select = send_cmd(&mut tls, "A2", &format!("SELECT \"{}\"", config.mailbox))?;
    if !is_ok(&select) {
        return Err(MailboxError::SelectFailed {
            mailbox: config.mailbox.clone(),
            reason: last_line(&select),
        });
    }

    let search = send_cmd(&mut tls, "A3", "SEARCH ALL")?;
    if !is_ok(&search) {
        return Err(MailboxError::ListFailed(last_line(&search)));
    }
    let mut ids: Vec<String> = Vec::new();
    for line in &search {
        if line.starts_with("* SEARCH") {
            ids.extend(line.split_whitespace().skip(2).map(str::to_string));
        }
    }
    keep_most_recent(&mut ids, config.fetch_limit);
    debug!(count = ids.len(), mailbox = %config.mailbox, "message listing complete");

    let flags_re = Regex::new(r"FLAGS \(([^)]*)\)").unwrap();
    let mut messages = Vec::with_capacity(ids.len());
    let mut tag_counter = 4_u32;

    for id in &ids {
        let tag = format!("A{tag_counter}");
        tag_counter += 1;
        let response = match send_cmd(&mut tls, &tag, &format!("FETCH {id} (BODY.PEEK[] FLAGS)")) {
            Ok(lines) => lines,
            Err(e) => {
                warn!(uid = %id, error = %e, "fetch failed, skipping message");
                continue;
            }
        };
        if !is_ok(&response) {
            warn!(uid = %id, "fetch rejected, skipping message");
            continue;
        }
        match split_fetch_response(&response, &flags_re) {
            Some((flags, body)) => messages.push(RawMessage {
                uid: id.clone(),
                body,
                flags,
            }),
            None => warn!(uid = %id, "malformed fetch response, skipping message"),
        }
    }

    let logout_tag = format!("A{tag_counter}");
    let _ = send_cmd(&mut tls, &logout_tag, "LOGOUT");

    Ok(messages)
}

fn connect(config: &ReportConfig) -> Result<TlsStream, MailboxError> {
    let tcp = TcpStream::connect((&*config.imap_host, config.imap_port)).map_err(|e| {
        MailboxError::ConnectionFailed {
            host: config.imap_host.clone(),
            reason: e.to_string(),
        }
    })?;
    tcp.set_read_timeout(Some(Duration::from_secs(30)))?;

    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let tls_config = Arc::new(
        rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth(),
    );
    let server_name: rustls::pki_types::ServerName<'_> =
        rustls::pki_types::ServerName::try_from(config.imap_host.clone())
            .map_err(|e| MailboxError::Tls(e.to_string()))?;
    let conn = rustls::ClientConnection::new(tls_config, server_name)
        .map_err(|e| MailboxError::Tls(e.to_string()))?;
    Ok(rustls::StreamOwned::new(conn, tcp))
}

fn read_line(tls: &mut TlsStream) -> Result<String, MailboxError> {
    let mut buf = Vec::new();
    loop {
        let mut byte = [0u8; 1];
        match tls.read(&mut byte) {
            Ok(0) => return Err(MailboxError::Disconnected),
            Ok(_) => {
                buf.push(byte[0]);
                if buf.ends_with(b"\r\n") {
                    return Ok(String::from_utf8_lossy(&buf).to_string());
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Send one tagged command and collect every response line up to (and
/// including) the tagged completion line.
fn send_cmd(tls: &mut TlsStream, tag: &str, cmd: &str) -> Result<Vec<String>, MailboxError> {
    let full = format!("{tag} {cmd}\r\n");
    tls.write_all(full.as_bytes())?;
    tls.flush()?;
    let mut lines = Vec::new();
    loop {
        let line = read_line(tls)?;
        let done = line.starts_with(tag);
        lines.push(line);
        if done {
            break;
        }
    }
    Ok(lines)
}

fn is_ok(lines: &[String]) -> bool {
    lines.last().is_some_and(|l| l.contains("OK"))
}

fn last_line(lines: &[String]) -> String {
    lines.last().map(|l| l.trim().to_string()).unwrap_or_default()
}

/// Truncate the listing to its most recent `limit` entries.
fn keep_most_recent(ids: &mut Vec<String>, limit: Option<usize>) {
    if let Some(limit) = limit {
        if ids.len() > limit {
            ids.drain(..ids.len() - limit);
        }
    }
}

/// Pull flags and raw message bytes out of one FETCH response.
///
/// Flags usually ride the untagged FETCH line; some servers append them
/// after the body literal instead, so the closing line is checked too.
fn split_fetch_response(lines: &[String], flags_re: &Regex) -> Option<(Vec<String>, Vec<u8>)> {
    if lines.len() < 3 {
        return None;
    }
    let closing = lines.len() - 2;
    let flags_line = if flags_re.is_match(&lines[0]) {
        &lines[0]
    } else {
        &lines[closing]
    };
    let flags: Vec<String> = flags_re
        .captures(flags_line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    let body_end = if lines[closing].trim_end().ends_with(')') {
        closing
    } else {
        closing + 1
    };
    let body: String = lines[1..body_end].concat();
    Some((flags, body.into_bytes()))
}
