//! History persister
//!
//! Flushes the history ring to a file on a [`FileSystem`] and reads it back.
//!
//! # File format
//!
//! UTF-8 text, a header line then one line per record, oldest first:
//!
//! ```text
//! # errlog history v1 entries=2
//! seq=17 status=0x80ff010d value=0x1234 thread=0x2f41 loc=src/main.rs:40 msg=timeout
//! seq=18 status=0x9001010f value=0x0 thread=0x2f41 loc=- msg=two\nlines
//! ```
//!
//! `msg` is the rest of the line, with `\`, newline and carriage return
//! escaped as `\\`, `\n` and `\r`.
//!
//! Both directions block and allocate. Never call them from a signal
//! handler or an error hook.

use std::fmt::Write as _;

use errlog_core::error::{ErrlogError, ErrlogResult};
use errlog_core::record::ErrorRecord;
use errlog_core::status::Status;
use errlog_core::{kerror, kinfo, kwarn};

use crate::reporter::ErrorReporter;
use crate::storage::{FileHandle, FileSystem, OpenMode, StorageError};

const HEADER_PREFIX: &str = "# errlog history v1 entries=";

/// Bytes requested per `read` call.
pub const READ_CHUNK: usize = 64;

/// A record as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRecord {
    pub sequence: u64,
    pub status: Status,
    pub value: usize,
    pub thread_id: u64,
    /// `(file, line)` of the call site, if it was captured.
    pub location: Option<(String, u32)>,
    pub message: String,
}

impl From<&ErrorRecord> for PersistedRecord {
    fn from(r: &ErrorRecord) -> Self {
        PersistedRecord {
            sequence: r.sequence,
            status: r.status,
            value: r.value,
            thread_id: r.thread_id,
            location: r.location.map(|l| (l.file().to_string(), l.line())),
            message: r.message.to_string(),
        }
    }
}

/// Write the reporter's history to `path`, replacing any previous file.
///
/// Mounts the volume if needed, formatting it when it will not mount.
/// Storage failures are logged and reported as `FailedOperation`.
pub fn save_history<const N: usize, F>(
    reporter: &ErrorReporter<N>,
    fs: &mut F,
    path: &str,
) -> ErrlogResult<()>
where
    F: FileSystem + ?Sized,
{
    let snapshot = reporter.history_snapshot();
    let mut text = String::with_capacity(64 + snapshot.len() * 96);
    let _ = writeln!(text, "{}{}", HEADER_PREFIX, snapshot.len());
    for record in snapshot.iter() {
        encode_record(&mut text, record);
    }

    write_file(fs, path, text.as_bytes()).map_err(|e| {
        kerror!("saving error history to {} failed: {}", path, e);
        ErrlogError::FailedOperation
    })?;
    kinfo!("saved {} error records to {}", snapshot.len(), path);
    Ok(())
}

/// Read a history file written by [`save_history`].
pub fn read_history<F>(fs: &mut F, path: &str) -> ErrlogResult<Vec<PersistedRecord>>
where
    F: FileSystem + ?Sized,
{
    read_history_chunked(fs, path, READ_CHUNK)
}

/// [`read_history`] with an explicit read size.
pub fn read_history_chunked<F>(
    fs: &mut F,
    path: &str,
    chunk: usize,
) -> ErrlogResult<Vec<PersistedRecord>>
where
    F: FileSystem + ?Sized,
{
    let bytes = read_file(fs, path, chunk.max(1)).map_err(|e| {
        kerror!("reading error history from {} failed: {}", path, e);
        ErrlogError::FailedOperation
    })?;
    let text = String::from_utf8(bytes).map_err(|_| {
        kwarn!("error history {} is not UTF-8", path);
        ErrlogError::InvalidFormat
    })?;
    parse_history(&text)
}

// ── Storage ──

fn ensure_mounted<F: FileSystem + ?Sized>(fs: &mut F) -> Result<(), StorageError> {
    if fs.is_mounted() {
        return Ok(());
    }
    if let Err(e) = fs.mount() {
        kwarn!("mount failed ({}), formatting", e);
        fs.format()?;
        fs.mount()?;
    }
    Ok(())
}

fn write_file<F: FileSystem + ?Sized>(fs: &mut F, path: &str, data: &[u8]) -> Result<(), StorageError> {
    ensure_mounted(fs)?;
    let handle = fs.open(path, OpenMode::Write)?;
    let written = write_all(fs, handle, data);
    let closed = fs.close(handle);
    written.and(closed)
}

fn write_all<F: FileSystem + ?Sized>(
    fs: &mut F,
    handle: FileHandle,
    mut data: &[u8],
) -> Result<(), StorageError> {
    while !data.is_empty() {
        let n = fs.write(handle, data)?;
        if n == 0 {
            return Err(StorageError::NoSpace {
                needed: data.len(),
                free: 0,
            });
        }
        data = &data[n..];
    }
    Ok(())
}

fn read_file<F: FileSystem + ?Sized>(fs: &mut F, path: &str, chunk: usize) -> Result<Vec<u8>, StorageError> {
    if !fs.is_mounted() {
        fs.mount()?;
    }
    let handle = fs.open(path, OpenMode::Read)?;
    let mut out = Vec::new();
    let mut buf = vec![0u8; chunk];
    let result = loop {
        match fs.read(handle, &mut buf) {
            Ok(0) => break Ok(()),
            Ok(n) => out.extend_from_slice(&buf[..n]),
            Err(e) => break Err(e),
        }
    };
    let closed = fs.close(handle);
    result.and(closed)?;
    Ok(out)
}

// ── Encoding ──

fn encode_record(out: &mut String, r: &ErrorRecord) {
    let _ = write!(
        out,
        "seq={} status=0x{:08x} value={:#x} thread={:#x} loc=",
        r.sequence,
        r.status.raw(),
        r.value,
        r.thread_id
    );
    match r.location {
        Some(loc) => {
            let _ = write!(out, "{}:{}", loc.file(), loc.line());
        }
        None => out.push('-'),
    }
    out.push_str(" msg=");
    escape_into(out, r.message);
    out.push('\n');
}

fn escape_into(out: &mut String, msg: &str) {
    for c in msg.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
}

fn unescape(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '\\' => out.push('\\'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            _ => return None,
        }
    }
    Some(out)
}

// ── Decoding ──

fn parse_history(text: &str) -> ErrlogResult<Vec<PersistedRecord>> {
    let mut lines = text.lines();
    let expected: usize = lines
        .next()
        .and_then(|h| h.strip_prefix(HEADER_PREFIX))
        .and_then(|n| n.parse().ok())
        .ok_or(ErrlogError::InvalidFormat)?;

    let records = lines
        .filter(|l| !l.is_empty())
        .map(|l| parse_record(l).ok_or(ErrlogError::InvalidFormat))
        .collect::<ErrlogResult<Vec<_>>>()?;

    if records.len() != expected {
        kwarn!("error history holds {} records, header says {}", records.len(), expected);
        return Err(ErrlogError::InvalidFormat);
    }
    Ok(records)
}

fn parse_record(line: &str) -> Option<PersistedRecord> {
    let mut fields = line.splitn(5, ' ');
    let sequence = fields.next()?.strip_prefix("seq=")?.parse().ok()?;
    let status = parse_hex(fields.next()?.strip_prefix("status=")?)?;
    let value = parse_hex(fields.next()?.strip_prefix("value=")?)?;
    let thread_id = parse_hex(fields.next()?.strip_prefix("thread=")?)?;

    let (loc, msg) = fields.next()?.strip_prefix("loc=")?.split_once(" msg=")?;
    let location = match loc {
        "-" => None,
        loc => {
            let (file, line) = loc.rsplit_once(':')?;
            Some((file.to_string(), line.parse().ok()?))
        }
    };

    Some(PersistedRecord {
        sequence,
        status: Status::from_raw(u32::try_from(status).ok()?),
        value: usize::try_from(value).ok()?,
        thread_id,
        location,
        message: unescape(msg)?,
    })
}

fn parse_hex(s: &str) -> Option<u64> {
    u64::from_str_radix(s.strip_prefix("0x")?, 16).ok()
}
