//! Record parser for SMS Backup & Restore XML exports.
//!
//! The export is treated as a sequence of lines, not as markup. Two record
//! shapes are recognized:
//!
//! - **Text**: one `<sms protocol=... />` line carrying every field.
//! - **Attachment**: a `<part ct="image/jpeg" data="..."/>` line (or png,
//!   gif, 3gpp video). Its metadata sits three lines earlier on the
//!   enclosing `<mms ...>` line, the source file name (if any) on the line
//!   right before it, and the caption (if any) on the line right after it.
//!
//! ```text
//! i-3  <mms date="..." address="..." m_size="..." contact_name="..." ...>
//! i-2    <parts>
//! i-1      <part ct="application/smil" text="... img src="photo.png" ..." />
//! i        <part ct="image/png" data="iVBORw0..." />
//! i+1      <part ct="text/plain" text="caption" />
//! ```
//!
//! [`Records`] walks the lines through a bounded window (three lines back,
//! one ahead), so memory stays constant no matter how the lines arrive.
//!
//! # Example
//!
//! ```rust
//! use smsxtract::parser::RecordParser;
//!
//! let export = r#"<sms protocol="0" address="+15551234567" date="1000" readable_date="Jan 1, 2015" body="hi" toa="null" type="2" name="Bob" />"#;
//!
//! let messages = RecordParser::new().parse_str(export)?;
//! assert_eq!(messages.len(), 1);
//! assert_eq!(messages[0].address, "5551234567");
//! assert_eq!(messages[0].body, "hi");
//! # Ok::<(), smsxtract::ExtractError>(())
//! ```

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{debug, warn};

use crate::Message;
use crate::error::{ExtractError, Result};
use crate::message::Direction;
use crate::parsing::{attribute, attribute_until, between, normalize_address, unescape};

/// Line-level marker of a text record.
const SMS_MARKER: &str = "<sms protocol";

/// MIME markers of attachment records.
const MEDIA_MARKERS: &[&str] = &["image/jpeg", "image/png", "image/gif", "video/3gpp"];

/// Text bodies end where the `toa` attribute begins.
const BODY_END: &str = "\" toa=";

/// Metadata line offset before the payload line.
const LOOKBACK: usize = 3;
/// Caption line offset after the payload line.
const LOOKAHEAD: usize = 1;
const WINDOW: usize = LOOKBACK + 1 + LOOKAHEAD;

/// Parser for SMS Backup & Restore exports.
///
/// The parser itself is stateless; every call to [`records`](Self::records)
/// starts fresh counters for synthesized file names.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordParser;

impl RecordParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Returns the human-readable name of this parser.
    pub fn name(&self) -> &'static str {
        "SMS Backup & Restore"
    }

    /// Returns a lazy iterator of records over `lines`.
    pub fn records<I>(&self, lines: I) -> Records<I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Records::new(lines.into_iter())
    }

    /// Parses an export held in memory.
    pub fn parse_str(&self, content: &str) -> Result<Vec<Message>> {
        self.records(content.lines()).collect()
    }

    /// Reads and parses an export file. Invalid UTF-8 is replaced lossily.
    pub fn parse(&self, path: &Path) -> Result<Vec<Message>> {
        let bytes = fs::read(path)?;
        self.parse_str(&String::from_utf8_lossy(&bytes))
    }
}

/// Per-run counters for synthesized attachment names.
#[derive(Debug, Default)]
struct NameCounters {
    images: usize,
    videos: usize,
}

impl NameCounters {
    fn next_name(&mut self, extension: &str) -> String {
        if is_video(extension) {
            self.videos += 1;
            format!("vid_{:03}.{extension}", self.videos)
        } else {
            self.images += 1;
            format!("img_{:03}.{extension}", self.images)
        }
    }
}

/// Iterator over the records of one export.
///
/// Yields messages in file order. The first error ends the iteration.
pub struct Records<I>
where
    I: Iterator,
{
    lines: I,
    window: VecDeque<I::Item>,
    /// Lines pulled from `lines` so far.
    loaded: usize,
    /// Index of the next line to scan.
    cursor: usize,
    exhausted: bool,
    failed: bool,
    queued: VecDeque<Message>,
    counters: NameCounters,
    skipped: usize,
}

impl<I> Records<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    fn new(lines: I) -> Self {
        Self {
            lines,
            window: VecDeque::with_capacity(WINDOW + 1),
            loaded: 0,
            cursor: 0,
            exhausted: false,
            failed: false,
            queued: VecDeque::new(),
            counters: NameCounters::default(),
            skipped: 0,
        }
    }

    /// Attachment records dropped because their context lines were missing.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of lines scanned so far.
    pub fn lines_scanned(&self) -> usize {
        self.cursor
    }

    /// Loads lines until the one after the cursor is available.
    fn fill(&mut self) {
        while !self.exhausted && self.loaded <= self.cursor + LOOKAHEAD {
            match self.lines.next() {
                Some(line) => {
                    self.window.push_back(line);
                    self.loaded += 1;
                    if self.window.len() > WINDOW {
                        self.window.pop_front();
                    }
                }
                None => self.exhausted = true,
            }
        }
    }

    /// Scans line `index`, queuing every record it completes.
    fn scan(&mut self, index: usize) -> Result<()> {
        let base = self.loaded - self.window.len();
        let window = &self.window;

        let Some(line) = window_line(window, base, index) else {
            return Ok(());
        };

        if line.contains(SMS_MARKER) {
            self.queued.push_back(parse_text(line, index));
        }

        let Some(marker) = MEDIA_MARKERS.iter().find(|m| line.contains(**m)) else {
            return Ok(());
        };

        let meta = index
            .checked_sub(LOOKBACK)
            .and_then(|i| window_line(window, base, i));
        let next = window_line(window, base, index + LOOKAHEAD);

        let (Some(meta), Some(next)) = (meta, next) else {
            warn!(
                "Skipping attachment on line {}: metadata or caption line out of range",
                index + 1
            );
            self.skipped += 1;
            return Ok(());
        };
        let prev = window_line(window, base, index - 1).unwrap_or_default();

        let parts = AttachmentLines {
            meta,
            prev,
            payload: line,
            next,
        };
        let message = parse_attachment(&parts, marker, index, &mut self.counters)?;
        self.queued.push_back(message);
        Ok(())
    }
}

impl<I> Iterator for Records<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Result<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(message) = self.queued.pop_front() {
            return Some(Ok(message));
        }
        if self.failed {
            return None;
        }

        loop {
            self.fill();
            if self.cursor >= self.loaded {
                return None;
            }

            let index = self.cursor;
            self.cursor += 1;

            if let Err(err) = self.scan(index) {
                self.failed = true;
                self.queued.clear();
                return Some(Err(err));
            }
            if let Some(message) = self.queued.pop_front() {
                return Some(Ok(message));
            }
        }
    }
}

fn window_line<T: AsRef<str>>(window: &VecDeque<T>, base: usize, index: usize) -> Option<&str> {
    index
        .checked_sub(base)
        .and_then(|offset| window.get(offset))
        .map(|line| line.as_ref())
}

/// The four lines an attachment record is assembled from.
struct AttachmentLines<'a> {
    meta: &'a str,
    prev: &'a str,
    payload: &'a str,
    next: &'a str,
}

fn parse_text(line: &str, index: usize) -> Message {
    let name = match attribute(line, "name") {
        "" => attribute(line, "contact_name"),
        name => name,
    };

    Message::text(
        normalize_address(attribute(line, "address")),
        Direction::from_code(attribute(line, "type")),
        parse_timestamp(attribute(line, "date"), index),
        unescape(attribute(line, "readable_date")),
        unescape(name),
        unescape(attribute_until(line, "body", BODY_END)),
    )
}

fn parse_attachment(
    lines: &AttachmentLines<'_>,
    marker: &str,
    index: usize,
    counters: &mut NameCounters,
) -> Result<Message> {
    let mime = match attribute(lines.payload, "ct") {
        "" => marker,
        ct => ct,
    };
    let extension = normalize_extension(mime.split_once('/').map_or("", |(_, sub)| sub));

    let meta = lines.meta;
    let direction = if attribute(meta, "m_size") == "null" {
        Direction::Outgoing
    } else {
        Direction::Incoming
    };

    let payload_name = match source_name(lines.prev, extension) {
        Some(name) => name,
        None => counters.next_name(extension),
    };

    let body = if lines.next.contains("text=\"") {
        unescape(between(lines.next, "text=\"", "\"")).into_owned()
    } else {
        String::new()
    };

    let payload = decode_payload(attribute(lines.payload, "data"), index)?;
    debug!(
        "Line {}: {} attachment '{}' ({} bytes)",
        index + 1,
        mime,
        payload_name,
        payload.len()
    );

    Ok(Message::attachment(
        normalize_address(attribute(meta, "address")),
        direction,
        parse_timestamp(attribute(meta, "date"), index - LOOKBACK),
        unescape(attribute(meta, "readable_date")),
        unescape(attribute(meta, "contact_name")),
        body,
        payload,
        payload_name,
    ))
}

/// Maps a MIME subtype onto a file extension.
///
/// ```
/// use smsxtract::parser::normalize_extension;
///
/// assert_eq!(normalize_extension("jpeg"), "jpg");
/// assert_eq!(normalize_extension("3gpp"), "3gp");
/// assert_eq!(normalize_extension("png"), "png");
/// ```
pub fn normalize_extension(subtype: &str) -> &str {
    match subtype {
        "jpeg" => "jpg",
        "3gpp" => "3gp",
        other => other,
    }
}

fn is_video(extension: &str) -> bool {
    extension == "3gp"
}

/// Explicit file name from the line before the payload, if there is one.
///
/// Accepts both raw (`img src="a.jpg"`) and entity-escaped
/// (`img src=&quot;a.jpg&quot;`) forms. Only the last path component is
/// kept.
fn source_name(prev: &str, extension: &str) -> Option<String> {
    let tag = if is_video(extension) { "video src=" } else { "img src=" };

    let raw = match between(prev, &format!("{tag}\""), "\"") {
        "" => between(prev, &format!("{tag}&quot;"), "&quot;"),
        raw => raw,
    };

    let name = unescape(raw);
    let file = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    match file {
        "" | "." | ".." => None,
        file => Some(file.to_string()),
    }
}

fn decode_payload(data: &str, index: usize) -> Result<Vec<u8>> {
    let decoded = if data.contains(|c: char| c.is_ascii_whitespace()) {
        let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        BASE64.decode(compact)
    } else {
        BASE64.decode(data)
    };
    decoded.map_err(|source| ExtractError::malformed_payload(index + 1, source))
}

fn parse_timestamp(raw: &str, index: usize) -> i64 {
    raw.trim().parse().unwrap_or_else(|_| {
        warn!(
            "Line {}: unusable date '{}', sorting it first",
            index + 1,
            raw
        );
        0
    })
}
