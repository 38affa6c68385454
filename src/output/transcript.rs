//! Per-contact text transcripts.
//!
//! Each message becomes one block:
//!
//! ```text
//! ================================================================================
//! Sent on Jan 1, 2015 12:00:00 AM
//! --------------------------------------------------------------------------------
//! hi
//!
//! [Image:  img_001.jpg]
//!
//! ```
//!
//! The `[Image: ...]` line only appears for attachments. Every block ends
//! with a blank line, so text blocks close with `body\n\n\n`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::Message;
use crate::error::Result;
use crate::store::{Contact, ContactGroup, MessageStore};

use super::contact_stem;

const RULE_WIDTH: usize = 80;

/// What [`write_transcripts`] wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranscriptReport {
    /// Transcript files created or overwritten
    pub files: usize,
    /// Message blocks written across all files
    pub messages: usize,
}

/// Renders one message block.
pub fn render_message(message: &Message) -> String {
    let mut block = String::new();

    block.push_str(&"=".repeat(RULE_WIDTH));
    block.push('\n');
    block.push_str(message.direction.label());
    block.push_str(&message.display_date);
    block.push('\n');
    block.push_str(&"-".repeat(RULE_WIDTH));
    block.push('\n');

    block.push_str(&message.body);
    block.push_str("\n\n");

    if let Some(name) = message.payload_name() {
        block.push_str(&format!("[Image:  {name}]\n"));
    }
    block.push('\n');

    block
}

/// Renders a whole contact transcript.
pub fn render_transcript(group: &ContactGroup<'_>) -> String {
    group.messages.iter().map(|m| render_message(m)).collect()
}

/// File name of a contact's transcript: `<address>_<name>.txt`.
pub fn transcript_file_name(contact: &Contact) -> String {
    format!("{}.txt", contact_stem(contact))
}

/// Writes one transcript per contact into `dir`.
///
/// Contacts without messages get no file. Existing files are overwritten.
pub fn write_transcripts(store: &MessageStore, dir: &Path) -> Result<TranscriptReport> {
    let mut report = TranscriptReport::default();

    for group in store.groups() {
        if group.is_empty() {
            continue;
        }

        let path = dir.join(transcript_file_name(&group.contact));
        let mut writer = BufWriter::new(File::create(&path)?);

        for message in &group.messages {
            writer.write_all(render_message(message).as_bytes())?;
        }
        writer.flush()?;

        report.files += 1;
        report.messages += group.len();
    }

    Ok(report)
}
