//! Output writers.
//!
//! This module turns a filled [`MessageStore`](crate::store::MessageStore)
//! into files:
//! - [`write_transcripts`] - one text transcript per contact
//! - [`write_attachments`] - decoded attachment payloads
//!
//! # Layout
//!
//! ```text
//! backup.xml.d/
//! ├── messages/
//! │   ├── 5551234567_Bob.txt
//! │   └── 5559876543_Alice.txt
//! └── files/                     (only when attachments exist)
//!     ├── img_001.jpg
//!     └── 5551234567_Bob/        (with --subdirs)
//!         └── photo.png
//! ```

mod attachments;
mod transcript;

pub use attachments::{AttachmentReport, write_attachments};
pub use transcript::{
    TranscriptReport, render_message, render_transcript, transcript_file_name, write_transcripts,
};

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{ExtractError, Result};
use crate::store::Contact;

/// Makes a value safe to use as one path component.
///
/// ```
/// use smsxtract::output::path_component;
///
/// assert_eq!(path_component("AC/DC"), "AC_DC");
/// assert_eq!(path_component("Bob"), "Bob");
/// ```
pub fn path_component(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}

/// `<address>_<name>`, the stem shared by transcripts and attachment
/// subdirectories.
pub fn contact_stem(contact: &Contact) -> String {
    format!(
        "{}_{}",
        path_component(&contact.address),
        path_component(&contact.name)
    )
}

/// Creates one directory, reporting permission problems distinctly.
pub(crate) fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir(path).map_err(|err| match err.kind() {
        io::ErrorKind::PermissionDenied => ExtractError::permission_denied(path, err),
        _ => ExtractError::Io(err),
    })
}
