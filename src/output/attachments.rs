//! Attachment payload writer.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::Result;
use crate::store::MessageStore;

use super::{contact_stem, create_dir};

/// What [`write_attachments`] wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachmentReport {
    /// Payload files written
    pub written: usize,
    /// Writes that replaced a payload written earlier in the same run
    pub overwritten: usize,
    /// Per-contact subdirectories created
    pub directories: usize,
}

/// Writes every attachment payload below `files_dir`.
///
/// Without attachments `files_dir` is removed (it must be empty) and
/// nothing is written. With `subdirs`, payloads go into
/// `files_dir/<address>_<name>/`, created on demand.
///
/// Payloads sharing a name in the same directory overwrite each other; the
/// later one wins and the overwrite is logged.
pub fn write_attachments(
    store: &MessageStore,
    files_dir: &Path,
    subdirs: bool,
) -> Result<AttachmentReport> {
    let mut report = AttachmentReport::default();

    if !store.has_attachments() {
        if files_dir.is_dir() {
            fs::remove_dir(files_dir)?;
        }
        return Ok(report);
    }

    if !files_dir.is_dir() {
        create_dir(files_dir)?;
    }

    let stems: HashMap<String, String> = store
        .contacts()
        .into_iter()
        .map(|contact| {
            let stem = contact_stem(&contact);
            (contact.address, stem)
        })
        .collect();

    let mut written: HashSet<PathBuf> = HashSet::new();

    for message in store.ordered() {
        let (Some(payload), Some(name)) = (message.payload(), message.payload_name()) else {
            continue;
        };

        let dir = match stems.get(&message.address) {
            Some(stem) if subdirs => {
                let dir = files_dir.join(stem);
                if !dir.is_dir() {
                    create_dir(&dir)?;
                    report.directories += 1;
                }
                dir
            }
            _ => files_dir.to_path_buf(),
        };

        let path = dir.join(name);
        if !written.insert(path.clone()) {
            warn!("Overwriting attachment {}", path.display());
            report.overwritten += 1;
        }

        fs::write(&path, payload)?;
        debug!("Wrote {} ({} bytes)", path.display(), payload.len());
        report.written += 1;
    }

    Ok(report)
}
