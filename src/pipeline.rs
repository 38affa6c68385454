//! Extraction pipeline for one export file.
//!
//! [`Extractor::extract_file`] runs the whole job:
//!
//! 1. create `<file>.d/` with `messages/` and `files/`
//! 2. parse the export into a [`MessageStore`]
//! 3. write transcripts, then attachments
//! 4. report an [`ExtractionSummary`]
//!
//! # Example
//!
//! ```rust,no_run
//! use smsxtract::config::ExtractConfig;
//! use smsxtract::pipeline::Extractor;
//!
//! let extractor = Extractor::new(ExtractConfig::new().with_subdirs(true));
//! let summary = extractor.extract_file("sms-20150914.xml".as_ref())?;
//! println!("{summary}");
//! # Ok::<(), smsxtract::ExtractError>(())
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;

use crate::config::ExtractConfig;
use crate::error::{ExtractError, Result};
use crate::output::{self, write_attachments, write_transcripts};
use crate::parser::RecordParser;
use crate::store::MessageStore;

/// Output directories for one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub messages: PathBuf,
    pub files: PathBuf,
}

impl OutputLayout {
    /// Derives the layout for `input`.
    pub fn for_input(input: &Path, config: &ExtractConfig) -> Self {
        let root = config.output_root(input);
        Self {
            messages: root.join(&config.messages_dir),
            files: root.join(&config.files_dir),
            root,
        }
    }

    /// Creates the root and both subdirectories.
    ///
    /// Fails with [`ExtractError::DirectoryExists`] if the root is already
    /// there; nothing is touched in that case. If a subdirectory cannot be
    /// created the fresh root is removed again.
    pub fn prepare(&self) -> Result<()> {
        if self.root.exists() {
            return Err(ExtractError::directory_exists(&self.root));
        }
        output::create_dir(&self.root)?;

        let subdirs =
            output::create_dir(&self.messages).and_then(|()| output::create_dir(&self.files));
        if let Err(err) = subdirs {
            self.discard();
            return Err(err);
        }
        Ok(())
    }

    /// Removes the whole output tree, logging if that fails.
    fn discard(&self) {
        if let Err(err) = fs::remove_dir_all(&self.root) {
            warn!("Could not remove {}: {}", self.root.display(), err);
        }
    }
}

/// Counts reported after a file has been extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub text_messages: usize,
    pub attachments: usize,
    pub total: usize,
    pub contacts: usize,
    pub transcripts: usize,
    pub skipped_records: usize,
    pub overwritten_attachments: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_message: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<DateTime<Utc>>,
}

impl fmt::Display for ExtractionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:  {} SMS and {} MMS (total:  {})",
            self.input.display(),
            self.text_messages,
            self.attachments,
            self.total
        )
    }
}

/// Runs the extraction pipeline with one configuration.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractConfig,
    parser: RecordParser,
}

impl Extractor {
    /// Creates an extractor.
    pub fn new(config: ExtractConfig) -> Self {
        Self {
            config,
            parser: RecordParser::new(),
        }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Reads and parses `input` into a fresh store.
    ///
    /// Returns the store and the number of skipped attachment records.
    pub fn load(&self, input: &Path) -> Result<(MessageStore, usize)> {
        let bytes = fs::read(input)?;
        let content = String::from_utf8_lossy(&bytes);

        let mut store = MessageStore::new();
        let mut records = self.parser.records(content.lines());
        for record in records.by_ref() {
            store.push(record?);
        }

        debug!(
            "{}: scanned {} lines, {} records",
            input.display(),
            records.lines_scanned(),
            store.len()
        );
        Ok((store, records.skipped()))
    }

    /// Extracts one export file.
    ///
    /// Output written before a failure is kept, except when parsing fails:
    /// then nothing but empty directories exists and the tree is removed.
    pub fn extract_file(&self, input: &Path) -> Result<ExtractionSummary> {
        if input.is_dir() {
            return Err(ExtractError::invalid_input(input, "is a directory"));
        }
        if !input.exists() {
            return Err(ExtractError::invalid_input(input, "no such file"));
        }

        let start = Instant::now();
        let layout = OutputLayout::for_input(input, &self.config);
        layout.prepare()?;
        info!("Extracting content from '{}'", input.display());

        let (store, skipped) = match self.load(input) {
            Ok(loaded) => loaded,
            Err(err) => {
                layout.discard();
                return Err(err);
            }
        };

        // Attachment-free runs never leave a files area, even if writing
        // transcripts fails below.
        if !store.has_attachments() {
            fs::remove_dir(&layout.files)?;
        }

        let transcripts = write_transcripts(&store, &layout.messages)?;
        let attachments = write_attachments(&store, &layout.files, self.config.subdirs)?;

        let (first_message, last_message) = store
            .time_span()
            .map(|(first, last)| (first.datetime(), last.datetime()))
            .unwrap_or_default();

        debug!(
            "{}: done in {:.2}s",
            input.display(),
            start.elapsed().as_secs_f64()
        );

        Ok(ExtractionSummary {
            input: input.to_path_buf(),
            output: layout.root,
            text_messages: store.text_count(),
            attachments: store.attachment_count(),
            total: store.len(),
            contacts: store.contacts().len(),
            transcripts: transcripts.files,
            skipped_records: skipped,
            overwritten_attachments: attachments.overwritten,
            first_message,
            last_message,
        })
    }
}
