//! Configuration for an extraction run.
//!
//! This module provides a plain configuration struct for library usage,
//! without any CLI framework dependencies.
//!
//! # Example
//!
//! ```rust
//! use smsxtract::config::ExtractConfig;
//! use std::path::Path;
//!
//! let config = ExtractConfig::new().with_subdirs(true);
//!
//! let root = config.output_root(Path::new("sms.xml"));
//! assert_eq!(root, Path::new("sms.xml.d"));
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Settings shared by every file in one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Write attachments into one subdirectory per contact (default: false)
    pub subdirs: bool,

    /// Suffix appended to the input path to form the output root (default: `.d`)
    pub output_suffix: String,

    /// Transcript directory name inside the output root (default: `messages`)
    pub messages_dir: String,

    /// Attachment directory name inside the output root (default: `files`)
    pub files_dir: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            subdirs: false,
            output_suffix: ".d".to_string(),
            messages_dir: "messages".to_string(),
            files_dir: "files".to_string(),
        }
    }
}

impl ExtractConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables per-contact attachment subdirectories.
    #[must_use]
    pub fn with_subdirs(mut self, enabled: bool) -> Self {
        self.subdirs = enabled;
        self
    }

    /// Sets the suffix used to derive the output root from the input path.
    #[must_use]
    pub fn with_output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    /// Sets the transcript directory name.
    #[must_use]
    pub fn with_messages_dir(mut self, name: impl Into<String>) -> Self {
        self.messages_dir = name.into();
        self
    }

    /// Sets the attachment directory name.
    #[must_use]
    pub fn with_files_dir(mut self, name: impl Into<String>) -> Self {
        self.files_dir = name.into();
        self
    }

    /// Output root for `input`: the input path with the suffix appended.
    pub fn output_root(&self, input: &Path) -> PathBuf {
        let mut root = OsString::from(input.as_os_str());
        root.push(&self.output_suffix);
        PathBuf::from(root)
    }
}
