//! # smsxtract
//!
//! Extracts conversations and attachments from SMS Backup & Restore XML
//! exports.
//!
//! For every export `backup.xml` the extractor creates `backup.xml.d/` with:
//! - `messages/` - one plain-text transcript per contact
//! - `files/` - every decoded picture and video (removed when there are none)
//!
//! The export is read line by line with fixed string markers instead of an
//! XML parser, so files that are not well-formed XML still extract.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smsxtract::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let extractor = Extractor::new(ExtractConfig::new().with_subdirs(true));
//!     let summary = extractor.extract_file("sms-20150914.xml".as_ref())?;
//!
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```
//!
//! ## Parsing Only
//!
//! ```rust
//! use smsxtract::parser::RecordParser;
//! use smsxtract::store::MessageStore;
//!
//! let export = r#"<sms protocol="0" address="5551234567" date="1" body="hi" toa="null" type="1" name="Bob" />"#;
//!
//! let store: MessageStore = RecordParser::new().parse_str(export)?.into_iter().collect();
//! assert_eq!(store.contacts()[0].name, "Bob");
//! # Ok::<(), smsxtract::ExtractError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] - line-window record parser ([`RecordParser`](parser::RecordParser))
//! - [`parsing`] - attribute extraction and address normalization helpers
//! - [`store`] - [`MessageStore`](store::MessageStore), ordering and contacts
//! - [`output`] - transcript and attachment writers
//! - [`pipeline`] - [`Extractor`](pipeline::Extractor), one file end to end
//! - [`config`] - [`ExtractConfig`](config::ExtractConfig)
//! - [`error`] - [`ExtractError`], [`Result`]
//! - [`cli`] - command-line arguments (feature `cli`)

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod message;
pub mod output;
pub mod parser;
pub mod parsing;
pub mod pipeline;
pub mod store;

pub use error::{ExtractError, Result};
pub use message::Message;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use smsxtract::prelude::*;
/// ```
pub mod prelude {
    pub use crate::Message;
    pub use crate::config::ExtractConfig;
    pub use crate::error::{ExtractError, Result};
    pub use crate::message::{Direction, MessageKind};
    pub use crate::output::{write_attachments, write_transcripts};
    pub use crate::parser::RecordParser;
    pub use crate::pipeline::{ExtractionSummary, Extractor};
    pub use crate::store::{Contact, MessageStore};
}
