//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::Parser;

use crate::config::ExtractConfig;

/// Extract conversations and attachments from SMS Backup & Restore XML
/// exports.
///
/// Each FILE is extracted into FILE.d/ with a messages/ directory holding
/// one transcript per contact and a files/ directory holding the decoded
/// pictures and videos.
#[derive(Parser, Debug, Clone)]
#[command(name = "smsxtract")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    smsxtract sms-20150914.xml
    smsxtract --subdirs sms-2015*.xml
    RUST_LOG=debug smsxtract sms.xml")]
pub struct Args {
    /// Export files to extract
    #[arg(required = true, num_args = 1.., value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Put attachments into one subdirectory per contact
    #[arg(short, long)]
    pub subdirs: bool,

    /// Print one JSON summary per file instead of the text summary
    #[arg(long)]
    pub json: bool,

    /// Log what is being parsed and written
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Builds the extraction settings selected on the command line.
    pub fn to_config(&self) -> ExtractConfig {
        ExtractConfig::new().with_subdirs(self.subdirs)
    }

    /// Default log filter: `debug` with `--verbose`, `warn` otherwise.
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }
}
