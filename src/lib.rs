/*!
 * cbp - Generate XML representation of a project's source files for LLM context
 *
 * This library collects the source files of a project into a single
 * structured XML document for use as context for Large Language Models.
 */

pub mod config;
pub mod error;
pub mod filter;
pub mod report;
pub mod scanner;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use config::{Args, Config};
pub use error::{CbpError, Result};
pub use filter::FilterConfig;
pub use report::{FileReportInfo, ReportFormat, Reporter, ScanReport};
pub use scanner::{Scanner, Walk};
pub use types::FileEntry;
pub use utils::{format_file_size, portable_path, sanitize_xml_text};
pub use writer::{WriteStats, XmlWriter};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
