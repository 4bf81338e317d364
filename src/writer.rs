/*!
 * XML document builder for cbp
 */

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::config::Config;
use crate::error::{CbpError, Result};
use crate::report::FileReportInfo;
use crate::types::FileEntry;
use crate::utils::{portable_path, sanitize_xml_text};

/// Statistics collected while building the document
#[derive(Debug, Clone, Default)]
pub struct WriteStats {
    /// Number of files whose content made it into the document
    pub files_written: usize,
    /// Number of files skipped because they could not be read as UTF-8
    pub files_skipped: usize,
    /// Total number of lines across written files
    pub total_lines: usize,
    /// Total number of characters across written files
    pub total_chars: usize,
    /// Per-file details keyed by relative path
    pub file_details: HashMap<String, FileReportInfo>,
}

/// Builds the XML document for a project and persists it atomically
pub struct XmlWriter {
    /// Writer configuration
    config: Config,
    /// Progress reporting
    progress: ProgressBar,
}

impl XmlWriter {
    /// Create a new XML writer
    pub fn new(config: Config, progress: ProgressBar) -> Self {
        Self { config, progress }
    }

    /// Build the document for `entries` and write it to the configured
    /// output path.
    ///
    /// The document is assembled in memory and lands on disk via a
    /// sibling temporary file and a rename, so the output path never
    /// holds a partial document.
    pub fn write(&self, entries: &[FileEntry]) -> Result<WriteStats> {
        let mut stats = WriteStats::default();
        let document = self.build_document(entries, &mut stats)?;

        let tmp_path = sibling_tmp_path(&self.config.output_file);
        fs::write(&tmp_path, &document)?;
        fs::rename(&tmp_path, &self.config.output_file)?;

        Ok(stats)
    }

    /// Assemble the complete document in memory
    fn build_document(&self, entries: &[FileEntry], stats: &mut WriteStats) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("project");
        let project_name = self.project_name();
        root.push_attribute(("name", project_name.as_str()));
        writer.write_event(Event::Start(root))?;

        for entry in entries {
            self.write_file(&mut writer, entry, stats)?;
        }

        writer.write_event(Event::End(BytesEnd::new("project")))?;

        Ok(writer.into_inner())
    }

    /// Write a single `<file>` element, skipping the entry with a
    /// diagnostic when its content cannot be read
    fn write_file<W: io::Write>(
        &self,
        writer: &mut Writer<W>,
        entry: &FileEntry,
        stats: &mut WriteStats,
    ) -> Result<()> {
        self.progress.inc(1);
        self.progress
            .set_message(format!("Current file: {}", display_name(entry)));

        let content = match read_content(&entry.absolute_path) {
            Ok(content) => content,
            Err(err) => {
                eprintln!("Warning: {}", err);
                stats.files_skipped += 1;
                return Ok(());
            }
        };

        let relative = sanitize_xml_text(&portable_path(&entry.relative_path)).into_owned();
        let lines = content.lines().count();
        let chars = content.chars().count();
        stats.files_written += 1;
        stats.total_lines += lines;
        stats.total_chars += chars;
        stats
            .file_details
            .insert(relative.clone(), FileReportInfo { lines, chars });

        let text = sanitize_xml_text(&content);
        let mut element = BytesStart::new("file");
        element.push_attribute(("path", relative.as_str()));

        if text.is_empty() {
            writer.write_event(Event::Empty(element))?;
        } else {
            writer.write_event(Event::Start(element))?;
            writer.write_event(Event::Text(BytesText::new(&text)))?;
            writer.write_event(Event::End(BytesEnd::new("file")))?;
        }

        Ok(())
    }

    /// Name for the root element, taken from the project directory
    fn project_name(&self) -> String {
        fs::canonicalize(&self.config.target_dir)
            .unwrap_or_else(|_| self.config.target_dir.clone())
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// Read a file as UTF-8 text
fn read_content(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| CbpError::FileRead {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Shortened file name for progress messages
fn display_name(entry: &FileEntry) -> String {
    let file_name = entry
        .absolute_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let chars: Vec<char> = file_name.chars().collect();
    if chars.len() > 40 {
        let tail: String = chars[chars.len() - 37..].iter().collect();
        format!("...{}", tail)
    } else {
        file_name
    }
}

/// Temporary path in the same directory as the output file, so the
/// final rename never crosses a filesystem boundary
fn sibling_tmp_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    output.with_file_name(name)
}
