/*!
 * Configuration handling for cbp
 *
 * Resolves the effective filter for a run: bundled defaults (an embedded
 * YAML asset), then an optional user config file, then CLI additions.
 * Merging is additive only; later layers never remove earlier entries.
 */

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::error::{CbpError, Result};
use crate::filter::FilterConfig;

/// Bundled default settings, compiled into the binary
const DEFAULT_CONFIG_YAML: &str = include_str!("../configs/default.yaml");

static DEFAULT_SETTINGS: Lazy<ConfigFile> = Lazy::new(|| {
    serde_yml::from_str(DEFAULT_CONFIG_YAML).expect("bundled default config must be valid YAML")
});

/// Command-line arguments for cbp
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "cbp",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate XML representation of a project's source files for LLM context",
    long_about = "Walks a project directory, filters files through configurable \
include/exclude rules, and writes a single XML document carrying every matching \
file's path and content, designed for providing context to Large Language Models."
)]
pub struct Args {
    /// Project directory to process
    pub project_dir: String,

    /// Output XML file name
    #[clap(short = 'o', long = "output", default_value = "project_sources.xml")]
    pub output_file: String,

    /// Path to a YAML config file merged over the bundled defaults
    #[clap(short = 'c', long = "config")]
    pub config_path: Option<String>,

    /// Comma-separated list of additional file extensions to include
    #[clap(short = 'a', long = "add-extensions", value_delimiter = ',')]
    pub add_extensions: Vec<String>,

    /// Comma-separated list of directory/file names or glob patterns to omit
    #[clap(long = "omit", value_delimiter = ',')]
    pub omit_patterns: Vec<String>,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Schema of a cbp config file
///
/// Two top-level lists; an optional nested `default_settings` section is
/// accepted for compatibility with older layouts and merges the same way.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Extensions (leading dot) and exact file names (bare) to include
    #[serde(default)]
    pub source_extensions: Vec<String>,

    /// Directory/file names or glob patterns to omit
    #[serde(default)]
    pub omit_dirs: Vec<String>,

    /// Optional nested settings section, merged additively
    #[serde(default)]
    pub default_settings: Option<Box<ConfigFile>>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Target directory to process
    pub target_dir: PathBuf,

    /// Output XML file path
    pub output_file: PathBuf,

    /// Optional user config file merged over the defaults
    pub config_path: Option<PathBuf>,

    /// Extra extensions supplied on the command line
    pub add_extensions: Vec<String>,

    /// Extra omit names/patterns supplied on the command line
    pub omit_patterns: Vec<String>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            target_dir: PathBuf::from(args.project_dir),
            output_file: PathBuf::from(args.output_file),
            config_path: args.config_path.map(PathBuf::from),
            add_extensions: args.add_extensions,
            omit_patterns: args.omit_patterns,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.target_dir.is_dir() {
            return Err(CbpError::InvalidRoot(self.target_dir.clone()));
        }

        // Check if output file directory exists and is writable
        if let Some(parent) = self.output_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(CbpError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("output directory not found: {}", parent.display()),
                )));
            }
        }

        Ok(())
    }

    /// Resolve the effective filter for this run.
    ///
    /// A configured-but-absent user config path falls back to the defaults
    /// silently; an unreadable or malformed file is a fatal [`CbpError::Config`].
    pub fn resolve_filter(&self) -> Result<FilterConfig> {
        let mut filter = FilterConfig::default();
        merge_config_file(&mut filter, &DEFAULT_SETTINGS);

        if let Some(path) = &self.config_path {
            if path.exists() {
                let text = fs::read_to_string(path).map_err(|e| {
                    CbpError::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                let user: ConfigFile = serde_yml::from_str(&text).map_err(|e| {
                    CbpError::Config(format!("cannot parse {}: {}", path.display(), e))
                })?;
                merge_config_file(&mut filter, &user);
            }
        }

        for ext in &self.add_extensions {
            filter.add_extension(ext);
        }
        for pattern in &self.omit_patterns {
            filter.add_omit(pattern);
        }

        Ok(filter)
    }
}

/// Union a config file's lists, and any nested section, into the filter
fn merge_config_file(filter: &mut FilterConfig, file: &ConfigFile) {
    for entry in &file.source_extensions {
        filter.add_source(entry);
    }
    for entry in &file.omit_dirs {
        filter.add_omit(entry);
    }
    if let Some(nested) = &file.default_settings {
        merge_config_file(filter, nested);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_bundled_defaults_parse() {
        let defaults = &*DEFAULT_SETTINGS;
        assert!(!defaults.source_extensions.is_empty());
        assert!(!defaults.omit_dirs.is_empty());
        assert!(defaults.omit_dirs.iter().any(|d| d == ".git"));
    }

    #[test]
    fn test_nested_default_settings_section_merges() {
        let yaml = r#"
default_settings:
  source_extensions:
    - .proto
  omit_dirs:
    - generated
"#;
        let file: ConfigFile = serde_yml::from_str(yaml).unwrap();
        let mut filter = FilterConfig::default();
        merge_config_file(&mut filter, &file);

        assert!(filter.should_include(Path::new("schema.proto")));
        assert!(!filter.should_descend(Path::new("/p/generated")));
    }

    #[test]
    fn test_top_level_and_nested_lists_union() {
        let yaml = r#"
source_extensions:
  - .proto
omit_dirs:
  - fixtures
default_settings:
  omit_dirs:
    - generated
"#;
        let file: ConfigFile = serde_yml::from_str(yaml).unwrap();
        let mut filter = FilterConfig::default();
        merge_config_file(&mut filter, &file);

        assert!(filter.should_include(Path::new("schema.proto")));
        assert!(!filter.should_descend(Path::new("/p/fixtures")));
        assert!(!filter.should_descend(Path::new("/p/generated")));
    }
}
