//! Option-set and rewrite configuration.
//!
//! An [`OptionSetConfig`] bundles the registered long-option names with the
//! [`RewriteConfig`] that controls how candidate tokens are recognized. It can
//! be kept in a YAML (or JSON) file next to the tool that consumes it.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! options:
//!   - --alpha
//!   - --beta
//!   - --bellamy
//! rewrite:
//!   marker: "--"
//!   stop_at_separator: false
//!   split_assignment: false
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::{AbbreviationIndex, ArgumentRewriter, validate_options};

/// Marker that introduces a long option on the command line.
pub const LONG_OPTION_MARKER: &str = "--";

/// Current option-set file format version.
pub const CONFIG_VERSION: &str = "1.0";

/// Settings controlling which tokens the rewriter treats as candidates.
///
/// The defaults match plain prefix expansion: every token starting with
/// `--` is resolved as a whole, including a bare `--`.
///
/// # Examples
///
/// ```
/// use optabbrev_core::RewriteConfig;
///
/// let config = RewriteConfig::default();
/// assert_eq!(config.marker, "--");
/// assert!(!config.stop_at_separator);
/// assert!(!config.split_assignment);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Prefix that marks a token as a long-option candidate.
    pub marker: String,
    /// Treat a bare marker token as end-of-options; it and everything after
    /// it pass through unchanged.
    pub stop_at_separator: bool,
    /// Resolve only the part of `--name=value` before the first `=`.
    pub split_assignment: bool,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            marker: LONG_OPTION_MARKER.to_string(),
            stop_at_separator: false,
            split_assignment: false,
        }
    }
}

/// Registered option names plus rewrite settings.
///
/// # Examples
///
/// ```
/// use optabbrev_core::OptionSetConfig;
///
/// let config = OptionSetConfig::from_yaml_str(
///     "version: \"1.0\"\noptions: [--alpha, --beta]\n",
/// ).unwrap();
/// let index = config.build_index();
/// let rewritten = config.rewriter(&index).rewrite(&["--al", "1"]).unwrap();
/// assert_eq!(rewritten, vec!["--alpha", "1"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSetConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Registered full long-option names.
    #[serde(default)]
    pub options: Vec<String>,
    /// Candidate recognition settings.
    #[serde(default)]
    pub rewrite: RewriteConfig,
}

impl OptionSetConfig {
    /// Creates a config for `options` with default rewrite settings.
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            version: CONFIG_VERSION.to_string(),
            options: options.into_iter().map(Into::into).collect(),
            rewrite: RewriteConfig::default(),
        }
    }

    /// Loads configuration from a file.
    ///
    /// Files ending in `.json` are read as JSON, anything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](ConfigError::Io) if the file cannot be read, or
    /// [`Yaml`](ConfigError::Yaml) / [`Json`](ConfigError::Json) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_reader(reader)?,
            _ => serde_yaml::from_reader(reader)?,
        };
        Ok(config)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`Yaml`](ConfigError::Yaml) if parsing fails.
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](ConfigError::Io) if the file cannot be written, or
    /// [`Yaml`](ConfigError::Yaml) if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Checks the marker and the registered option list.
    ///
    /// # Errors
    ///
    /// Returns [`Invalid`](ConfigError::Invalid) for an empty marker and
    /// [`InvalidOption`](ConfigError::InvalidOption) for the first bad option.
    pub fn validate(&self) -> Result<()> {
        if self.rewrite.marker.is_empty() {
            return Err(ConfigError::Invalid(
                "rewrite marker cannot be empty".to_string(),
            ));
        }
        match validate_options(self.options.as_slice(), &self.rewrite.marker)
            .into_iter()
            .next()
        {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Builds a fresh index from the registered options.
    pub fn build_index(&self) -> AbbreviationIndex {
        AbbreviationIndex::build(&self.options)
    }

    /// Returns a rewriter over `index` using these rewrite settings.
    pub fn rewriter<'a>(&self, index: &'a AbbreviationIndex) -> ArgumentRewriter<'a> {
        ArgumentRewriter::with_config(index, self.rewrite.clone())
    }
}
