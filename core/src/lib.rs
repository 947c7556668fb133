//! Prefix-abbreviation resolution for long command-line options.
//!
//! This crate expands abbreviated long options (`--bel`) to the registered
//! option they unambiguously identify (`--bellamy`) before an argument vector
//! is handed to an option parser, and rejects tokens that are unknown or too
//! short to decide:
//!
//! - [`AbbreviationIndex`] — immutable prefix table built from the registered
//!   option names.
//! - [`ArgumentRewriter`] — scans an argument vector and expands every
//!   long-option candidate, failing with a [`RejectionError`].
//! - [`OptionSetConfig`] / [`RewriteConfig`] — YAML/JSON configuration for
//!   option sets and candidate recognition.
//!
//! Validation ([`validate_options`]) catches option names the rewriter could
//! never reach and duplicated declarations.
//!
//! # Example
//!
//! ```
//! use optabbrev_core::*;
//!
//! let index = AbbreviationIndex::build(["--alpha", "--beta", "--bellamy"]);
//! let rewriter = ArgumentRewriter::new(&index);
//!
//! assert_eq!(
//!     rewriter.rewrite(&["--bet", "bs", "--a", "14"]).unwrap(),
//!     vec!["--beta", "bs", "--alpha", "14"],
//! );
//! assert_eq!(
//!     rewriter.rewrite(&["--noSuchParam"]).unwrap_err(),
//!     RejectionError::UnknownOption("--noSuchParam".into()),
//! );
//! ```

mod config;
mod error;
mod index;
mod rewrite;
mod validate;

pub use config::{CONFIG_VERSION, LONG_OPTION_MARKER, OptionSetConfig, RewriteConfig};
pub use error::{ConfigError, Result};
pub use index::{AbbreviationIndex, PrefixEntry, Resolution};
pub use rewrite::{ArgumentRewriter, Expansion, RejectionError, RewriteReport, expand_abbreviations};
pub use validate::{ValidationError, validate_options};
