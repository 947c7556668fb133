//! Argument vector rewriting.
//!
//! [`ArgumentRewriter`] walks a raw argument vector left to right and expands
//! every long-option candidate to its full registered name. The first
//! unknown or ambiguous candidate aborts the whole call; nothing partially
//! rewritten is ever handed back.
//!
//! Only the marker prefix is inspected. A value token that happens to start
//! with `--` is treated as a candidate like any other; options that take a
//! value are expected to be written as a single `--name=value` token.
//!
//! # Example
//!
//! ```
//! use optabbrev_core::*;
//!
//! let index = AbbreviationIndex::build(["--alpha", "--beta", "--bellamy"]);
//! let rewriter = ArgumentRewriter::new(&index);
//!
//! let args = rewriter.rewrite(&["--bet", "bs", "--a", "14", "--bel"]).unwrap();
//! assert_eq!(args, vec!["--beta", "bs", "--alpha", "14", "--bellamy"]);
//!
//! let err = rewriter.rewrite(&["--be", "bs"]).unwrap_err();
//! assert!(matches!(err, RejectionError::AmbiguousOption { .. }));
//! ```

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{AbbreviationIndex, LONG_OPTION_MARKER, Resolution, RewriteConfig};

/// Rejection raised when a candidate token cannot be expanded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionError {
    /// No registered option starts with the token.
    #[error("unknown option: {0}")]
    UnknownOption(String),
    /// The token is a strict prefix of two or more registered options.
    #[error("ambiguous option: {token} (could be {})", .candidates.join(", "))]
    AmbiguousOption {
        /// Offending token as written.
        token: String,
        /// Registered names sharing the token, sorted.
        candidates: Vec<String>,
    },
}

impl RejectionError {
    /// The offending token.
    pub fn token(&self) -> &str {
        match self {
            RejectionError::UnknownOption(token) => token,
            RejectionError::AmbiguousOption { token, .. } => token,
        }
    }
}

/// One substitution performed by the rewriter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expansion {
    /// Index of the token in the argument vector.
    pub position: usize,
    /// Token as written by the user.
    pub original: String,
    /// Token after expansion.
    pub expanded: String,
}

/// Rewritten argument vector plus the substitutions that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    /// Rewritten arguments, same length and order as the input.
    pub args: Vec<String>,
    /// Tokens whose spelling changed.
    pub expansions: Vec<Expansion>,
}

/// Expands abbreviated long options against an [`AbbreviationIndex`].
#[derive(Debug, Clone)]
pub struct ArgumentRewriter<'a> {
    index: &'a AbbreviationIndex,
    config: RewriteConfig,
}

impl<'a> ArgumentRewriter<'a> {
    /// Creates a rewriter with the default [`RewriteConfig`].
    pub fn new(index: &'a AbbreviationIndex) -> Self {
        Self::with_config(index, RewriteConfig::default())
    }

    /// Creates a rewriter with explicit settings.
    ///
    /// An empty marker would make every token a candidate, so it is replaced
    /// by [`LONG_OPTION_MARKER`]. Registered names that do not start with the
    /// marker can never be reached and are reported with a warning.
    pub fn with_config(index: &'a AbbreviationIndex, mut config: RewriteConfig) -> Self {
        if config.marker.is_empty() {
            warn!(fallback = LONG_OPTION_MARKER, "empty rewrite marker");
            config.marker = LONG_OPTION_MARKER.to_string();
        }
        for name in index.names().filter(|name| !name.starts_with(&config.marker)) {
            warn!(option = name, marker = %config.marker, "registered option lacks marker");
        }
        Self { index, config }
    }

    /// Active rewrite settings.
    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Returns a rewritten copy of `args`.
    ///
    /// # Errors
    ///
    /// Returns the [`RejectionError`] for the first candidate that is unknown
    /// or ambiguous.
    pub fn rewrite<S: AsRef<str>>(&self, args: &[S]) -> Result<Vec<String>, RejectionError> {
        Ok(self.rewrite_with_report(args)?.args)
    }

    /// Rewrites `args` in place.
    ///
    /// On error `args` is left exactly as it was passed in.
    ///
    /// # Errors
    ///
    /// Same as [`rewrite`](Self::rewrite).
    pub fn rewrite_in_place(&self, args: &mut [String]) -> Result<(), RejectionError> {
        let report = self.rewrite_with_report(&*args)?;
        for expansion in report.expansions {
            args[expansion.position] = expansion.expanded;
        }
        Ok(())
    }

    /// Rewrites `args` and records every substitution.
    ///
    /// # Errors
    ///
    /// Same as [`rewrite`](Self::rewrite).
    ///
    /// # Examples
    ///
    /// ```
    /// use optabbrev_core::*;
    ///
    /// let index = AbbreviationIndex::build(["--alpha", "--beta"]);
    /// let report = ArgumentRewriter::new(&index)
    ///     .rewrite_with_report(&["--alpha", "x", "--b"])
    ///     .unwrap();
    ///
    /// assert_eq!(report.args, vec!["--alpha", "x", "--beta"]);
    /// assert_eq!(report.expansions.len(), 1);
    /// assert_eq!(report.expansions[0].position, 2);
    /// ```
    pub fn rewrite_with_report<S: AsRef<str>>(
        &self,
        args: &[S],
    ) -> Result<RewriteReport, RejectionError> {
        let mut report = RewriteReport {
            args: Vec::with_capacity(args.len()),
            expansions: Vec::new(),
        };
        let mut scanning = true;

        for (position, arg) in args.iter().enumerate() {
            let token = arg.as_ref();

            if scanning && self.config.stop_at_separator && token == self.config.marker {
                scanning = false;
            }
            if !scanning || !token.starts_with(&self.config.marker) {
                report.args.push(token.to_string());
                continue;
            }

            let expanded = match self.expand(token) {
                Ok(expanded) => expanded,
                Err(err) => {
                    debug!(
                        token,
                        position,
                        validated = ?report.args,
                        "rejected long option"
                    );
                    return Err(err);
                }
            };

            if expanded != token {
                trace!(position, from = token, to = %expanded, "expanded long option");
                report.expansions.push(Expansion {
                    position,
                    original: token.to_string(),
                    expanded: expanded.clone(),
                });
            }
            report.args.push(expanded);
        }

        Ok(report)
    }

    fn expand(&self, token: &str) -> Result<String, RejectionError> {
        let (name, assignment) = match token.find('=') {
            Some(split) if self.config.split_assignment => token.split_at(split),
            _ => (token, ""),
        };

        match self.index.resolve(name) {
            Resolution::Unique(full) => Ok(format!("{full}{assignment}")),
            Resolution::NotFound => Err(RejectionError::UnknownOption(name.to_string())),
            Resolution::Ambiguous => Err(RejectionError::AmbiguousOption {
                token: name.to_string(),
                candidates: self
                    .index
                    .candidates(name)
                    .into_iter()
                    .map(String::from)
                    .collect(),
            }),
        }
    }
}

/// Expands abbreviations in `args` against a fresh index of `names`.
///
/// Convenience for the common one-shot case: build the index, rewrite with
/// default settings, drop the index.
///
/// # Errors
///
/// Returns the [`RejectionError`] for the first unknown or ambiguous
/// candidate.
///
/// # Examples
///
/// ```
/// use optabbrev_core::{RejectionError, expand_abbreviations};
///
/// let args = expand_abbreviations(["--alpha"], &["--a"]).unwrap();
/// assert_eq!(args, vec!["--alpha"]);
///
/// let err = expand_abbreviations(["--alpha"], &["--alphax"]).unwrap_err();
/// assert_eq!(err, RejectionError::UnknownOption("--alphax".into()));
/// ```
pub fn expand_abbreviations<I, N, S>(names: I, args: &[S]) -> Result<Vec<String>, RejectionError>
where
    I: IntoIterator<Item = N>,
    N: AsRef<str>,
    S: AsRef<str>,
{
    let index = AbbreviationIndex::build(names);
    ArgumentRewriter::new(&index).rewrite(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> AbbreviationIndex {
        AbbreviationIndex::build(["--alpha", "--beta", "--bellamy"])
    }

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_full_names_pass_through() {
        let index = sample_index();
        let input = ["--beta", "bs", "--alpha", "14", "--bellamy"];
        let rewritten = ArgumentRewriter::new(&index).rewrite(&input).unwrap();
        assert_eq!(rewritten, input);
    }

    #[test]
    fn test_abbreviations_expand() {
        let index = sample_index();
        let rewritten = ArgumentRewriter::new(&index)
            .rewrite(&["--bet", "bs", "--a", "14", "--bel"])
            .unwrap();
        assert_eq!(rewritten, vec!["--beta", "bs", "--alpha", "14", "--bellamy"]);
    }

    #[test]
    fn test_ambiguous_prefix_is_rejected() {
        let index = sample_index();
        let err = ArgumentRewriter::new(&index)
            .rewrite(&["--be", "bs"])
            .unwrap_err();
        assert_eq!(
            err,
            RejectionError::AmbiguousOption {
                token: "--be".to_string(),
                candidates: vec!["--bellamy".to_string(), "--beta".to_string()],
            }
        );
        assert_eq!(err.token(), "--be");
    }

    #[test]
    fn test_unknown_options_are_rejected() {
        let index = sample_index();
        let rewriter = ArgumentRewriter::new(&index);
        assert_eq!(
            rewriter.rewrite(&["--noSuchParam"]).unwrap_err(),
            RejectionError::UnknownOption("--noSuchParam".to_string())
        );
        assert_eq!(
            rewriter.rewrite(&["--alphax"]).unwrap_err(),
            RejectionError::UnknownOption("--alphax".to_string())
        );
    }

    #[test]
    fn test_singleton_set_expands_shortest_prefix() {
        let index = AbbreviationIndex::build(["--alpha"]);
        let rewritten = ArgumentRewriter::new(&index).rewrite(&["--a"]).unwrap();
        assert_eq!(rewritten, vec!["--alpha"]);
    }

    #[test]
    fn test_non_candidates_are_untouched() {
        let index = sample_index();
        let input = ["-b", "value", "plain", "-", "--a"];
        let rewritten = ArgumentRewriter::new(&index).rewrite(&input).unwrap();
        assert_eq!(rewritten, vec!["-b", "value", "plain", "-", "--alpha"]);
    }

    #[test]
    fn test_value_starting_with_marker_is_a_candidate() {
        let index = sample_index();
        let err = ArgumentRewriter::new(&index)
            .rewrite(&["--alpha", "--5"])
            .unwrap_err();
        assert_eq!(err, RejectionError::UnknownOption("--5".to_string()));
    }

    #[test]
    fn test_bare_separator_is_resolved_by_default() {
        let index = sample_index();
        let err = ArgumentRewriter::new(&index)
            .rewrite(&["--"])
            .unwrap_err();
        assert!(matches!(err, RejectionError::AmbiguousOption { .. }));

        let single = AbbreviationIndex::build(["--alpha"]);
        let rewritten = ArgumentRewriter::new(&single).rewrite(&["--"]).unwrap();
        assert_eq!(rewritten, vec!["--alpha"]);
    }

    #[test]
    fn test_stop_at_separator_passes_rest_through() {
        let index = sample_index();
        let config = RewriteConfig {
            stop_at_separator: true,
            ..RewriteConfig::default()
        };
        let rewritten = ArgumentRewriter::with_config(&index, config)
            .rewrite(&["--a", "--", "--be", "--nope"])
            .unwrap();
        assert_eq!(rewritten, vec!["--alpha", "--", "--be", "--nope"]);
    }

    #[test]
    fn test_split_assignment_keeps_value() {
        let index = sample_index();
        let config = RewriteConfig {
            split_assignment: true,
            ..RewriteConfig::default()
        };
        let rewriter = ArgumentRewriter::with_config(&index, config);

        let rewritten = rewriter.rewrite(&["--a=x=y", "--bel="]).unwrap();
        assert_eq!(rewritten, vec!["--alpha=x=y", "--bellamy="]);

        let err = rewriter.rewrite(&["--be=1"]).unwrap_err();
        assert_eq!(err.token(), "--be");
    }

    #[test]
    fn test_assignment_is_literal_by_default() {
        let index = sample_index();
        let err = ArgumentRewriter::new(&index)
            .rewrite(&["--alpha=1"])
            .unwrap_err();
        assert_eq!(err, RejectionError::UnknownOption("--alpha=1".to_string()));
    }

    #[test]
    fn test_custom_marker() {
        let index = AbbreviationIndex::build(["/verbose", "/version"]);
        let config = RewriteConfig {
            marker: "/".to_string(),
            ..RewriteConfig::default()
        };
        let rewritten = ArgumentRewriter::with_config(&index, config)
            .rewrite(&["/verb", "--verb", "/versi"])
            .unwrap();
        assert_eq!(rewritten, vec!["/verbose", "--verb", "/version"]);
    }

    #[test]
    fn test_empty_marker_falls_back_to_long_option_marker() {
        let index = AbbreviationIndex::build(["--alpha"]);
        let config = RewriteConfig {
            marker: String::new(),
            ..RewriteConfig::default()
        };
        let rewriter = ArgumentRewriter::with_config(&index, config);

        assert_eq!(rewriter.config().marker, "--");
        let rewritten = rewriter.rewrite(&["--a", "bs", ""]).unwrap();
        assert_eq!(rewritten, vec!["--alpha", "bs", ""]);
    }

    #[test]
    fn test_rewrite_in_place_success() {
        let index = sample_index();
        let mut argv = args(&["--bet", "bs", "--a"]);
        ArgumentRewriter::new(&index)
            .rewrite_in_place(&mut argv)
            .unwrap();
        assert_eq!(argv, args(&["--beta", "bs", "--alpha"]));
    }

    #[test]
    fn test_rewrite_in_place_failure_leaves_input_untouched() {
        let index = sample_index();
        let mut argv = args(&["--bet", "bs", "--a", "--be"]);
        let err = ArgumentRewriter::new(&index)
            .rewrite_in_place(&mut argv)
            .unwrap_err();
        assert_eq!(err.token(), "--be");
        assert_eq!(argv, args(&["--bet", "bs", "--a", "--be"]));
    }

    #[test]
    fn test_report_lists_only_changed_tokens() {
        let index = sample_index();
        let report = ArgumentRewriter::new(&index)
            .rewrite_with_report(&["--alpha", "--bet", "x"])
            .unwrap();
        assert_eq!(
            report.expansions,
            vec![Expansion {
                position: 1,
                original: "--bet".to_string(),
                expanded: "--beta".to_string(),
            }]
        );
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(
            RejectionError::UnknownOption("--x".into()).to_string(),
            "unknown option: --x"
        );
        let ambiguous = RejectionError::AmbiguousOption {
            token: "--be".into(),
            candidates: vec!["--bellamy".into(), "--beta".into()],
        };
        assert_eq!(
            ambiguous.to_string(),
            "ambiguous option: --be (could be --bellamy, --beta)"
        );
    }

    #[test]
    fn test_empty_argument_vector() {
        let index = sample_index();
        let empty: [&str; 0] = [];
        assert!(ArgumentRewriter::new(&index).rewrite(&empty).unwrap().is_empty());
    }
}
