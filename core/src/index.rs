//! Prefix index over registered long-option names.
//!
//! An [`AbbreviationIndex`] maps every non-empty prefix of every registered
//! option name to a [`PrefixEntry`]: either the single option that owns the
//! prefix or an ambiguity marker. A registered name always owns itself, even
//! when it is also a prefix of a longer registered name.
//!
//! The index is immutable once built and is meant to be rebuilt for each
//! parse invocation from whatever option set is current.
//!
//! # Examples
//!
//! ```
//! use optabbrev_core::{AbbreviationIndex, Resolution};
//!
//! let index = AbbreviationIndex::build(["--alpha", "--beta", "--bellamy"]);
//!
//! assert_eq!(index.resolve("--a"), Resolution::Unique("--alpha"));
//! assert_eq!(index.resolve("--bel"), Resolution::Unique("--bellamy"));
//! assert_eq!(index.resolve("--be"), Resolution::Ambiguous);
//! assert_eq!(index.resolve("--alphax"), Resolution::NotFound);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use serde::Serialize;
use tracing::debug;

/// Verdict returned by [`AbbreviationIndex::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// No registered option starts with the token.
    NotFound,
    /// Exactly one registered option owns the token (or the token is a
    /// registered name itself).
    Unique(&'a str),
    /// Two or more registered options share the token as a strict prefix.
    Ambiguous,
}

impl<'a> Resolution<'a> {
    /// Returns the resolved option name for [`Resolution::Unique`].
    pub fn unique(self) -> Option<&'a str> {
        match self {
            Resolution::Unique(name) => Some(name),
            _ => None,
        }
    }
}

/// Stored resolution record for one prefix key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "option", rename_all = "snake_case")]
pub enum PrefixEntry {
    /// The prefix belongs to exactly one registered option.
    Unique(String),
    /// The prefix is shared by two or more registered options.
    Ambiguous,
}

/// Immutable prefix → option table built from a set of registered names.
///
/// Keys are taken at character boundaries, so multi-byte names never produce
/// a key that splits a character. Empty names are ignored and duplicate names
/// are idempotent.
///
/// # Examples
///
/// ```
/// use optabbrev_core::{AbbreviationIndex, Resolution};
///
/// // `--ver` is registered and is also a prefix of `--verbose`.
/// let index = AbbreviationIndex::build(["--verbose", "--ver", "--version"]);
///
/// assert_eq!(index.resolve("--ver"), Resolution::Unique("--ver"));
/// assert_eq!(index.resolve("--verb"), Resolution::Unique("--verbose"));
/// assert_eq!(index.resolve("--ve"), Resolution::Ambiguous);
/// assert_eq!(index.candidates("--ve"), vec!["--ver", "--verbose", "--version"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbbreviationIndex {
    prefixes: BTreeMap<String, PrefixEntry>,
    names: BTreeSet<String>,
}

impl AbbreviationIndex {
    /// Builds an index from registered option names.
    ///
    /// The resulting table does not depend on the order in which `names` are
    /// presented.
    pub fn build<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        for name in names {
            index.insert(name.as_ref());
        }
        debug!(
            names = index.names.len(),
            keys = index.prefixes.len(),
            "built abbreviation index"
        );
        index
    }

    fn insert(&mut self, name: &str) {
        if name.is_empty() || !self.names.insert(name.to_string()) {
            return;
        }

        for end in prefix_ends(name) {
            let prefix = &name[..end];
            match self.prefixes.get_mut(prefix) {
                None => {
                    self.prefixes
                        .insert(prefix.to_string(), PrefixEntry::Unique(name.to_string()));
                }
                // exact match always wins over a longer name sharing the prefix
                Some(entry) if end == name.len() => {
                    *entry = PrefixEntry::Unique(name.to_string());
                }
                Some(entry) => {
                    let shared =
                        matches!(entry, PrefixEntry::Unique(owner) if owner.as_str() != prefix);
                    if shared {
                        *entry = PrefixEntry::Ambiguous;
                    }
                }
            }
        }
    }

    /// Resolves a token against the index.
    pub fn resolve(&self, token: &str) -> Resolution<'_> {
        match self.prefixes.get(token) {
            None => Resolution::NotFound,
            Some(PrefixEntry::Unique(name)) => Resolution::Unique(name),
            Some(PrefixEntry::Ambiguous) => Resolution::Ambiguous,
        }
    }

    /// Returns `true` if `name` is a registered full option name.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns every registered name starting with `prefix`, sorted.
    pub fn candidates(&self, prefix: &str) -> Vec<&str> {
        self.names
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|name| name.starts_with(prefix))
            .map(String::as_str)
            .collect()
    }

    /// Registered option names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Every `(prefix, entry)` pair in lexicographic key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &PrefixEntry)> {
        self.prefixes.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Number of distinct registered names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no names are registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for AbbreviationIndex {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::build(iter)
    }
}

/// Byte offsets that end each non-empty prefix of `name`.
fn prefix_ends(name: &str) -> impl Iterator<Item = usize> + '_ {
    name.char_indices().map(|(start, ch)| start + ch.len_utf8())
}
