// src/watch/patterns.rs

use std::fmt;

use globset::GlobMatcher;
use regex::Regex;

use crate::errors::PatternError;

/// Which pattern language a spec is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMode {
    Glob,
    Regex,
}

/// Raw pattern text plus its language, as collected from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSpec {
    pub text: String,
    pub mode: PatternMode,
}

impl PatternSpec {
    pub fn glob(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: PatternMode::Glob,
        }
    }

    pub fn regex(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: PatternMode::Regex,
        }
    }
}

/// A compiled matcher. The only operation it exposes is
/// [`Pattern::matches`]; how the matching happens is the compiler's
/// business.
#[derive(Clone)]
pub enum Pattern {
    Glob { matcher: GlobMatcher, text: String },
    Regex { re: Regex, text: String },
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Glob { text, .. } => f.debug_tuple("Glob").field(text).finish(),
            Pattern::Regex { text, .. } => f.debug_tuple("Regex").field(text).finish(),
        }
    }
}

impl Pattern {
    /// Compile one pattern spec.
    pub fn compile(spec: &PatternSpec) -> Result<Self, PatternError> {
        match spec.mode {
            PatternMode::Glob => {
                let glob = globset::Glob::new(&spec.text).map_err(|source| PatternError::Glob {
                    text: spec.text.clone(),
                    source,
                })?;
                Ok(Pattern::Glob {
                    matcher: glob.compile_matcher(),
                    text: spec.text.clone(),
                })
            }
            PatternMode::Regex => {
                let re = Regex::new(&spec.text).map_err(|source| PatternError::Regex {
                    text: spec.text.clone(),
                    source,
                })?;
                Ok(Pattern::Regex {
                    re,
                    text: spec.text.clone(),
                })
            }
        }
    }

    /// Test a path (relative to the watch root, forward slashes) against
    /// this pattern. Globs match the whole path, regexes search anywhere
    /// unless anchored.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Pattern::Glob { matcher, .. } => matcher.is_match(path),
            Pattern::Regex { re, .. } => re.is_match(path),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Pattern::Glob { text, .. } | Pattern::Regex { text, .. } => text,
        }
    }
}

/// The full set of configured patterns.
///
/// An empty set is the universal matcher: with no patterns configured,
/// every changed path triggers.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Compile every spec, stopping at the first failure.
    pub fn compile(specs: &[PatternSpec]) -> Result<Self, PatternError> {
        let patterns = specs.iter().map(Pattern::compile).collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True if the set is empty or any pattern matches the path.
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| p.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_matches_everything() {
        let set = PatternSet::compile(&[]).expect("empty set");
        assert!(set.matches("anything/at/all.txt"));
        assert!(set.matches(""));
    }

    #[test]
    fn glob_matches_path_suffix_wildcards() {
        let set = PatternSet::compile(&[PatternSpec::glob("*.c")]).expect("glob");
        assert!(set.matches("foo.c"));
        assert!(set.matches("sub/dir/foo.c"));
        assert!(!set.matches("foo.h"));
    }

    #[test]
    fn regex_searches_anywhere_unless_anchored() {
        let set = PatternSet::compile(&[PatternSpec::regex(r"\.py$")]).expect("regex");
        assert!(set.matches("scripts/run.py"));
        assert!(!set.matches("scripts/run.pyc"));

        let anchored = PatternSet::compile(&[PatternSpec::regex(r"^src/")]).expect("regex");
        assert!(anchored.matches("src/main.rs"));
        assert!(!anchored.matches("tests/src_helpers.rs"));
    }

    #[test]
    fn any_of_several_patterns_is_enough() {
        let set = PatternSet::compile(&[PatternSpec::glob("*.c"), PatternSpec::glob("*.h")])
            .expect("globs");
        assert!(set.matches("foo.h"));
        assert!(!set.matches("foo.rs"));
    }

    #[test]
    fn unterminated_class_reports_the_pattern_text() {
        let err = PatternSet::compile(&[PatternSpec::glob("[abc")]).unwrap_err();
        assert_eq!(err.pattern_text(), "[abc");
        let msg = err.to_string();
        assert!(msg.contains("[abc"), "message should cite the pattern: {msg}");
    }

    #[test]
    fn bad_regex_reports_the_pattern_text() {
        let err = PatternSet::compile(&[PatternSpec::regex("a(b")]).unwrap_err();
        assert_eq!(err.pattern_text(), "a(b");
    }
}
