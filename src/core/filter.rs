//! Include/exclude filtering
//!
//! A file is selected by substring-matching a candidate string (its full path or its
//! bare file name) against two lists. Two combination policies are supported:
//!
//! - `any-or-blank`: include when both lists are empty, OR the candidate contains an
//!   include substring, OR the candidate contains no exclude substring.
//! - `strict-and`: include when (include is empty OR the candidate contains an include
//!   substring) AND the candidate contains no exclude substring.
//!
//! `any-or-blank` is deliberately permissive: with a non-empty exclude list, every
//! candidate that avoids all exclude substrings passes regardless of the include list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Built-in exclude list for `--default-excludes`
pub const DEFAULT_EXCLUDES: &[&str] = &[".git", "node_modules", "hocr", "package-lock"];

/// How the include and exclude lists are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterPolicy {
    /// blank OR any-include OR no-exclude
    #[default]
    AnyOrBlank,
    /// (no include list OR any-include) AND no-exclude
    StrictAnd,
}

impl fmt::Display for FilterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterPolicy::AnyOrBlank => write!(f, "any-or-blank"),
            FilterPolicy::StrictAnd => write!(f, "strict-and"),
        }
    }
}

impl FromStr for FilterPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any-or-blank" | "any" | "a" => Ok(FilterPolicy::AnyOrBlank),
            "strict-and" | "strict" | "b" => Ok(FilterPolicy::StrictAnd),
            _ => Err(format!(
                "Unknown policy: {}. Available: any-or-blank, strict-and",
                s
            )),
        }
    }
}

/// Which string of a file the lists are matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchTarget {
    /// The displayed path (absolute, or root-relative with `--relative`)
    #[default]
    FullPath,
    /// Only the final path component
    FileName,
}

impl fmt::Display for MatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTarget::FullPath => write!(f, "full-path"),
            MatchTarget::FileName => write!(f, "file-name"),
        }
    }
}

impl FromStr for MatchTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full-path" | "path" => Ok(MatchTarget::FullPath),
            "file-name" | "name" => Ok(MatchTarget::FileName),
            _ => Err(format!(
                "Unknown match target: {}. Available: full-path, file-name",
                s
            )),
        }
    }
}

/// Substring lists; only membership matters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    #[serde(default)]
    pub include: BTreeSet<String>,
    #[serde(default)]
    pub exclude: BTreeSet<String>,
}

impl FilterRule {
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            include: include.into_iter().map(Into::into).collect(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    /// Both lists empty
    pub fn is_blank(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    fn matches_include(&self, candidate: &str) -> bool {
        self.include.iter().any(|i| candidate.contains(i.as_str()))
    }

    fn matches_exclude(&self, candidate: &str) -> bool {
        self.exclude.iter().any(|e| candidate.contains(e.as_str()))
    }
}

/// Decide whether `candidate` passes `rule` under `policy`
pub fn should_include(candidate: &str, rule: &FilterRule, policy: FilterPolicy) -> bool {
    match policy {
        FilterPolicy::AnyOrBlank => {
            rule.is_blank() || rule.matches_include(candidate) || !rule.matches_exclude(candidate)
        }
        FilterPolicy::StrictAnd => {
            (rule.include.is_empty() || rule.matches_include(candidate))
                && !rule.matches_exclude(candidate)
        }
    }
}

/// Complete filter configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    pub policy: FilterPolicy,
    pub match_target: MatchTarget,
    pub rule: FilterRule,
}

impl FilterConfig {
    pub fn new(policy: FilterPolicy, match_target: MatchTarget, rule: FilterRule) -> Self {
        Self {
            policy,
            match_target,
            rule,
        }
    }

    /// Evaluate the predicate for a file given its displayed path
    pub fn accepts(&self, display_path: &str, path: &Path) -> bool {
        let candidate = match self.match_target {
            MatchTarget::FullPath => display_path.to_string(),
            MatchTarget::FileName => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        should_include(&candidate, &self.rule, self.policy)
    }
}
