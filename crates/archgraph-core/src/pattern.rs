//! Package patterns with `..` wildcards and capture groups.
//!
//! Syntax:
//!
//! - `.` separates segments literally.
//! - `..` matches zero or more whole segments, including at the start or
//!   end of the pattern (`..report..` matches `report`, `a.report.b`).
//! - `*` matches any run of characters within one segment.
//! - `(*)` captures exactly one segment, `(**)` captures one or more.
//!
//! Matching is anchored: the pattern must match the whole package name.

use regex::Regex;
use std::fmt;
use thiserror::Error;

/// Invalid package pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The pattern is empty.
    #[error("package pattern must not be empty")]
    Empty,
    /// Three or more consecutive dots.
    #[error("package pattern '{pattern}' contains '...'")]
    TooManyDots {
        /// The pattern.
        pattern: String,
    },
    /// A single dot at the start or end.
    #[error("package pattern '{pattern}' has an empty segment")]
    EmptySegment {
        /// The pattern.
        pattern: String,
    },
    /// A parenthesis outside `(*)` / `(**)`.
    #[error("package pattern '{pattern}': only '(*)' and '(**)' groups are supported")]
    InvalidGroup {
        /// The pattern.
        pattern: String,
    },
}

/// A compiled package pattern.
#[derive(Debug, Clone)]
pub struct PackagePattern {
    source: String,
    regex: Regex,
    groups: usize,
}

impl PartialEq for PackagePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for PackagePattern {}

impl PackagePattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] for empty patterns, `...`, dangling dots
    /// or unsupported groups.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        if pattern.contains("...") {
            return Err(PatternError::TooManyDots {
                pattern: pattern.to_string(),
            });
        }
        let dangling = |s: &str| s.starts_with('.') && !s.starts_with("..");
        if dangling(pattern) || (pattern.ends_with('.') && !pattern.ends_with("..")) {
            return Err(PatternError::EmptySegment {
                pattern: pattern.to_string(),
            });
        }

        let mut regex = String::from("^");
        let mut groups = 0;
        let mut rest = pattern;
        let mut at_start = true;
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix("..") {
                regex.push_str(match (at_start, after.is_empty()) {
                    (true, true) => ".*",
                    (true, false) => r"(?:.*?\.)?",
                    (false, true) => r"(?:\..*)?",
                    (false, false) => r"\.(?:.*?\.)?",
                });
                rest = after;
            } else if let Some(after) = rest.strip_prefix("(**)") {
                regex.push_str(r"([^.]+(?:\.[^.]+)*?)");
                groups += 1;
                rest = after;
            } else if let Some(after) = rest.strip_prefix("(*)") {
                regex.push_str(r"([^.]+)");
                groups += 1;
                rest = after;
            } else {
                let mut chars = rest.chars();
                let c = chars.next().unwrap_or_default();
                match c {
                    '.' => regex.push_str(r"\."),
                    '*' => regex.push_str(r"[^.]*"),
                    '(' | ')' => {
                        return Err(PatternError::InvalidGroup {
                            pattern: pattern.to_string(),
                        })
                    }
                    other => regex.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
                }
                rest = chars.as_str();
            }
            at_start = false;
        }
        regex.push('$');

        let regex = Regex::new(&regex).map_err(|_| PatternError::InvalidGroup {
            pattern: pattern.to_string(),
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
            groups,
        })
    }

    /// The pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of capture groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups
    }

    /// True if `package` matches the whole pattern.
    #[must_use]
    pub fn matches(&self, package: &str) -> bool {
        self.regex.is_match(package)
    }

    /// Captured segments, one string per group, or `None` if no match.
    #[must_use]
    pub fn captures(&self, package: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(package)?;
        Some(
            (1..=self.groups)
                .filter_map(|i| caps.get(i).map(|m| m.as_str().to_string()))
                .collect(),
        )
    }

    /// All captured groups joined with `.`; `None` if there is no match or
    /// the pattern has no groups.
    #[must_use]
    pub fn capture_key(&self, package: &str) -> Option<String> {
        if self.groups == 0 {
            return None;
        }
        self.captures(package).map(|c| c.join("."))
    }
}

impl fmt::Display for PackagePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for PackagePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
