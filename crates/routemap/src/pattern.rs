//! Route pattern compilation.
//!
//! A pattern is split on `/` and every segment is translated on its own:
//!
//! - `*` matches anything, including `/`, without capturing
//! - `*name` captures anything, including `/`, into `name`
//! - `:` matches one segment without capturing
//! - `:name` captures one segment into `name`, or whatever `rules[name]`
//!   matches when a rule is declared
//! - `\*...` and `\:...` are literal segments starting with `*` or `:`
//! - anything else is matched literally
//!
//! Escapes only apply to the leading character of their own segment.

use std::collections::BTreeMap;

use regex::Regex;
use tracing::trace;

use crate::error::{Result, RouterError};
use crate::variables::RouteVariables;

/// Default capture body of a single-segment variable.
const SEGMENT_BODY: &str = "[^/]*";

/// Default capture body of a wildcard.
const WILDCARD_BODY: &str = ".*";

/// Strips the query string, fragment, and surrounding slashes and whitespace.
///
/// Both patterns and request paths go through this before matching; the root
/// path normalizes to the empty string.
#[must_use]
pub fn normalize_path(raw: &str) -> &str {
    let path = raw.split(['?', '#']).next().unwrap_or_default();
    path.trim_matches(|c: char| c == '/' || c.is_whitespace())
}

/// A segment in a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Text matched exactly, escape markers already removed.
    Literal(String),
    /// A single segment, optionally captured under a name.
    Variable(Option<String>),
    /// Any remaining text including separators, optionally captured.
    Wildcard(Option<String>),
}

impl PathSegment {
    /// Classifies one raw segment of a pattern.
    #[must_use]
    pub fn classify(segment: &str) -> Self {
        if let Some(rest) = segment.strip_prefix("\\*") {
            return Self::Literal(format!("*{rest}"));
        }
        if let Some(rest) = segment.strip_prefix("\\:") {
            return Self::Literal(format!(":{rest}"));
        }
        if let Some(name) = segment.strip_prefix('*') {
            return Self::Wildcard((!name.is_empty()).then(|| name.to_string()));
        }
        if let Some(name) = segment.strip_prefix(':') {
            return Self::Variable((!name.is_empty()).then(|| name.to_string()));
        }
        Self::Literal(segment.to_string())
    }
}

/// A compiled path pattern.
///
/// Every named variable gets its own internally named capture group, so
/// groups written inside custom rules never shift which text lands in which
/// variable.
#[derive(Debug, Clone)]
pub struct PathPattern {
    /// The original pattern string.
    pattern: String,
    /// Parsed segments.
    segments: Vec<PathSegment>,
    /// Compiled regex for matching.
    regex: Regex,
    /// Variable names in declaration order. A name declared twice appears
    /// twice; the later capture wins.
    variables: Vec<String>,
    /// Capture group index of each variable, parallel to `variables`.
    groups: Vec<usize>,
}

impl PathPattern {
    /// Compiles a pattern without custom rules.
    ///
    /// # Example
    ///
    /// ```
    /// use routemap::PathPattern;
    ///
    /// let pattern = PathPattern::new("articles/:article_id").unwrap();
    /// let vars = pattern.match_path("articles/4").unwrap();
    /// assert_eq!(vars.get("article_id"), Some("4"));
    /// ```
    pub fn new(pattern: &str) -> Result<Self> {
        Self::compile(pattern, &BTreeMap::new())
    }

    /// Compiles a pattern, using `rules` as the capture body of the named
    /// single-segment variables they are keyed by.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use routemap::PathPattern;
    ///
    /// let rules = BTreeMap::from([("id".to_string(), r"(\d+)".to_string())]);
    /// let pattern = PathPattern::compile("user/:name/:id", &rules).unwrap();
    /// assert!(pattern.match_path("user/ada/abc").is_none());
    ///
    /// let vars = pattern.match_path("user/ada/42").unwrap();
    /// assert_eq!(vars.get("name"), Some("ada"));
    /// assert_eq!(vars.get("id"), Some("42"));
    /// ```
    pub fn compile(pattern: &str, rules: &BTreeMap<String, String>) -> Result<Self> {
        let normalized = normalize_path(pattern);
        let raw_segments: Vec<&str> = if normalized.is_empty() {
            Vec::new()
        } else {
            normalized.split('/').collect()
        };

        let mut segments = Vec::with_capacity(raw_segments.len());
        let mut variables: Vec<String> = Vec::new();
        let mut fragments = Vec::with_capacity(raw_segments.len());

        for raw in raw_segments {
            let segment = PathSegment::classify(raw);
            let fragment = match &segment {
                PathSegment::Literal(text) => regex::escape(text),
                PathSegment::Wildcard(None) => WILDCARD_BODY.to_string(),
                PathSegment::Variable(None) => SEGMENT_BODY.to_string(),
                PathSegment::Wildcard(Some(name)) => {
                    let group = group_name(variables.len());
                    variables.push(name.clone());
                    format!("(?P<{group}>{WILDCARD_BODY})")
                }
                PathSegment::Variable(Some(name)) => {
                    let body = match rules.get(name) {
                        Some(rule) => {
                            validate_rule(pattern, name, rule)?;
                            rule.as_str()
                        }
                        None => SEGMENT_BODY,
                    };
                    let group = group_name(variables.len());
                    variables.push(name.clone());
                    format!("(?P<{group}>{body})")
                }
            };

            fragments.push(fragment);
            segments.push(segment);
        }

        let source = format!("^{}$", fragments.join("/"));
        trace!(pattern, regex = %source, "compiled route pattern");

        let regex = Regex::new(&source).map_err(|e| RouterError::InvalidPatternSegment {
            pattern: pattern.to_string(),
            segment: normalized.to_string(),
            reason: e.to_string(),
        })?;

        let groups = (0..variables.len())
            .map(|i| {
                let group = group_name(i);
                regex
                    .capture_names()
                    .position(|name| name == Some(group.as_str()))
                    .ok_or_else(|| RouterError::InvalidPatternSegment {
                        pattern: pattern.to_string(),
                        segment: variables[i].clone(),
                        reason: "capture group missing from compiled pattern".to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
            regex,
            variables,
            groups,
        })
    }

    /// Returns true if the normalized `path` matches this pattern.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Attempts to match a normalized path against this pattern.
    ///
    /// Returns the captured variables if the path matches.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<RouteVariables> {
        self.match_with_defaults(path, &BTreeMap::new())
    }

    /// Matches `path` once and returns `defaults` overlaid with the captured
    /// values, applied in capture order.
    pub fn match_with_defaults(
        &self,
        path: &str,
        defaults: &BTreeMap<String, String>,
    ) -> Option<RouteVariables> {
        let caps = self.regex.captures(path)?;

        let mut vars: RouteVariables = defaults.iter().collect();
        for (name, &group) in self.variables.iter().zip(&self.groups) {
            if let Some(value) = caps.get(group) {
                vars.insert(name.clone(), value.as_str());
            }
        }

        Some(vars)
    }

    /// Returns the original pattern string.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns the variable names in declaration order.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Returns the compiled regular expression source.
    #[must_use]
    pub fn regex(&self) -> &str {
        self.regex.as_str()
    }
}

fn group_name(index: usize) -> String {
    format!("__var{index}")
}

fn validate_rule(pattern: &str, variable: &str, rule: &str) -> Result<()> {
    Regex::new(rule)
        .map(drop)
        .map_err(|source| RouterError::InvalidRule {
            variable: variable.to_string(),
            pattern: pattern.to_string(),
            source,
        })
}
