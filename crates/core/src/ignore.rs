// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Translation of `.gitignore`-style files into rsync include/exclude rules.

use std::path::Path;

/// Include and exclude rules for the mirroring tool.
///
/// rsync applies the first matching rule, so every include must be emitted
/// before any exclude. Both lists keep first-seen order without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnorePatterns {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl IgnorePatterns {
    /// Parse ignore-file contents.
    pub fn parse(contents: &str) -> Self {
        let mut patterns = Self::default();
        for raw in contents.lines() {
            let line = unescape_spaces(raw.trim_end_matches('\r'));
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(negated) = line.strip_prefix('!') {
                if !negated.is_empty() {
                    push_unique(&mut patterns.include, negated.to_string());
                }
                continue;
            }
            let pattern = if let Some(rest) = line.strip_prefix("\\#") {
                format!("#{rest}")
            } else if let Some(rest) = line.strip_prefix("\\!") {
                format!("!{rest}")
            } else {
                line
            };
            push_unique(&mut patterns.exclude, pattern);
        }
        patterns
    }

    /// Read and parse an ignore file. A missing file yields no rules.
    pub fn translate(path: &Path) -> std::io::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let patterns = Self::parse(&contents);
                tracing::debug!(
                    path = %path.display(),
                    include = patterns.include.len(),
                    exclude = patterns.exclude.len(),
                    "translated ignore file"
                );
                Ok(patterns)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no ignore file");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Append operator-supplied excludes that are not already present.
    pub fn add_excludes<S: AsRef<str>>(&mut self, extra: &[S]) {
        for pattern in extra {
            push_unique(&mut self.exclude, pattern.as_ref().to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

/// Normalise whitespace the way git reads a pattern line.
///
/// Leading whitespace is dropped. Trailing whitespace is dropped unless the
/// last run starts with an escaped space. Every `\<whitespace>` becomes a
/// literal space.
fn unescape_spaces(line: &str) -> String {
    let line = line.trim_start();
    let bytes = line.as_bytes();
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1].is_ascii_whitespace() {
        if end >= 2 && bytes[end - 2] == b'\\' {
            break;
        }
        end -= 1;
    }

    let mut out = String::with_capacity(end);
    let mut chars = line[..end].chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some(next)) if next.is_whitespace() => {
                chars.next();
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "ignore_tests.rs"]
mod tests;
