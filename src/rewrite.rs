//! Token rewrite rules and the Rust-aware rewriter that applies them.
//!
//! A rule is a plain `pattern -> replacement` pair. It only fires on
//! identifier boundaries inside code; comments and string, byte-string, raw
//! string and char literals are copied through untouched, so provenance
//! headers and documentation keep their original text.

use std::fmt;
use std::str::FromStr;

use crate::error::{CodegenError, Result};

/// Rules turning the `f32` tree into the `f64` tree, in application order.
const F64_REWRITE_RULES: [(&str, &str); 5] = [
    ("vecmat32", "vecmat64"),
    ("f32", "f64"),
    ("F32Margin", "F64Margin"),
    ("to_f32", "to_f64"),
    ("from_f32", "from_f64"),
];

/// The fixed rule list used by derivation.
pub fn f64_rewrite_rules() -> Vec<RewriteRule> {
    F64_REWRITE_RULES
        .iter()
        .map(|(pattern, replacement)| RewriteRule::new(*pattern, *replacement))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RewriteRule {
    pub pattern: String,
    pub replacement: String,
}

impl RewriteRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    /// Parses `"pattern -> replacement"`.
    pub fn parse(rule: &str) -> Result<Self> {
        let (pattern, replacement) = rule
            .split_once("->")
            .ok_or_else(|| CodegenError::InvalidRule(rule.to_string()))?;
        let (pattern, replacement) = (pattern.trim(), replacement.trim());
        if pattern.is_empty() || replacement.is_empty() {
            return Err(CodegenError::InvalidRule(rule.to_string()));
        }
        Ok(Self::new(pattern, replacement))
    }

    /// Applies this rule to Rust source text.
    pub fn apply(&self, source: &str) -> String {
        rewrite_tokens(source, self)
    }
}

impl FromStr for RewriteRule {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RewriteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.pattern, self.replacement)
    }
}

/// Rewrites every boundary-delimited occurrence of `rule.pattern` in code.
pub fn rewrite_tokens(source: &str, rule: &RewriteRule) -> String {
    let mut out = String::with_capacity(source.len());
    for segment in split_code(source) {
        match segment {
            Segment::Code(text) => replace_tokens(text, rule, &mut out),
            Segment::Verbatim(text) => out.push_str(text),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Code(&'a str),
    /// Comment or literal, never rewritten.
    Verbatim(&'a str),
}

fn split_code(src: &str) -> Vec<Segment<'_>> {
    let bytes = src.as_bytes();
    let mut segments = Vec::new();
    let mut code_start = 0;
    let mut i = 0;

    // Only ASCII delimiters are matched, so every cut lands on a char boundary.
    while i < bytes.len() {
        let literal_end = match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => Some(line_end(bytes, i)),
            b'/' if bytes.get(i + 1) == Some(&b'*') => Some(block_comment_end(bytes, i)),
            b'"' => Some(quoted_end(bytes, i + 1, b'"')),
            b'\'' => char_literal_end(src, i),
            b'b' | b'r' if !(i > 0 && is_ident_byte(bytes[i - 1])) => {
                prefixed_literal_end(bytes, i)
            }
            _ => None,
        };

        match literal_end {
            Some(end) => {
                if code_start < i {
                    segments.push(Segment::Code(&src[code_start..i]));
                }
                segments.push(Segment::Verbatim(&src[i..end]));
                i = end;
                code_start = end;
            }
            None => i += 1,
        }
    }

    if code_start < bytes.len() {
        segments.push(Segment::Code(&src[code_start..]));
    }
    segments
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Line comments stop before the newline.
fn line_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |p| start + p)
}

fn block_comment_end(bytes: &[u8], start: usize) -> usize {
    let mut depth = 0usize;
    let mut j = start;
    while j + 1 < bytes.len() {
        match (bytes[j], bytes[j + 1]) {
            (b'/', b'*') => {
                depth += 1;
                j += 2;
            }
            (b'*', b'/') => {
                depth -= 1;
                j += 2;
                if depth == 0 {
                    return j;
                }
            }
            _ => j += 1,
        }
    }
    bytes.len()
}

/// End of a quoted literal whose body starts at `start`, honouring escapes.
fn quoted_end(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut j = start;
    while j < bytes.len() {
        if bytes[j] == b'\\' {
            j += 2;
            continue;
        }
        if bytes[j] == quote {
            return j + 1;
        }
        j += 1;
    }
    bytes.len()
}

/// `'x'` and `'\n'` are literals, `'a` is a lifetime or label.
fn char_literal_end(src: &str, start: usize) -> Option<usize> {
    let body = &src[start + 1..];
    let first = body.chars().next()?;
    if first == '\\' {
        return Some(quoted_end(src.as_bytes(), start + 1, b'\''));
    }
    let after = &body[first.len_utf8()..];
    if first != '\'' && after.starts_with('\'') {
        Some(start + 1 + first.len_utf8() + 1)
    } else {
        None
    }
}

/// `b"…"`, `b'…'`, `r"…"`, `r#"…"#`, `br#"…"#`. `r#ident` stays code.
fn prefixed_literal_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut j = start;
    if bytes[j] == b'b' {
        match bytes.get(j + 1).copied() {
            Some(b'"') => return Some(quoted_end(bytes, j + 2, b'"')),
            Some(b'\'') => return Some(quoted_end(bytes, j + 2, b'\'')),
            Some(b'r') => j += 1,
            _ => return None,
        }
    }
    if bytes[j] != b'r' {
        return None;
    }
    j += 1;
    let hashes = bytes[j..].iter().take_while(|&&b| b == b'#').count();
    j += hashes;
    if bytes.get(j) != Some(&b'"') {
        return None;
    }
    Some(raw_string_end(bytes, j + 1, hashes))
}

fn raw_string_end(bytes: &[u8], start: usize, hashes: usize) -> usize {
    let mut j = start;
    while j < bytes.len() {
        if bytes[j] == b'"' {
            let closing = bytes[j + 1..].iter().take_while(|&&b| b == b'#').count();
            if closing >= hashes {
                return j + 1 + hashes;
            }
        }
        j += 1;
    }
    bytes.len()
}

fn replace_tokens(text: &str, rule: &RewriteRule, out: &mut String) {
    let pattern = rule.pattern.as_str();
    let Some(first) = pattern.chars().next() else {
        out.push_str(text);
        return;
    };

    let mut copied = 0;
    let mut search = 0;
    while let Some(found) = text[search..].find(pattern) {
        let at = search + found;
        let end = at + pattern.len();
        if starts_on_boundary(text, at, pattern) && ends_on_boundary(text, end, pattern) {
            out.push_str(&text[copied..at]);
            out.push_str(&rule.replacement);
            copied = end;
            search = end;
        } else {
            search = at + first.len_utf8();
        }
    }
    out.push_str(&text[copied..]);
}

fn starts_on_boundary(text: &str, at: usize, pattern: &str) -> bool {
    if !pattern.starts_with(is_ident_char) {
        return true;
    }
    let before = &text[..at];
    let run_start = before
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_ident_char(*c))
        .last()
        .map(|(i, _)| i);
    match run_start {
        None => true,
        // Type suffix on a numeric literal: `1.0f32`, `2f32`, but not `0x1f32`.
        Some(i) => {
            let run = &before[i..];
            run.starts_with(|c: char| c.is_ascii_digit())
                && !["0x", "0X", "0b", "0B", "0o", "0O"]
                    .iter()
                    .any(|radix| run.starts_with(*radix))
        }
    }
}

fn ends_on_boundary(text: &str, end: usize, pattern: &str) -> bool {
    if !pattern.ends_with(is_ident_char) {
        return true;
    }
    !text[end..].starts_with(is_ident_char)
}
