//! Extraction of literal export expressions from JS config modules
//!
//! Only the shape `module.exports = <literal>` / `export default <literal>`
//! is understood. The literal is an object or array written in JSON5 syntax
//! (unquoted keys, single quotes, trailing commas, comments).

use regex::Regex;
use std::sync::LazyLock;

static COMMONJS_EXPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bmodule\.exports\s*=\s*").unwrap());

static ESM_DEFAULT_EXPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bexport\s+default\s+").unwrap());

/// Textual fallback for ES modules: everything after `export default`
static ESM_EXPORT_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)export\s+default\s+(.+?);?\s*$").unwrap());

/// Why a literal could not be extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    /// No export statement of the expected form
    MissingExport(&'static str),
    /// The exported expression is not an object or array literal
    NotALiteral,
    /// A bracket, string or comment is never closed
    Unterminated,
    /// Code follows the exported literal
    TrailingCode,
}

impl std::fmt::Display for LiteralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralError::MissingExport(form) => write!(f, "no `{form}` statement found"),
            LiteralError::NotALiteral => {
                f.write_str("the exported value is not an object or array literal")
            }
            LiteralError::Unterminated => f.write_str("unterminated literal in export"),
            LiteralError::TrailingCode => {
                f.write_str("statements after the exported literal are not supported")
            }
        }
    }
}

/// Slice out the literal assigned to `module.exports`
pub fn commonjs_export(source: &str) -> Result<&str, LiteralError> {
    let start = find_in_code(&COMMONJS_EXPORT, source)
        .ok_or(LiteralError::MissingExport("module.exports ="))?;
    exported_literal(&source[start..])
}

/// Slice out the literal after `export default`
pub fn esm_default_export(source: &str) -> Result<&str, LiteralError> {
    let start = find_in_code(&ESM_DEFAULT_EXPORT, source)
        .ok_or(LiteralError::MissingExport("export default"))?;
    exported_literal(&source[start..])
}

/// Whether the source has an `export default` statement outside comments
/// and strings
pub fn has_default_export(source: &str) -> bool {
    find_in_code(&ESM_DEFAULT_EXPORT, source).is_some()
}

/// End offset of the first match of `pattern` that is neither in a comment
/// nor in a string literal
fn find_in_code(pattern: &Regex, source: &str) -> Option<usize> {
    pattern.find(&blank_comments_and_strings(source)).map(|m| m.end())
}

/// Copy of `source` with comments and string literals replaced by spaces
///
/// Byte offsets are unchanged, so matches map straight back to `source`.
fn blank_comments_and_strings(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut blanked = bytes.to_vec();
    let mut i = 0;

    while i < bytes.len() {
        let end = match bytes[i] {
            quote @ (b'"' | b'\'' | b'`') => {
                let mut j = i + 1;
                while j < bytes.len() && bytes[j] != quote {
                    if bytes[j] == b'\\' {
                        j += 1;
                    }
                    j += 1;
                }
                (j + 1).min(bytes.len())
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                source[i..].find('\n').map_or(bytes.len(), |n| i + n)
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => source[i + 2..]
                .find("*/")
                .map_or(bytes.len(), |n| i + 2 + n + 2),
            _ => {
                i += 1;
                continue;
            }
        };

        for byte in &mut blanked[i..end] {
            if *byte != b'\n' {
                *byte = b' ';
            }
        }
        i = end;
    }

    // Whole characters are blanked, so the bytes stay valid UTF-8
    String::from_utf8_lossy(&blanked).into_owned()
}

/// Loose capture of `export default <value>;` up to the end of the file
pub fn esm_export_tail(source: &str) -> Option<&str> {
    ESM_EXPORT_TAIL
        .captures(source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn exported_literal(tail: &str) -> Result<&str, LiteralError> {
    if !tail.starts_with(['{', '[']) {
        return Err(LiteralError::NotALiteral);
    }

    let end = balanced_end(tail).ok_or(LiteralError::Unterminated)?;
    let rest = skip_trivia(&tail[end..]);
    if !rest.is_empty() {
        return Err(LiteralError::TrailingCode);
    }

    Ok(&tail[..end])
}

/// Byte offset just past the bracket that closes `text[0]`
fn balanced_end(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            quote @ (b'"' | b'\'' | b'`') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                if i >= bytes.len() {
                    return None;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = text[i..].find('\n').map(|n| i + n)?;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = text[i + 2..].find("*/").map(|n| i + 2 + n + 1)?;
            }
            _ => {}
        }
        i += 1;
    }

    None
}

/// Drop semicolons, whitespace and comments from the front of `text`
fn skip_trivia(mut text: &str) -> &str {
    loop {
        let trimmed = text.trim_start_matches(|c: char| c.is_whitespace() || c == ';');
        if let Some(comment) = trimmed.strip_prefix("//") {
            text = comment.find('\n').map_or("", |n| &comment[n..]);
        } else if let Some(comment) = trimmed.strip_prefix("/*") {
            match comment.find("*/") {
                Some(n) => text = &comment[n + 2..],
                None => return trimmed,
            }
        } else {
            return trimmed;
        }
    }
}
