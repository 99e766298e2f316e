//! Preprocessor line classification.
//!
//! The external preprocessor leaves three kinds of lines behind: `#include`
//! for files it was told not to expand, and `#line N "file"` / `# N "file"`
//! markers recording where the following line came from.

/// A classified `#` line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Directive<'a> {
    /// `#include "path"` or `#include <path>`.
    Include(&'a str),
    /// `#line N ["file"]` or `# N ["file"]`: the next line is line `line`.
    Line { line: u32, file: Option<&'a str> },
    /// `#pragma` and friends: nothing the frontend acts on.
    Ignored,
    /// A directive name the frontend does not know.
    Unknown(&'a str),
    /// A known directive with arguments that make no sense.
    Malformed(&'a str),
}

/// Classify the text of one directive line, `#` included.
pub(crate) fn classify(text: &str) -> Directive<'_> {
    let body = text.strip_prefix('#').unwrap_or(text).trim();
    if body.is_empty() {
        // A lone `#` is the null directive.
        return Directive::Ignored;
    }

    if body.starts_with(|c: char| c.is_ascii_digit()) {
        return line_marker(body, "#");
    }

    let name_end = body
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(body.len());
    let (name, rest) = body.split_at(name_end);
    match name {
        "include" => match quoted(rest.trim()) {
            Some(path) if !path.is_empty() => Directive::Include(path),
            _ => Directive::Malformed("include"),
        },
        "line" => line_marker(rest.trim(), "line"),
        "pragma" | "ident" => Directive::Ignored,
        _ => Directive::Unknown(name),
    }
}

/// `N ["file" [flags...]]`
fn line_marker<'a>(args: &'a str, name: &'a str) -> Directive<'a> {
    let digits_end = args
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(args.len());
    let Ok(line) = args[..digits_end].parse::<u32>() else {
        return Directive::Malformed(name);
    };
    let rest = args[digits_end..].trim_start();
    if rest.is_empty() {
        return Directive::Line { line, file: None };
    }
    match quoted(rest) {
        Some(file) => Directive::Line {
            line,
            file: Some(file),
        },
        None => Directive::Malformed(name),
    }
}

/// The text between a leading `"..."` or `<...>` pair.
fn quoted(text: &str) -> Option<&str> {
    let close = match text.chars().next()? {
        '"' => '"',
        '<' => '>',
        _ => return None,
    };
    let inner = &text[1..];
    inner.find(close).map(|end| &inner[..end])
}
