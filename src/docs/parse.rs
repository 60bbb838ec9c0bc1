// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Turning reference pages (HTML or plain text/markdown) into record fields.

use std::sync::OnceLock;

use regex::Regex;

pub(crate) const DESCRIPTION_LIMIT: usize = 500;
pub(crate) const SYNTAX_LIMIT: usize = 800;
pub(crate) const REMARKS_LIMIT: usize = 500;
pub(crate) const EXAMPLE_DESCRIPTION_LIMIT: usize = 300;
pub(crate) const CODE_LIMIT: usize = 4000;

const TRUNCATION_MARKER: &str = "...";

fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn interface_pattern() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"\b(I[A-Z]\w*) (?:Interface|Object)\b")
}

fn invisible_blocks() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"(?is)<(script|style|head)\b[^>]*>.*?</(?:script|style|head)\s*>")
}

fn block_breaks() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"(?i)<br\s*/?>|</?(?:p|div|h[1-6]|tr|li|pre|table|dt|dd)\b[^>]*>")
}

fn tags() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"(?s)<[^>]*>")
}

fn line_breaks() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"(?i)<br\s*/?>")
}

fn numeric_entity() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"&#(x[0-9a-fA-F]+|[0-9]+);")
}

fn pre_block() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"(?is)<pre\b[^>]*>(.*?)</pre\s*>")
}

fn fenced_block() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"(?s)```[^\n]*\n(.*?)```")
}

fn code_element() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"(?is)<code\b[^>]*>(.*?)</code\s*>")
}

/// Heuristic: treat content as markup when it opens a recognizable element early on.
pub(crate) fn looks_like_markup(raw: &str) -> bool {
    let head = raw.get(..raw.len().min(2048)).unwrap_or(raw).to_ascii_lowercase();
    ["<html", "<!doctype", "<body", "<p>", "<p ", "<h1", "<h2", "<div", "<table", "<pre"]
        .iter()
        .any(|marker| head.contains(marker))
}

/// Reduces HTML to readable text: drops invisible blocks, keeps block boundaries as line breaks,
/// strips every remaining tag and decodes common entities.
pub fn html_to_text(raw: &str) -> String {
    let mut text = raw.to_owned();
    if let Some(pattern) = invisible_blocks() {
        text = pattern.replace_all(&text, " ").into_owned();
    }
    if let Some(pattern) = block_breaks() {
        text = pattern.replace_all(&text, "\n").into_owned();
    }
    if let Some(pattern) = tags() {
        text = pattern.replace_all(&text, "").into_owned();
    }
    normalize_lines(&decode_entities(&text))
}

/// Collapses runs of spaces inside lines and runs of blank lines between them.
fn normalize_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = true;
    for line in text.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if !blank_run {
                out.push('\n');
                blank_run = true;
            }
            continue;
        }
        out.push_str(&collapsed);
        out.push('\n');
        blank_run = false;
    }
    out.trim_end().to_owned()
}

pub fn decode_entities(text: &str) -> String {
    let mut decoded = text.to_owned();
    if let Some(pattern) = numeric_entity() {
        decoded = pattern
            .replace_all(&decoded, |captures: &regex::Captures<'_>| {
                let digits = &captures[1];
                let code = match digits.strip_prefix('x') {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => digits.parse::<u32>().ok(),
                };
                code.and_then(char::from_u32).map(String::from).unwrap_or_default()
            })
            .into_owned();
    }
    // `&amp;` last so `&amp;lt;` stays a literal `&lt;`.
    decoded
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Cuts `text` to at most `limit` characters, appending `...` when anything was dropped.
pub fn truncate(text: &str, limit: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(limit) {
        None => text.to_owned(),
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", text[..cut].trim_end()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    Description,
    Syntax,
    Remarks,
    Terminator,
}

fn classify_heading(line: &str) -> Option<Heading> {
    let title = line.trim().trim_start_matches('#').trim().trim_end_matches(':').trim();
    let lower = title.to_ascii_lowercase();
    match lower.as_str() {
        "description" => Some(Heading::Description),
        "remarks" => Some(Heading::Remarks),
        "parameters" | "return value" | "example" | "examples" | "see also" => {
            Some(Heading::Terminator)
        }
        // "Syntax", "Syntax (OLE Automation)", "Syntax (COM)".
        _ if lower.starts_with("syntax") && title.len() <= 40 => Some(Heading::Syntax),
        _ => None,
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Sections {
    pub description: String,
    pub syntax: String,
    pub remarks: String,
}

/// Splits page text at the known headings.
///
/// Text before the first heading counts as description when the page has no explicit
/// `Description` heading. Repeated `Syntax` headings (one per binding) are concatenated.
pub fn sections(text: &str) -> Sections {
    let mut leading = Vec::new();
    let mut description = Vec::new();
    let mut syntax = Vec::new();
    let mut remarks = Vec::new();
    let mut current: Option<Heading> = None;
    let mut saw_description = false;

    for line in text.lines() {
        if let Some(heading) = classify_heading(line) {
            saw_description |= heading == Heading::Description;
            if heading == Heading::Syntax && !syntax.is_empty() {
                syntax.push("");
            }
            current = Some(heading);
            continue;
        }
        match current {
            None => leading.push(line),
            Some(Heading::Description) => description.push(line),
            Some(Heading::Syntax) => syntax.push(line),
            Some(Heading::Remarks) => remarks.push(line),
            Some(Heading::Terminator) => {}
        }
    }

    let description = if saw_description { description } else { leading };
    Sections {
        description: truncate(&description.join("\n"), DESCRIPTION_LIMIT),
        syntax: truncate(&syntax.join("\n"), SYNTAX_LIMIT),
        remarks: truncate(&remarks.join("\n"), REMARKS_LIMIT),
    }
}

/// Conventional interface names: `I` followed by an uppercase letter.
pub fn is_interface_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('I') && chars.next().is_some_and(|ch| ch.is_ascii_uppercase())
}

/// `(interface, member)` from an `InterfaceName_MemberName...` stem.
pub fn split_stem(stem: &str) -> (Option<&str>, Option<&str>) {
    let mut segments = stem.split('_').filter(|segment| !segment.is_empty());
    let first = segments.next();
    let second = segments.next();
    match first {
        Some(interface) if is_interface_name(interface) => (Some(interface), second),
        _ => (None, None),
    }
}

/// First `IName Interface` / `IName Object` mention in the text.
pub fn interface_from_content(text: &str) -> Option<String> {
    interface_pattern()?.captures(text).map(|captures| captures[1].to_owned())
}

/// First code sample: `<pre>`, then a markdown fence, then `<code>`.
pub fn first_code_block(raw: &str) -> Option<String> {
    let html = |pattern: Option<&'static Regex>| {
        pattern?.captures(raw).map(|captures| strip_inline_markup(&captures[1]))
    };
    let fenced = || fenced_block()?.captures(raw).map(|captures| captures[1].to_owned());

    html(pre_block())
        .or_else(fenced)
        .or_else(|| html(code_element()))
        .map(|code| code.trim_matches('\n').trim_end().to_owned())
        .filter(|code| !code.trim().is_empty())
        .map(|code| truncate(&code, CODE_LIMIT))
}

/// Drops tags inside a code block while keeping its line structure.
fn strip_inline_markup(fragment: &str) -> String {
    let mut text = fragment.to_owned();
    if let Some(pattern) = line_breaks() {
        text = pattern.replace_all(&text, "\n").into_owned();
    }
    if let Some(pattern) = tags() {
        text = pattern.replace_all(&text, "").into_owned();
    }
    decode_entities(&text)
}
