// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Cadbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Cadbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Lazily-built, relevance-ranked index over a reference documentation corpus.
//!
//! The corpus is a directory tree of text/markup pages named `InterfaceName_MemberName...`; file
//! stems containing `example` are code samples. The tree is read once, on first use, and cached
//! as raw content for the life of the process. A missing root is not an error: the index is
//! simply empty.
//!
//! Search stops scanning once `3 × max_results` non-zero candidates are collected. On a large
//! corpus this bounds latency but can miss a better match that sorts later in the tree.

mod parse;

#[cfg(test)]
mod tests;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use memchr::memmem;
use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

const FILE_NAME_HIT: f64 = 10.0;
const CONTENT_HIT: f64 = 0.5;
const INTERFACE_PAGE_BOOST: f64 = 1.5;
const CANDIDATE_FACTOR: usize = 3;

/// One parsed documentation page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DocRecord {
    pub interface_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_name: Option<String>,
    pub description: String,
    pub syntax: String,
    pub remarks: String,
    pub source_locator: String,
    pub relevance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExampleRecord {
    pub title: String,
    pub source_locator: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub relevance_score: f64,
}

#[derive(Debug)]
struct DocPage {
    locator: String,
    stem: String,
    name_lower: String,
    raw: String,
    markup: bool,
    interface_page: bool,
    example: bool,
}

impl DocPage {
    fn load(root: &Path, path: &Path) -> Option<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "skipping unreadable page");
                return None;
            }
        };
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        let stem = path.file_stem()?.to_string_lossy().into_owned();
        let locator = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let markup = matches!(extension.as_str(), "htm" | "html" | "xhtml")
            || parse::looks_like_markup(&raw);
        let example = stem.to_ascii_lowercase().contains("example");

        Some(Self {
            locator,
            interface_page: parse::is_interface_name(&stem) && !example,
            example,
            name_lower: file_name.to_lowercase(),
            stem,
            raw,
            markup,
        })
    }

    fn text(&self) -> String {
        if self.markup {
            parse::html_to_text(&self.raw)
        } else {
            self.raw.clone()
        }
    }

    /// `lowered` is scratch space for the lower-cased content; only the raw page is cached.
    fn score(&self, terms: &[String], lowered: &mut String) -> f64 {
        lowered.clear();
        lowered.extend(self.raw.chars().flat_map(char::to_lowercase));
        let total = terms
            .iter()
            .map(|term| {
                let in_name =
                    if self.name_lower.contains(term.as_str()) { FILE_NAME_HIT } else { 0.0 };
                let occurrences =
                    memmem::find_iter(lowered.as_bytes(), term.as_bytes()).count();
                in_name + CONTENT_HIT * occurrences as f64
            })
            .sum::<f64>();
        if self.interface_page {
            total * INTERFACE_PAGE_BOOST
        } else {
            total
        }
    }

    fn segments(&self) -> (Option<&str>, Option<&str>) {
        parse::split_stem(&self.stem)
    }

    fn record(&self, relevance_score: f64) -> DocRecord {
        let text = self.text();
        let parsed = parse::sections(&text);
        let (interface, member) = self.segments();
        let interface_name = interface
            .map(str::to_owned)
            .or_else(|| parse::interface_from_content(&text))
            .unwrap_or_default();
        DocRecord {
            interface_name,
            member_name: member.map(str::to_owned),
            description: parsed.description,
            syntax: parsed.syntax,
            remarks: parsed.remarks,
            source_locator: self.locator.clone(),
            relevance_score,
        }
    }

    fn example_record(&self, relevance_score: f64) -> ExampleRecord {
        let text = self.text();
        let parsed = parse::sections(&text);
        let description = parse::truncate(&parsed.description, parse::EXAMPLE_DESCRIPTION_LIMIT);
        ExampleRecord {
            title: self.stem.replace('_', " "),
            source_locator: self.locator.clone(),
            description,
            code: parse::first_code_block(&self.raw),
            relevance_score,
        }
    }
}

/// Process-lifetime documentation cache.
#[derive(Debug, Default)]
pub struct DocIndex {
    root: Option<PathBuf>,
    pages: OnceLock<Vec<DocPage>>,
    scans: AtomicUsize,
}

impl DocIndex {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root, pages: OnceLock::new(), scans: AtomicUsize::new(0) }
    }

    pub fn empty() -> Self {
        Self::new(None)
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// How many times the corpus was scanned; at most one per index.
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    /// Number of indexed pages; builds the index if needed.
    pub fn len(&self) -> usize {
        self.pages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages().is_empty()
    }

    fn pages(&self) -> &[DocPage] {
        self.pages.get_or_init(|| self.build())
    }

    fn build(&self) -> Vec<DocPage> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        let Some(root) = self.root.as_deref() else {
            tracing::debug!("no documentation root configured");
            return Vec::new();
        };
        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "documentation root is not a directory");
            return Vec::new();
        }

        let paths = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unreadable corpus entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .collect::<Vec<_>>();

        // Order-preserving: ties in search are broken by enumeration order.
        let pages = paths
            .par_iter()
            .filter_map(|path| DocPage::load(root, path))
            .collect::<Vec<_>>();
        tracing::info!(root = %root.display(), pages = pages.len(), "documentation index built");
        pages
    }

    /// Ranked full-text search.
    ///
    /// Scoring stops after `3 * max_results` matching pages in corpus order, so a better page
    /// further down can be missed.
    pub fn search(&self, query: &str, max_results: usize) -> Vec<DocRecord> {
        self.ranked(query, max_results, |_| true)
            .into_iter()
            .map(|(page, score)| page.record(score))
            .collect()
    }

    /// Ranked search restricted to example pages.
    pub fn examples(&self, query: &str, max_results: usize) -> Vec<ExampleRecord> {
        self.ranked(query, max_results, |page| page.example)
            .into_iter()
            .map(|(page, score)| page.example_record(score))
            .collect()
    }

    fn ranked(
        &self,
        query: &str,
        max_results: usize,
        eligible: impl Fn(&DocPage) -> bool,
    ) -> Vec<(&DocPage, f64)> {
        let terms = query.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>();
        if terms.is_empty() || max_results == 0 {
            return Vec::new();
        }

        let cutoff = max_results.saturating_mul(CANDIDATE_FACTOR);
        let mut candidates = Vec::new();
        let mut lowered = String::new();
        for page in self.pages().iter().filter(|page| eligible(page)) {
            let score = page.score(&terms, &mut lowered);
            if score > 0.0 {
                candidates.push((page, score));
                if candidates.len() >= cutoff {
                    break;
                }
            }
        }

        // `sort_by` is stable, so equal scores keep enumeration order.
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
        candidates.truncate(max_results);
        tracing::debug!(query, hits = candidates.len(), "documentation search");
        candidates
    }

    /// Structured lookup by file-name convention.
    ///
    /// With a member: the page whose stem is `Interface_Member...`, preferring non-example pages.
    /// Without: the interface overview (`Interface` or `Interface_members`).
    pub fn lookup(&self, interface: &str, member: Option<&str>) -> Option<DocRecord> {
        let interface = interface.trim();
        if interface.is_empty() {
            return None;
        }
        let pages = self.pages();

        let found = match member.map(str::trim).filter(|member| !member.is_empty()) {
            Some(member) => {
                let matches = |page: &&DocPage| {
                    let (page_interface, page_member) = page.segments();
                    page_interface.is_some_and(|name| name.eq_ignore_ascii_case(interface))
                        && page_member.is_some_and(|name| name.eq_ignore_ascii_case(member))
                };
                pages
                    .iter()
                    .filter(matches)
                    .find(|page| !page.example)
                    .or_else(|| pages.iter().find(matches))
            }
            None => {
                let members_page = format!("{interface}_members");
                pages.iter().find(|page| page.stem.eq_ignore_ascii_case(interface)).or_else(|| {
                    pages.iter().find(|page| page.stem.eq_ignore_ascii_case(&members_page))
                })
            }
        };
        found.map(|page| page.record(0.0))
    }

    /// Distinct member names documented for `interface`, in corpus order.
    pub fn members(&self, interface: &str) -> Vec<String> {
        let interface = interface.trim();
        let mut members: Vec<String> = Vec::new();
        for page in self.pages().iter().filter(|page| !page.example) {
            let (Some(page_interface), Some(member)) = page.segments() else {
                continue;
            };
            if !page_interface.eq_ignore_ascii_case(interface)
                || member.eq_ignore_ascii_case("members")
            {
                continue;
            }
            if !members.iter().any(|known| known.eq_ignore_ascii_case(member)) {
                members.push(member.to_owned());
            }
        }
        members
    }
}
