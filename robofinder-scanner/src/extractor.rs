// Line-oriented extraction of robots.txt paths and sitemap references

use regex::Regex;
use std::collections::HashSet;

/// Matches `Allow:` lines. The pattern is unanchored, so `Disallow:` lines
/// match as well and are reported as paths.
///
/// The optional separators are ASCII whitespace only; a non-breaking space
/// after the colon stays part of the captured value.
const PATH_PATTERN: &str = r"(?i)allow(?-u:\s)?:(?-u:\s)?(.*)";
const SITEMAP_PATTERN: &str = r"(?i)(sitemap|site-map)(?-u:\s)?:(?-u:\s)?(.*)";

/// Canonical strings already emitted during a run, in first-seen order
#[derive(Debug, Default, Clone)]
pub struct SeenSet {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value`; returns true only the first time it is seen
    pub fn insert(&mut self, value: &str) -> bool {
        if self.seen.contains(value) {
            return false;
        }
        self.seen.insert(value.to_string());
        self.order.push(value.to_string());
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.order
    }
}

/// The two dedup registers of a run
#[derive(Debug, Default, Clone)]
pub struct Registers {
    pub paths: SeenSet,
    pub sitemaps: SeenSet,
}

/// Entries first seen in one snapshot
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub new_paths: Vec<String>,
    pub new_sitemaps: Vec<String>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.new_paths.is_empty() && self.new_sitemaps.is_empty()
    }
}

pub struct LineExtractor {
    path_regex: Regex,
    sitemap_regex: Regex,
}

impl LineExtractor {
    pub fn new() -> Self {
        Self {
            path_regex: Regex::new(PATH_PATTERN).expect("path pattern is valid"),
            sitemap_regex: Regex::new(SITEMAP_PATTERN).expect("sitemap pattern is valid"),
        }
    }

    /// Scan `body` line by line and register every path and sitemap it names.
    ///
    /// Only entries not already present in `registers` are returned. A line can
    /// yield both a path and a sitemap.
    pub fn extract(&self, body: &str, base_domain: &str, registers: &mut Registers) -> Extraction {
        let mut extraction = Extraction::default();

        for line in body.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);

            if let Some(fragment) = self.path_fragment(line) {
                let url = canonical_path(base_domain, fragment);
                if registers.paths.insert(&url) {
                    extraction.new_paths.push(url);
                }
            }

            if let Some(sitemap) = self.sitemap_target(line)
                && registers.sitemaps.insert(sitemap)
            {
                extraction.new_sitemaps.push(sitemap.to_string());
            }
        }

        extraction
    }

    fn path_fragment<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.path_regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    fn sitemap_target<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.sitemap_regex
            .captures(line)
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str())
    }
}

impl Default for LineExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Join a captured path fragment onto the base domain.
///
/// A non-empty fragment gets a leading `/` if it lacks one; an empty fragment
/// leaves the base domain unchanged.
pub fn canonical_path(base_domain: &str, fragment: &str) -> String {
    if !fragment.is_empty() && !fragment.starts_with('/') {
        format!("{}/{}", base_domain, fragment)
    } else {
        format!("{}{}", base_domain, fragment)
    }
}
