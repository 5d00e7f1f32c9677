//! CLI output formatting.
//!
//! Every command has a `format_*` function returning `Vec<String>` and a
//! `print_*` wrapper that writes to stdout. Format functions are pure so
//! tests can assert on exact lines.
//!
//! Entities follow one two-level pattern: a header line with a positional
//! index and title, then indented context lines.
//!
//! ```text
//! 001 Image Prompt Inspiration (2 entries)
//!     Id: image-prompt
//!     001 Midjourney
//!         Image: /uploads/midjourney.png
//!         Url: https://www.midjourney.com
//!         Prompt: misty pine forest at dawn, volumetric light, 50mm
//! ```

use crate::check::CheckReport;
use crate::generate::GeneratedSite;
use crate::submit::SubmissionOutcome;
use crate::types::{Category, Entry};
use std::path::Path;

/// Longest prompt excerpt shown in listings.
const PROMPT_EXCERPT: usize = 60;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

fn entry_lines(lines: &mut Vec<String>, index: usize, entry: &Entry, depth: usize) {
    lines.push(format!("{}{} {}", indent(depth), format_index(index), entry.name));
    let ctx = indent(depth + 1);
    lines.push(format!("{ctx}Image: {}", entry.image));
    lines.push(format!("{ctx}Url: {}", entry.url));
    if let Some(prompt) = &entry.prompt {
        lines.push(format!(
            "{ctx}Prompt: {}",
            truncate_text(prompt, PROMPT_EXCERPT)
        ));
    }
}

// ============================================================================
// list
// ============================================================================

/// Full catalog listing, categories in document order.
pub fn format_catalog(categories: &[Category]) -> Vec<String> {
    let mut lines = vec!["Categories".to_string()];
    if categories.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
        return lines;
    }
    for (i, category) in categories.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            category.title,
            plural(category.tools.len(), "entry", "entries")
        ));
        lines.push(format!("{}Id: {}", indent(1), category.id));
        for (j, entry) in category.tools.iter().enumerate() {
            entry_lines(&mut lines, j + 1, entry, 1);
        }
    }
    lines
}

pub fn print_catalog(categories: &[Category]) {
    for line in format_catalog(categories) {
        println!("{}", line);
    }
}

// ============================================================================
// search
// ============================================================================

/// Matches of a name search within one category.
pub fn format_search(category: &Category, query: &str, matches: &[&Entry]) -> Vec<String> {
    if matches.is_empty() {
        return vec![format!("No tools found for \"{query}\".")];
    }
    let mut lines = vec![format!(
        "{} ({} of {})",
        category.title,
        matches.len(),
        category.tools.len()
    )];
    for (i, entry) in matches.iter().enumerate() {
        entry_lines(&mut lines, i + 1, entry, 1);
    }
    lines
}

pub fn print_search(category: &Category, query: &str, matches: &[&Entry]) {
    for line in format_search(category, query, matches) {
        println!("{}", line);
    }
}

// ============================================================================
// add
// ============================================================================

/// One message, plus where to look on success.
pub fn format_outcome(outcome: &SubmissionOutcome) -> Vec<String> {
    match outcome {
        SubmissionOutcome::Accepted {
            message,
            category_id,
            entry,
        } => vec![
            message.clone(),
            format!("{}Image: {}", indent(1), entry.image),
            format!("{}View collection: /{}/", indent(1), category_id),
        ],
        SubmissionOutcome::Rejected { message } => vec![format!("Error: {message}")],
    }
}

pub fn print_outcome(outcome: &SubmissionOutcome) {
    for line in format_outcome(outcome) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

pub fn format_check_report(report: &CheckReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{}, {}",
        plural(report.categories, "category", "categories"),
        plural(report.entries, "entry", "entries")
    )];

    for (id, count) in &report.duplicate_ids {
        lines.push(format!("Duplicate category id: {id} ({count} times)"));
    }
    for id in &report.unusable_ids {
        lines.push(format!("Category id not usable as a page path: {id}"));
    }
    if let Some(id) = &report.missing_prompt_category {
        lines.push(format!("Prompt category not found: {id}"));
    }
    for missing in &report.missing_images {
        lines.push(format!(
            "Missing image: {} → {}",
            missing.entry_name, missing.image
        ));
        lines.push(format!("{}Category: {}", indent(1), missing.category_id));
    }
    for orphan in &report.orphaned_uploads {
        lines.push(format!("Unreferenced upload: {}", orphan.display()));
    }

    if report.is_clean() {
        lines.push("Library is consistent".to_string());
    }
    lines
}

pub fn print_check_report(report: &CheckReport) {
    for line in format_check_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// generate
// ============================================================================

pub fn format_generate_output(site: &GeneratedSite, output_dir: &Path) -> Vec<String> {
    let mut lines: Vec<String> = site
        .pages
        .iter()
        .map(|page| format!("Generated {page}"))
        .collect();
    for id in &site.skipped {
        lines.push(format!("Skipped category {id}: id is not usable as a page path"));
    }
    lines.push(format!(
        "Copied {}",
        plural(site.copied_assets, "asset", "assets")
    ));
    lines.push(format!("Site generated at {}", output_dir.display()));
    lines
}

pub fn print_generate_output(site: &GeneratedSite, output_dir: &Path) {
    for line in format_generate_output(site, output_dir) {
        println!("{}", line);
    }
}
