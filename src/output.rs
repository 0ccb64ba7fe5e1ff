//! CLI output formatting.
//!
//! Each report has a `format_*` function returning lines (pure, tested) and a
//! `print_*` wrapper that writes them to stdout.
//!
//! ```text
//! [warn] Project 'Tool' image not found at assets/photos/tool.png, applying placeholder.
//! Assets: 12 files → assets/
//! Photos: 3 files → assets/photos/
//! Sections: news, publications, projects, resources, blog
//! Site generated at /home/ada/site/docs
//! ```

use crate::normalize::Warning;
use crate::pipeline::{BuildReport, CheckReport};
use crate::render::Section;

/// A normalize warning as a console line.
pub fn format_warning(warning: &Warning) -> String {
    format!("[warn] {warning}")
}

pub fn print_warning(warning: &Warning) {
    println!("{}", format_warning(warning));
}

fn format_sections(sections: &[Section]) -> String {
    if sections.is_empty() {
        return "Sections: (none)".to_string();
    }
    let keys: Vec<&str> = sections.iter().map(|s| s.toggle_key()).collect();
    format!("Sections: {}", keys.join(", "))
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Summary of a finished build. Warnings are printed as they occur, not here.
pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "Assets: {} \u{2192} assets/",
        plural(report.prepared.assets_copied, "file")
    ));
    match report.prepared.photos_copied {
        Some(n) => lines.push(format!("Photos: {} \u{2192} assets/photos/", plural(n, "file"))),
        None => lines.push("Photos: none (no photos directory)".to_string()),
    }
    lines.push(format_sections(&report.sections));
    lines.push(format!("Site generated at {}", report.output_dir.display()));
    lines
}

pub fn print_build_report(report: &BuildReport) {
    for line in format_build_report(report) {
        println!("{}", line);
    }
}

/// Warnings, enabled sections, and a one-line verdict.
pub fn format_check_report(report: &CheckReport) -> Vec<String> {
    let mut lines: Vec<String> = report.warnings.iter().map(format_warning).collect();
    lines.push(format_sections(&report.sections));
    lines.push(format!(
        "{}, {} enabled",
        plural(report.warnings.len(), "warning"),
        plural(report.sections.len(), "section")
    ));
    lines
}

pub fn print_check_report(report: &CheckReport) {
    for line in format_check_report(report) {
        println!("{}", line);
    }
}
