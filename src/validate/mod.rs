//! Checks over generated output and race data
//!
//! Each checker returns [`Finding`]s; a [`ValidationReport`] collects them
//! across files. Any [`Severity::Error`] makes the run fail.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::Result;

pub mod guide;
pub mod landing;
pub mod marketplace;
pub mod race_data;
pub mod zwo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        })
    }
}

/// One rule outcome for one subject (file or race)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub category: &'static str,
    pub subject: String,
    pub message: String,
}

impl Finding {
    pub fn new(
        severity: Severity,
        category: &'static str,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn error(category: &'static str, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, category, subject, message)
    }

    pub fn warning(category: &'static str, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, category, subject, message)
    }

    pub fn info(category: &'static str, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, category, subject, message)
    }
}

#[derive(Tabled)]
struct FindingRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Message")]
    message: String,
}

/// Findings from a validation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    /// Files or records examined
    pub checked: usize,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one examined subject and its findings
    pub fn record(&mut self, findings: Vec<Finding>) {
        self.checked += 1;
        self.findings.extend(findings);
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.checked += other.checked;
        self.findings.extend(other.findings);
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }

    /// Process exit code: 1 when any error was found
    pub fn exit_code(&self) -> i32 {
        if self.has_errors() {
            1
        } else {
            0
        }
    }

    /// Findings sorted by severity, rendered as a table
    pub fn summary_table(&self) -> String {
        let mut findings: Vec<&Finding> = self.findings.iter().collect();
        findings.sort_by(|a, b| a.severity.cmp(&b.severity).then(a.subject.cmp(&b.subject)));
        let rows = findings.into_iter().map(|f| FindingRow {
            severity: f.severity.to_string(),
            category: f.category.to_string(),
            subject: f.subject.clone(),
            message: f.message.clone(),
        });
        Table::new(rows).with(Style::modern()).to_string()
    }
}

/// Files under `dir` (recursively) whose name satisfies `wanted`, sorted
pub fn collect_files(dir: &Path, wanted: &dyn Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if wanted(&path) {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Display name for a file relative to the scanned root
pub(crate) fn subject_for(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Validate every `.zwo` file under `dir`
pub fn validate_zwo_dir(dir: &Path) -> Result<ValidationReport> {
    let mut report = ValidationReport::new();
    for path in collect_files(dir, &|p| has_extension(p, "zwo"))? {
        let subject = subject_for(dir, &path);
        let xml = fs::read_to_string(&path)?;
        report.record(zwo::check_zwo(&subject, &xml));
    }
    Ok(report)
}

/// Validate every guide (`*_guide.html`) under `dir`
pub fn validate_guide_dir(dir: &Path) -> Result<ValidationReport> {
    let mut report = ValidationReport::new();
    let is_guide = |p: &Path| {
        p.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with("_guide.html"))
    };
    for path in collect_files(dir, &is_guide)? {
        let subject = subject_for(dir, &path);
        let html = fs::read_to_string(&path)?;
        report.record(guide::check_guide(&subject, &html));
    }
    Ok(report)
}
