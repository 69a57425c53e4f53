//! Grammar test runner implementation.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use querygram_grammar::{AttrValues, Grammar, MatchState};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Test case embedded in a grammar file.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub query: String,
    /// Whether the root rule must cover the whole query.
    #[serde(default = "default_matched")]
    pub matched: bool,
    #[serde(default)]
    pub attrs: Option<AttrValues>,
    #[serde(default)]
    pub remaining: Option<Vec<String>>,
}

fn default_matched() -> bool {
    true
}

/// Outcome of one derivation (JSON-friendly).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub query: String,
    pub matched: bool,
    #[serde(default)]
    pub attrs: AttrValues,
    #[serde(default)]
    pub remaining: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_tokens: Option<Vec<String>>,
}

impl Extraction {
    pub fn new(query: &str, state: &MatchState) -> Self {
        Self {
            query: query.to_string(),
            matched: state.is_complete(),
            attrs: state.attrs().cloned().unwrap_or_default(),
            remaining: state.remaining_tokens().to_vec(),
            matched_tokens: state.matched_tokens().map(<[String]>::to_vec),
        }
    }
}

/// Result of running one test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub query: String,
    pub actual: Extraction,
    pub duration_us: u64,
    pub status: String, // "pass", "fail"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mismatches: Vec<String>,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.status == "pass"
    }
}

/// Full test report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestReport {
    pub grammar: String,
    pub root: String,
    pub rule_count: usize,
    pub total_cases: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
    pub cases: Vec<CaseResult>,
}

/// Runs the root rule of `grammar` over `query`.
pub fn extract(grammar: &Grammar, query: &str) -> Extraction {
    let state = grammar.extract(query);
    debug!(query, matched = state.is_complete(), "extracted");
    Extraction::new(query, &state)
}

/// Runs every test case against `grammar`.
pub fn run(grammar: &Grammar, name: &str, cases: &[TestCase]) -> TestReport {
    let results: Vec<CaseResult> = cases.iter().map(|tc| run_case(grammar, tc)).collect();
    let passed = results.iter().filter(|r| r.passed()).count();
    let total = results.len();

    TestReport {
        grammar: name.to_string(),
        root: grammar.root_name().to_string(),
        rule_count: grammar.rule_names().count(),
        total_cases: total,
        passed,
        failed: total - passed,
        pass_rate: if total > 0 {
            passed as f64 / total as f64 * 100.0
        } else {
            0.0
        },
        cases: results,
    }
}

fn run_case(grammar: &Grammar, tc: &TestCase) -> CaseResult {
    let start = Instant::now();
    let actual = extract(grammar, &tc.query);
    let duration_us = start.elapsed().as_micros() as u64;

    let mismatches = compare(tc, &actual);
    CaseResult {
        query: tc.query.clone(),
        actual,
        duration_us,
        status: if mismatches.is_empty() { "pass" } else { "fail" }.to_string(),
        mismatches,
    }
}

/// Lists every expectation of `tc` that `actual` does not meet.
fn compare(tc: &TestCase, actual: &Extraction) -> Vec<String> {
    let mut mismatches = Vec::new();

    if tc.matched != actual.matched {
        mismatches.push(format!(
            "matched: expected {}, got {}",
            tc.matched, actual.matched
        ));
    }
    if let Some(attrs) = &tc.attrs
        && *attrs != actual.attrs
    {
        mismatches.push(format!(
            "attrs: expected {}, got {}",
            format_attrs(attrs),
            format_attrs(&actual.attrs)
        ));
    }
    if let Some(remaining) = &tc.remaining
        && *remaining != actual.remaining
    {
        mismatches.push(format!(
            "remaining: expected {:?}, got {:?}",
            remaining, actual.remaining
        ));
    }

    mismatches
}

/// Formats attributes as `{1: [1, 2], 10: [3]}`.
pub fn format_attrs(attrs: &AttrValues) -> String {
    let body = attrs
        .iter()
        .map(|(attr, values)| {
            let values = values
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("{attr}: [{values}]")
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{body}}}")
}

/// Save report to file.
pub fn save_report(report: &TestReport, path: &Path) -> Result<()> {
    let data = serde_json::to_string_pretty(report)?;
    std::fs::write(path, data)?;
    Ok(())
}

/// Print one extraction.
pub fn print_extraction(ex: &Extraction) {
    let status = if ex.matched { "MATCH" } else { "NO MATCH" };
    println!("{}: {}", status, ex.query);
    println!("  attrs:     {}", format_attrs(&ex.attrs));
    if !ex.remaining.is_empty() {
        println!("  remaining: {}", ex.remaining.join(" "));
    }
    if let Some(tokens) = &ex.matched_tokens {
        println!("  tokens:    {}", tokens.join(" "));
    }
}

/// Print per-case results and the summary.
pub fn print_summary(report: &TestReport) {
    println!("\n{}", "=".repeat(80));
    println!("GRAMMAR TESTS: {} (root: {})", report.grammar, report.root);
    println!("{}", "=".repeat(80));

    for cr in &report.cases {
        println!(
            "{:<6} {:>8}us  {}",
            cr.status.to_uppercase(),
            cr.duration_us,
            cr.query
        );
        for m in &cr.mismatches {
            println!("         {}", m);
        }
    }

    println!("{}", "-".repeat(80));
    println!(
        "{} cases, {} passed, {} failed ({:.1}%)",
        report.total_cases, report.passed, report.failed, report.pass_rate
    );
}
