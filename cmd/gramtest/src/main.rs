//! gramtest - Runs declarative query grammars against queries or their test cases.

mod runner;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use querygram_grammar::{Grammar, GrammarConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Runs declarative query grammars against queries or their test cases.
#[derive(Parser, Debug)]
#[command(name = "gramtest")]
#[command(about = "Runs declarative query grammars against queries or their test cases")]
struct Args {
    /// Grammar definition file (YAML or JSON)
    #[arg(short, long)]
    grammar: PathBuf,

    /// Queries to extract from (default: run the grammar's test cases)
    queries: Vec<String>,

    /// Print extractions as JSON lines
    #[arg(long)]
    json: bool,

    /// Output JSON test report to file
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Quiet mode (only failures and the summary line)
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Log matcher decisions (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Grammar file with optional tests.
#[derive(Debug, Clone, serde::Deserialize)]
struct GrammarFile {
    #[serde(flatten)]
    grammar: GrammarConfig,
    #[serde(default)]
    tests: Vec<runner::TestCase>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let file = load_grammar_file(&args.grammar)?;
    let grammar = file
        .grammar
        .build()
        .with_context(|| format!("build grammar {}", args.grammar.display()))?;
    info!(
        root = grammar.root_name(),
        rules = grammar.rule_names().count(),
        tests = file.tests.len(),
        "grammar loaded"
    );

    if !args.queries.is_empty() {
        return extract_queries(&grammar, &args);
    }

    if file.tests.is_empty() {
        anyhow::bail!(
            "no queries given and {} has no tests",
            args.grammar.display()
        );
    }

    let name = args
        .grammar
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("grammar");
    let report = runner::run(&grammar, name, &file.tests);

    if args.quiet {
        for cr in report.cases.iter().filter(|cr| !cr.passed()) {
            println!("FAIL {}", cr.query);
            for m in &cr.mismatches {
                println!("  {}", m);
            }
        }
        println!(
            "{} cases, {} passed, {} failed",
            report.total_cases, report.passed, report.failed
        );
    } else {
        runner::print_summary(&report);
    }

    if let Some(output) = &args.output {
        runner::save_report(&report, output)
            .with_context(|| format!("write report {}", output.display()))?;
        if !args.quiet {
            println!("\nReport saved to {}", output.display());
        }
    }

    if report.failed > 0 {
        anyhow::bail!("{} of {} cases failed", report.failed, report.total_cases);
    }
    Ok(())
}

/// Load a grammar file, JSON or YAML by extension.
fn load_grammar_file(path: &Path) -> Result<GrammarFile> {
    let data = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");

    let file = match ext {
        "json" => serde_json::from_slice(&data)?,
        _ => serde_yaml::from_slice(&data)?,
    };
    Ok(file)
}

fn extract_queries(grammar: &Grammar, args: &Args) -> Result<()> {
    for query in &args.queries {
        let ex = runner::extract(grammar, query);
        if args.json {
            println!("{}", serde_json::to_string(&ex)?);
        } else {
            runner::print_extraction(&ex);
        }
    }
    Ok(())
}
