//! Fixture runner: load scenario files, run each against `rule_schema`, report.
mod fixture;
mod path_de;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rayon::prelude::*;

use fixture::Fixture;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// run JSON scenario fixtures against the schema engine and the pathifier
#[derive(Parser, Debug)]
struct CommandLineInterface {
    /// fixture files; literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., default_value = "fixtures/*.json")]
    fixtures: Vec<String>,

    /// stop at the first failing fixture (runs sequentially)
    #[arg(long, default_value_t = false)]
    fail_fast: bool,
}

struct Outcome {
    path: PathBuf,
    name: String,
    result: Result<()>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = CommandLineInterface::parse();
    match cli.run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

impl CommandLineInterface {
    /// `Ok(true)` when every fixture passed.
    fn run(&self) -> Result<bool> {
        let paths = resolve_file_path_patterns(&self.fixtures)?;
        tracing::debug!(count = paths.len(), "fixtures resolved");

        let outcomes: Vec<Outcome> = if self.fail_fast {
            let mut outcomes = Vec::new();
            for path in &paths {
                let outcome = run_one(path);
                let failed = outcome.result.is_err();
                outcomes.push(outcome);
                if failed { break; }
            }
            outcomes
        } else {
            paths.par_iter().map(|p| run_one(p)).collect()
        };

        let mut failures = 0usize;
        for outcome in &outcomes {
            match &outcome.result {
                Ok(()) => println!("{} {} ({})", "PASS".green().bold(), outcome.name, outcome.path.display()),
                Err(error) => {
                    failures += 1;
                    println!("{} {} ({})\n  {error:#}", "FAIL".red().bold(), outcome.name, outcome.path.display());
                }
            }
        }
        let summary = format!("{} passed, {failures} failed", outcomes.len() - failures);
        println!("{}", if failures == 0 { summary.green() } else { summary.red() });
        Ok(failures == 0)
    }
}

fn run_one(path: &Path) -> Outcome {
    let loaded = load_fixture(path);
    let name = loaded.as_ref().map_or_else(|_| path.display().to_string(), |f| f.name.clone());
    let result = loaded.and_then(|f| f.run());
    Outcome { path: path.to_path_buf(), name, result }
}

fn load_fixture(path: &Path) -> Result<Fixture> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read fixture {}", path.display()))?;
    path_de::from_str_with_path::<Fixture>(&source)
        .with_context(|| format!("failed to parse fixture {}", path.display()))
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if has_glob_chars(pattern) {
            let before = out.len();
            for entry in glob::glob(pattern).with_context(|| format!("bad glob pattern: {pattern}"))? {
                out.push(entry?);
            }
            anyhow::ensure!(out.len() > before, "glob pattern matched no files: {pattern}");
        } else {
            out.push(PathBuf::from(pattern));
        }
    }
    out.sort();
    Ok(out)
}
