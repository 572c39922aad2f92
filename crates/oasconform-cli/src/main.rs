//! oasconform CLI - property-based conformance testing of Swagger 2.0 APIs

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use oasconform_core::GeneratorFactory;
use oasconform_runner::driver::FailureCase;
use oasconform_runner::{Config, Driver, RunReport, run_conformance_test};

#[derive(Parser)]
#[command(name = "oasconform")]
#[command(about = "Test a live API against its Swagger 2.0 definition")]
#[command(version)]
struct Cli {
    /// Definition to test: local file (JSON or YAML) or http(s) URL
    schema: String,

    /// Trials per operation
    #[arg(short = 'n', long)]
    trials: Option<u32>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Server root, overriding the definition's host/basePath
    #[arg(long)]
    base_url: Option<String>,

    /// Stop at the first failing operation
    #[arg(long)]
    fail_fast: bool,

    /// Config file (default: .oasconform.toml)
    #[arg(short, long)]
    config: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let mut config = if let Some(path) = &cli.config {
        Config::load(std::path::Path::new(path)).context("loading config")?
    } else {
        Config::load_default().context("loading config")?
    };
    if cli.base_url.is_some() {
        config.base_url = cli.base_url.clone();
    }

    let driver = Driver {
        trials: cli.trials.or(config.trials).unwrap_or(Driver::default().trials),
        seed: cli.seed.or(config.seed),
        fail_fast: cli.fail_fast,
        ..Driver::default()
    };

    let factory = GeneratorFactory::new();
    let report = run_conformance_test(&cli.schema, &driver, &config, &factory)
        .context("conformance run failed")?;

    print_report(&report);
    Ok(report.passed())
}

fn print_report(report: &RunReport) {
    for skipped in &report.skipped {
        println!("SKIPPED  {}: {}", skipped.label, skipped.reason);
    }

    let failures = report.failures();
    for op in &failures {
        let Some(case) = &op.failure else { continue };
        println!("FAILED   {} (status {})", op.label, case.status);
        for failure in &case.failures {
            println!("         {}", failure.message);
        }
        print_case(case);
    }

    let tested = report.reports.len();
    if failures.is_empty() {
        println!(
            "PASS: {tested} operations conform ({} skipped, seed {})",
            report.skipped.len(),
            report.seed
        );
    } else {
        println!(
            "FAIL: {}/{tested} operations do not conform (seed {} reproduces this run)",
            failures.len(),
            report.seed
        );
    }
}

fn print_case(case: &FailureCase) {
    if case.values.is_empty() {
        return;
    }
    let tag = if case.shrunk {
        "minimal failing request"
    } else {
        "failing request"
    };
    println!("         {tag}:");
    for (name, value) in &case.values {
        match value {
            Some(v) => println!("           {name} = {v}"),
            None => println!("           {name} omitted"),
        }
    }
}
