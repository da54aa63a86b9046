// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! jcad-fc CLI

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use jcad_fc::cli::{output_path, Reporter, Runner};
use jcad_fc::ConvertConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jcad-fc")]
#[command(about = "Convert CAD kernel object snapshots to and from JCAD documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./jcad-fc.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fail on unrecognized type identifiers
    #[arg(long, global = true)]
    strict: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert native snapshot(s) into JCAD documents
    Export {
        /// Snapshot file or directory of snapshots
        input: PathBuf,

        /// Output file, or output directory when INPUT is a directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply a JCAD document onto a native snapshot
    Apply {
        /// JCAD document
        document: PathBuf,

        /// Native snapshot to update
        snapshot: PathBuf,

        /// Output file (defaults to overwriting SNAPSHOT)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify that every property survives export and write-back
    Check {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// List registered handlers
    Handlers,

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = ConvertConfig::from_file(path)?;
            config.apply_env();
            config
        }
        None => ConvertConfig::load()?,
    };
    if cli.strict {
        config.strict = true;
    }
    init_logging(&config, cli.verbose);

    let registry = config.build_registry();
    let runner = Runner::new(&registry).pretty(config.pretty);

    match &cli.command {
        Commands::Export { input, output } => export_command(&runner, input, output.as_deref())?,
        Commands::Apply {
            document,
            snapshot,
            output,
        } => {
            let output = output.as_deref().unwrap_or(snapshot);
            for (object, report) in runner.apply_file(document, snapshot, output)? {
                Reporter::report_apply(&object, &report);
            }
        }
        Commands::Check { inputs } => check_command(&runner, inputs, config.tolerance)?,
        Commands::Handlers => Reporter::report_handlers(&registry),
        Commands::Version => {
            println!("jcad-fc v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn init_logging(config: &ConvertConfig, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn export_command(runner: &Runner<'_>, input: &Path, output: Option<&Path>) -> Result<()> {
    if !input.exists() {
        bail!("Input not found: {}", input.display());
    }

    if input.is_dir() {
        let results = runner.export_dir(input, output)?;
        let mut failed = 0;
        for (path, result) in &results {
            match result {
                Ok(outcome) => Reporter::report_export(outcome),
                Err(e) => {
                    failed += 1;
                    Reporter::report_error(&format!("{}: {:#}", path.display(), e));
                }
            }
        }
        if failed > 0 {
            bail!("{} of {} snapshots failed to export", failed, results.len());
        }
        Reporter::success(&format!("Exported {} snapshots", results.len()));
    } else {
        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| output_path(input, None));
        let outcome = runner.export_file(input, &output)?;
        Reporter::report_export(&outcome);
    }

    Ok(())
}

fn check_command(runner: &Runner<'_>, inputs: &[PathBuf], tolerance: f64) -> Result<()> {
    let mut failures = 0;

    for input in inputs {
        let file = input.display().to_string();
        for result in runner.check_file(input, tolerance)? {
            Reporter::report_round_trip(&file, &result);
            if !result.passed() {
                failures += 1;
            }
        }
    }

    if failures > 0 {
        Reporter::report_error(&format!("{} objects failed the round trip", failures));
        std::process::exit(1);
    }

    Ok(())
}
