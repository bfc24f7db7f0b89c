use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use covgate::cli::{self, Style, ThresholdArgs};

/// covgate: coverage threshold gate for Cobertura and JaCoCo XML reports.
#[derive(Parser)]
#[command(name = "covgate", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ReportArgs {
    /// Path to the coverage report.
    #[arg(long, env = "PLUGIN_REPORT_PATH")]
    report: PathBuf,

    /// Report dialect (cobertura, jacoco). Detected from the content if omitted.
    #[arg(long, env = "PLUGIN_TOOL")]
    format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a report and evaluate it against thresholds.
    Check {
        #[command(flatten)]
        input: ReportArgs,

        #[command(flatten)]
        thresholds: ThresholdArgs,

        /// Fail when a threshold is not met. Without it the gate is skipped.
        #[arg(long, env = "PLUGIN_FAIL_ON_THRESHOLD")]
        fail_on_threshold: bool,

        /// Output style.
        #[arg(long, value_enum, default_value = "text")]
        output: Style,

        /// Do not echo the summary to stderr for json/env output.
        #[arg(long)]
        quiet: bool,
    },

    /// Print the aggregated metrics without evaluating thresholds.
    Summary {
        #[command(flatten)]
        input: ReportArgs,

        /// Output style.
        #[arg(long, value_enum, default_value = "text")]
        output: Style,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();

    match args.command {
        Commands::Check {
            input,
            thresholds,
            fail_on_threshold,
            output,
            quiet,
        } => {
            let thresholds = thresholds
                .resolve()
                .context("Failed to load thresholds")?;
            let result = cli::cmd_check(
                &input.report,
                input.format.as_deref(),
                &thresholds,
                fail_on_threshold,
                &output,
            )?;

            print!("{}", result.output);
            if !quiet && !matches!(output, Style::Text) {
                eprint!("{}", result.summary);
            }
            for failed in &result.verdict.failed {
                eprintln!("{failed}");
            }
            if !result.verdict.passed {
                bail!("Coverage thresholds not met");
            }
            Ok(())
        }
        Commands::Summary { input, output } => {
            let out = cli::cmd_summary(&input.report, input.format.as_deref(), &output)?;
            print!("{out}");
            Ok(())
        }
    }
}
