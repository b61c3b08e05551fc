use super::super::args::{BuildArgs, CheckArgs, ConfigArgs, OutputFormat};
use crate::exit_codes;
use anyhow::Context;
use artdeposit_core::{DepositConfig, DepositError, RunOptions, RunSummary};

pub fn cmd_build(args: BuildArgs) -> anyhow::Result<i32> {
    let mut config = match load_config(&args.common) {
        Ok(config) => config,
        Err(code) => return Ok(code),
    };
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    execute(
        &config,
        RunOptions {
            dry_run: args.dry_run,
        },
        args.common.format,
    )
}

pub fn cmd_check(args: CheckArgs) -> anyhow::Result<i32> {
    let config = match load_config(&args.common) {
        Ok(config) => config,
        Err(code) => return Ok(code),
    };
    execute(&config, RunOptions { dry_run: true }, args.common.format)
}

/// Load the config and apply CLI overrides. On failure, reports and returns the exit code.
fn load_config(args: &ConfigArgs) -> Result<DepositConfig, i32> {
    let mut config = match DepositConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return Err(exit_codes::CONFIG_ERROR);
        }
    };
    if let Some(path) = &args.artifacts {
        config.artifacts_path = path.clone();
    }
    if let Some(path) = &args.records {
        config.records_path = path.clone();
    }
    if let Some(date) = args.issue_date {
        config.issue_date = date;
    }
    tracing::debug!(
        "config {}: prefix {}, issue date {}",
        args.config.display(),
        config.proceeding_prefix,
        config.issue_date
    );
    Ok(config)
}

fn execute(
    config: &DepositConfig,
    options: RunOptions,
    format: OutputFormat,
) -> anyhow::Result<i32> {
    let summary = match artdeposit_core::run(config, options) {
        Ok(summary) => summary,
        Err(e) => return Ok(report_failure(&e)),
    };
    print_summary(&summary, format)?;
    Ok(exit_codes::SUCCESS)
}

fn report_failure(err: &DepositError) -> i32 {
    eprintln!("error: {err}");
    let code = err.exit_code();
    if code == exit_codes::INPUT_ERROR {
        eprintln!("hint: fix the inputs and re-run; archives are rebuilt identically");
    }
    code
}

fn print_summary(summary: &RunSummary, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(summary).context("serialize summary")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            let verb = if summary.dry_run { "would write" } else { "wrote" };
            for archive in &summary.archives {
                println!(
                    "#{}\t{} {}",
                    archive.tracking_number,
                    verb,
                    archive.path.display()
                );
            }
            for tracking_number in &summary.skipped {
                println!("#{tracking_number}\tskipped (unavailable)");
            }
            println!(
                "{} rows: {} archives, {} skipped, {} title mismatches",
                summary.rows,
                summary.archives.len(),
                summary.skipped.len(),
                summary.title_mismatches
            );
        }
    }
    Ok(())
}
