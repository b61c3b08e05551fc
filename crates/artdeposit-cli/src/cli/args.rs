use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "artdeposit",
    version,
    about = "Build deterministic deposit packages for evaluated research artifacts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Join the CSV and XML exports and write one archive per artifact
    Build(BuildArgs),
    /// Validate both exports and synthesize every document without writing
    Check(CheckArgs),
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Deposit configuration (YAML)
    #[arg(long, short = 'c', env = "ARTDEPOSIT_CONFIG", default_value = "deposit.yaml")]
    pub config: PathBuf,

    /// Override `artifactsPath`
    #[arg(long)]
    pub artifacts: Option<PathBuf>,

    /// Override `recordsPath`
    #[arg(long)]
    pub records: Option<PathBuf>,

    /// Override `issueDate` (YYYY-MM-DD)
    #[arg(long)]
    pub issue_date: Option<NaiveDate>,

    /// Summary format on stdout
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub common: ConfigArgs,

    /// Override `outputDir`
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Run every step but do not write archives
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub common: ConfigArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_flags_parse() {
        let cli = Cli::try_parse_from([
            "artdeposit",
            "build",
            "--config",
            "ppopp.yaml",
            "--output-dir",
            "out",
            "--issue-date",
            "2024-03-01",
            "--format",
            "json",
            "--dry-run",
        ])
        .unwrap();
        let Command::Build(args) = cli.cmd else {
            panic!("expected build");
        };
        assert_eq!(args.common.config, PathBuf::from("ppopp.yaml"));
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert_eq!(
            args.common.issue_date,
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(args.common.format, OutputFormat::Json);
        assert!(args.dry_run);
    }

    #[test]
    fn invalid_issue_date_is_rejected() {
        assert!(
            Cli::try_parse_from(["artdeposit", "check", "--issue-date", "2024-13-01"]).is_err()
        );
    }
}
