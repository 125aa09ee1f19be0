//! CLI argument parsing for the redeployment pool tool.
use crate::report::ReportKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "redeploy",
    version,
    about = "Capture and manage candidates in a redeployment pool workbook",
    after_help = "Examples:\n  redeploy init --workbook /tmp/pool.json\n  redeploy run --workbook /tmp/pool.json\n  redeploy report days-in-pool --workbook /tmp/pool.json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Config file (defaults to the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Local workbook file, overriding the config
    #[arg(long, global = true, value_name = "PATH")]
    pub workbook: Option<PathBuf>,

    /// Log store writes and lifecycle transitions to stderr
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Init(InitArgs),
    /// Start the interactive capture menu
    Run,
    Report(ReportArgs),
}

/// Init command inputs for creating a local workbook.
#[derive(Parser, Debug)]
#[command(about = "Create an empty local workbook with the pool tables")]
pub struct InitArgs {
    /// Overwrite an existing workbook
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Print one report table")]
pub struct ReportArgs {
    /// Report to print
    #[arg(value_enum)]
    pub kind: ReportKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_follow_the_subcommand() {
        let args = RootArgs::try_parse_from([
            "redeploy",
            "report",
            "salary-tenure",
            "--workbook",
            "/tmp/pool.json",
            "--verbose",
        ])
        .unwrap();
        assert!(args.global.verbose);
        assert_eq!(args.global.workbook, Some(PathBuf::from("/tmp/pool.json")));
        assert!(matches!(
            args.command,
            Command::Report(ReportArgs {
                kind: ReportKind::SalaryTenure
            })
        ));
    }

    #[test]
    fn init_accepts_force() {
        let args = RootArgs::try_parse_from(["redeploy", "init", "--force"]).unwrap();
        assert!(matches!(args.command, Command::Init(InitArgs { force: true })));
    }

    #[test]
    fn unknown_report_is_rejected() {
        assert!(RootArgs::try_parse_from(["redeploy", "report", "payroll"]).is_err());
    }
}
