//! Redeployment pool capture tool.
//!
//! Startup problems (bad config, unreadable workbook) end the process with an
//! error; everything after the menu starts is handled inside the menu loop.
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod lifecycle;
mod menu;
mod prompt;
mod record;
mod report;
mod store;
mod validate;

use cli::{Command, GlobalArgs, RootArgs};
use config::{Config, StoreConfig};
use lifecycle::{PoolEngine, SystemClock};
use prompt::Prompter;
use store::{LocalWorkbook, RecordStore, SheetsStore, SheetsTarget};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.global.verbose);
    let config = config::load_config(args.global.config.as_deref())?;
    config::validate_config(&config)?;

    match args.command {
        Command::Init(init) => run_init(&config, &args.global, init.force),
        Command::Run => run_menu(&config, &args.global),
        Command::Report(report) => run_report(&config, &args.global, report.kind),
    }
}

/// Logs go to stderr so they never interleave with prompts.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run_init(config: &Config, global: &GlobalArgs, force: bool) -> Result<()> {
    if matches!(config.store, StoreConfig::Sheets { .. }) && global.workbook.is_none() {
        return Err(anyhow!(
            "init only creates local workbooks; pass --workbook or use the local backend"
        ));
    }
    let path = config::resolve_workbook_path(config, global.workbook.as_deref())?;
    if path.exists() && !force {
        return Err(anyhow!(
            "workbook {} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    let workbook = LocalWorkbook::create(&path)
        .with_context(|| format!("create workbook {}", path.display()))?;
    println!("Created workbook {}", workbook.path().display());
    Ok(())
}

fn run_menu(config: &Config, global: &GlobalArgs) -> Result<()> {
    let store = open_store(config, global)?;
    let prompter = Prompter::new(io::stdin().lock(), io::stdout())
        .with_max_attempts(config.max_prompt_attempts);
    let mut engine = PoolEngine::new(store, prompter, SystemClock);
    menu::run(&mut engine)
}

fn run_report(config: &Config, global: &GlobalArgs, kind: report::ReportKind) -> Result<()> {
    let store = open_store(config, global)?;
    let snapshot = report::snapshot(&store, kind)?;
    print!("{}", report::render(&snapshot));
    Ok(())
}

/// `--workbook` always selects a local workbook; otherwise the config decides.
fn open_store(config: &Config, global: &GlobalArgs) -> Result<Box<dyn RecordStore>> {
    let sheets = match &config.store {
        StoreConfig::Sheets {
            spreadsheet_id,
            token_env,
            base_url,
        } if global.workbook.is_none() => Some((spreadsheet_id, token_env, base_url)),
        _ => None,
    };
    if let Some((spreadsheet_id, token_env, base_url)) = sheets {
        let token = std::env::var(token_env)
            .with_context(|| format!("read the sheets bearer token from ${token_env}"))?;
        tracing::info!(spreadsheet_id = %spreadsheet_id, "using sheets store");
        return Ok(Box::new(SheetsStore::new(SheetsTarget {
            spreadsheet_id: spreadsheet_id.clone(),
            base_url: base_url.clone(),
            token,
        })));
    }

    let path = config::resolve_workbook_path(config, global.workbook.as_deref())?;
    let workbook = LocalWorkbook::open(&path).with_context(|| {
        format!(
            "open workbook {} (create it with `redeploy init`)",
            path.display()
        )
    })?;
    tracing::info!(path = %workbook.path().display(), "using local workbook");
    Ok(Box::new(workbook))
}
