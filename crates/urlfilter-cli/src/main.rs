use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use urlfilter::{FilterView, MemoryHistory, Navigator, QuerySync, TextMatch};
use urlfilter_cli::cli::Cli;
use urlfilter_cli::logging::{init_logging, LogConfig};
use urlfilter_cli::render::Table;
use urlfilter_cli::session::{location, Session};
use urlfilter_cli::{dataset, schema};

fn main() {
    let cli = Cli::parse();
    let log_config = LogConfig::from_verbosity(cli.verbose).with_ansi(io::stderr().is_terminal());
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    if let Err(error) = run(&cli) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut criteria = match &cli.schema {
        Some(path) => schema::load(path)?,
        None => schema::survey()?,
    };
    if cli.exact_text {
        criteria = schema::with_text_match(&criteria, TextMatch::Exact)?;
    }
    let criteria = Arc::new(criteria);

    let records = match &cli.data {
        Some(path) => dataset::load(path)?,
        None => dataset::sample()?,
    };
    info!(records = records.len(), criteria = criteria.len(), "starting");

    let table = Table::for_dataset(&criteria, &records)
        .with_max_width(cli.max_width)
        .with_style(console::colors_enabled());
    let sync = QuerySync::with_options(
        Arc::clone(&criteria),
        MemoryHistory::new(&cli.query),
        cli.sync_options(),
    );
    let mut view = FilterView::mount(&records, sync);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.interactive {
        let stdin = io::stdin();
        let prompt = stdin.is_terminal();
        Session::new(&mut view, &table)
            .with_prompt(prompt)
            .run(stdin.lock(), &mut out)
            .context("session aborted")?;
    } else {
        let rows = view.rows();
        writeln!(out, "{}", table.render(&rows))?;
        writeln!(
            out,
            "{} of {} rows  {}",
            rows.len(),
            records.len(),
            location(&view.query())
        )?;
    }
    let final_location = view.navigator().current_query();
    info!(location = %final_location, "done");
    Ok(())
}
