//! Terminal front end for the highlight playground
//!
//! Seeds the editor from the state file, appends every stdin line to the
//! buffer as its own edit, and prints the highlighted viewport at EOF.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use highlight_playground::cli::CliArgs;
use highlight_playground::render::render_viewport;
use highlight_playground::store::{load_source, FileStore, MemoryStore, StateStore, SAMPLE_SOURCE};
use highlight_playground::{ChangePump, Editor, PlaygroundConfig};

fn main() -> Result<()> {
    highlight_playground::tracing::init();

    let args = CliArgs::parse();
    let config = match &args.config {
        Some(path) => PlaygroundConfig::load_from(path),
        None => PlaygroundConfig::load(),
    };

    if args.no_persist {
        run(&args, &config, MemoryStore::new())
    } else {
        let store = FileStore::open_default().context("Failed to open state file")?;
        run(&args, &config, store)
    }
}

fn run<S: StateStore>(args: &CliArgs, config: &PlaygroundConfig, mut store: S) -> Result<()> {
    let source = if args.reset {
        SAMPLE_SOURCE.to_string()
    } else {
        load_source(&store)
    };
    let rows = args.rows.unwrap_or(config.viewport_rows).max(1);
    let mut editor = Editor::with_viewport(&source, rows);

    let mut pump = ChangePump::from_config(config).inspect_err(|e| {
        tracing::error!("Cannot start highlighting: {:#}", e);
    })?;
    pump.start(&mut editor, Instant::now())?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        editor.append(&format!("{}\n", line));

        let now = Instant::now();
        pump.pump_events(&mut editor, now)?;
        pump.tick(&mut editor, &mut store, now);
    }

    // Input is done: run whatever is still scheduled instead of waiting
    while let Some(deadline) = pump.next_deadline() {
        pump.tick(&mut editor, &mut store, deadline);
    }
    tracing::debug!("Finished after {} parses", pump.parse_count());

    let mut stdout = io::stdout().lock();
    for row in render_viewport(&editor) {
        writeln!(stdout, "{}", row)?;
    }
    Ok(())
}
