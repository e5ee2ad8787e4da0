//! SlotRouter CLI
//!
//! CLI tool for checking route tables and replaying navigations.

mod simulate;
mod table;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use env_logger::{Builder, Target};
use log::LevelFilter;

use sr_compiler::analyze_table;

use crate::simulate::{describe_redirect, match_fragment, simulate, Step};
use crate::table::{compile_table, load_table};

#[derive(Parser)]
#[command(name = "sr-cli")]
#[command(about = "SlotRouter route table tools")]
struct Cli {
    /// Debug logging (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile and lint a route table
    Check {
        /// Route table (.toml or .json)
        table: PathBuf,

        /// Fail when the lint pass reports anything
        #[arg(long)]
        deny_warnings: bool,
    },

    /// Match a fragment against a route table
    Match {
        /// Route table (.toml or .json)
        table: PathBuf,

        /// Location fragment, with or without the leading '#'
        fragment: String,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Mount a router on an in-memory location and replay navigations
    Simulate {
        /// Route table (.toml or .json)
        table: PathBuf,

        /// Fragment the location starts at
        #[arg(short, long, default_value = "")]
        initial: String,

        /// Paths to navigate to; ':back' and ':forward' move through history
        steps: Vec<String>,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logger(verbose: bool) {
    if std::env::var("RUST_LOG").is_ok() {
        env_logger::init();
        return;
    }

    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    Builder::new().target(Target::Stderr).filter_level(level).init();
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = match cli.command {
        Commands::Check { table, deny_warnings } => cmd_check(&table, deny_warnings),
        Commands::Match { table, fragment, json } => cmd_match(&table, &fragment, json),
        Commands::Simulate {
            table,
            initial,
            steps,
            json,
        } => cmd_simulate(&table, &initial, &steps, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_check(path: &Path, deny_warnings: bool) -> Result<(), String> {
    let table = load_table(path)?;
    let report = analyze_table(&table);
    let compiled = compile_table(&table)?;

    println!("Route table '{}' is valid", path.display());
    println!("  Slots:       {}", report.slots);
    println!("  Routes:      {}", report.routes);
    println!("  Home path:   {}", compiled.home_path.as_deref().unwrap_or("(none)"));
    println!(
        "  Not found:   {}",
        compiled.not_found.as_ref().map_or("(none)", |view| view.0.as_str())
    );
    println!("  Deep links:  {:?}", compiled.deep_link_restore);

    for (slot, ids) in compiled.views.slots().iter().enumerate() {
        println!();
        println!("Slot {} ({}):", slot, table.slot_label(slot));
        for (index, id) in ids.iter().enumerate() {
            if let Some(route) = compiled.views.route(*id) {
                println!("  {}.{}  {:<18} {}", slot, index, route.view().0, route.pattern());
            }
        }
    }

    if !report.is_clean() {
        println!();
        println!("Warnings:");
        for warning in &report.warnings {
            println!("  {warning}");
        }
        if deny_warnings {
            return Err(format!("{} lint warnings", report.warnings.len()));
        }
    }

    Ok(())
}

fn cmd_match(path: &Path, fragment: &str, json: bool) -> Result<(), String> {
    let table = load_table(path)?;
    let compiled = compile_table(&table)?;
    let report = match_fragment(&compiled, fragment)?;

    if json {
        let out = serde_json::to_string_pretty(&report).map_err(|e| format!("Failed to encode JSON: {}", e))?;
        println!("{out}");
        return Ok(());
    }

    println!("Fragment:      {}", report.fragment);
    println!("Pathname:      {}", report.pathname);
    println!("Key:           {}", report.key);
    println!("View:          {}", report.view.as_deref().unwrap_or("(none)"));
    println!("URL params:    {}", report.url_params);
    println!("Query params:  {}", report.query_params);

    Ok(())
}

fn cmd_simulate(path: &Path, initial: &str, steps: &[String], json: bool) -> Result<(), String> {
    let table = load_table(path)?;
    let compiled = compile_table(&table)?;
    let steps: Vec<Step> = steps.iter().map(|step| Step::parse(step)).collect();
    let (redirect, reports) = simulate(compiled, initial, &steps)?;

    if json {
        let out = serde_json::to_string_pretty(&reports).map_err(|e| format!("Failed to encode JSON: {}", e))?;
        println!("{out}");
        return Ok(());
    }

    println!("Mounted at '{}': {}", initial, describe_redirect(&redirect));
    for report in &reports {
        println!();
        println!("{} -> #{} (history {})", report.step, report.location, report.history_len);
        if report.views.is_empty() {
            println!("  (no views)");
        }
        for view in &report.views {
            let marker = if view.focused { '*' } else { ' ' };
            println!("{} [{}] {}", marker, view.key, view.output);
        }
    }

    Ok(())
}
