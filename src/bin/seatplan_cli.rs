//! CLI for seatplan - builds seating charts and attendance sheets
//!
//! Usage:
//!   seatplan_cli --rooms rooms.xlsx --rolls left.xlsx --rolls middle.xlsx
//!   seatplan_cli --rooms rooms.csv --rolls a.csv --rolls b.csv -o plan.xlsx --json

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use seatplan::export::save_xlsx;
use seatplan::pipeline::{plan_from_files, SeatingPlan};
use seatplan::{OutputLayout, Result, SeatplanConfig};

/// Exam seating chart and attendance sheet generator
#[derive(Parser, Debug)]
#[command(name = "seatplan_cli", version)]
#[command(about = "Seat roll-number lists into exam rooms and write an XLSX workbook", long_about = None)]
struct Cli {
    /// Room table (.xlsx, .csv or .tsv)
    #[arg(long)]
    rooms: PathBuf,

    /// Roll-number table, once per seat position in position order
    #[arg(long = "rolls", required = true)]
    rolls: Vec<PathBuf>,

    /// Output workbook (overrides the config file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Sheets to generate per room (overrides the config file)
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Worksheet of the room workbook to read (default: first)
    #[arg(long)]
    sheet: Option<String>,

    /// Fail when any roll list is shorter than its seat demand
    #[arg(long)]
    strict: bool,

    /// Also print the plan as JSON to stdout
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LayoutArg {
    GridWithRoster,
    GridOnly,
    AttendanceOnly,
}

impl From<LayoutArg> for OutputLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::GridWithRoster => Self::GridWithRoster,
            LayoutArg::GridOnly => Self::GridOnly,
            LayoutArg::AttendanceOnly => Self::AttendanceOnly,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    let plan = plan_from_files(
        &config,
        &cli.rooms,
        &cli.rolls,
        cli.sheet.as_deref(),
        |outcome, done, total| {
            eprintln!(
                "room {done}/{total} ({:.0}%): {}",
                outcome.progress * 100.0,
                outcome.assignment.room_id
            );
        },
    )?;
    report_supply(&plan);

    let workbook = plan.render(&config)?;
    save_xlsx(&workbook, &config.output)?;
    eprintln!("Wrote {}", config.output.display());

    if cli.json {
        let json = serde_json::to_string_pretty(&plan)?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{json}")?;
    }
    Ok(())
}

/// Config file (or defaults) with command-line overrides applied.
fn load_config(cli: &Cli) -> Result<SeatplanConfig> {
    let mut config = match &cli.config {
        Some(path) => SeatplanConfig::from_path(path)?,
        None => SeatplanConfig::default(),
    };
    if let Some(output) = &cli.output {
        config.output.clone_from(output);
    }
    if let Some(layout) = cli.layout {
        config.layout = layout.into();
    }
    config.strict_supply |= cli.strict;
    config.validate()?;
    Ok(config)
}

fn report_supply(plan: &SeatingPlan) {
    for supply in &plan.supply.positions {
        let position = supply.position + 1;
        if supply.shortfall() > 0 {
            log::warn!(
                "position {position}: {} seat(s) left unassigned ({} needed, {} supplied)",
                supply.shortfall(),
                supply.demand,
                supply.available
            );
        } else if supply.surplus() > 0 {
            log::warn!(
                "position {position}: {} roll number(s) not seated",
                supply.surplus()
            );
        }
    }
}
