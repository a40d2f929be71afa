//! Command-line interface and the fallible entry point behind `main`.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, Level};

use crate::config::Config;
use crate::error::BuzzError;
use crate::melody::Melody;
use crate::sheet::parse_sheet;
use crate::table::FrequencyTable;

/// Compile a music sheet into a buzzer melody line
#[derive(Parser, Debug)]
#[command(name = "buzz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Frequency table (CSV with `Note` and `Frequency` columns)
    pub frequency_table: PathBuf,

    /// Music sheet (headerless CSV of note,duration rows)
    pub music_file: PathBuf,

    /// YAML file with target limits and tempo
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }
}

fn read_input(what: &'static str, path: &Path) -> Result<String, BuzzError> {
    fs::read_to_string(path).map_err(|source| BuzzError::Io {
        what,
        path: path.to_path_buf(),
        source,
    })
}

/// Load both inputs, compile them and return the melody line (without the
/// trailing newline).
pub fn run(cli: &Cli) -> Result<String, BuzzError> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let table = FrequencyTable::parse(&read_input("frequency table", &cli.frequency_table)?)?;
    info!(
        "Loaded {} note spellings from {}",
        table.len(),
        cli.frequency_table.display()
    );

    let events = parse_sheet(&read_input("music file", &cli.music_file)?)?;
    let melody = Melody::compile(&table, &events)?;
    config.check_limits(&melody)?;

    info!(
        "Compiled {} steps, {} ms at {} bpm",
        melody.len(),
        melody.length_ms(config.tempo),
        config.tempo
    );

    Ok(melody.to_string())
}
