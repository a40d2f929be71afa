pub mod cli;
pub mod config;
pub mod duration;
pub mod error;
pub mod melody;
pub mod rows;
pub mod sheet;
pub mod table;

pub use cli::{run, Cli};
pub use config::Config;
pub use duration::{DurationMask, DurationValue};
pub use error::*;
pub use melody::{EncodedStep, Melody};
pub use sheet::{parse_sheet, SheetEvent};
pub use table::{FrequencyEntry, FrequencyTable};

/// Compile a frequency table and a music sheet into a melody line.
/// This is the main entry point for the library.
///
/// ```rust
/// let table = "Note,Frequency\nc,261.63\nr,0\n";
/// let line = buzz::compile(table, "c,4\nr,2\n")?;
/// assert_eq!(line, "music 26163:0x4,0:0x2");
/// # Ok::<(), buzz::BuzzError>(())
/// ```
pub fn compile(table_source: &str, sheet_source: &str) -> Result<String, BuzzError> {
    let table = FrequencyTable::parse(table_source)?;
    let events = parse_sheet(sheet_source)?;
    Ok(Melody::compile(&table, &events)?.to_string())
}
