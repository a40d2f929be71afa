//! # Frequency Table
//!
//! Maps every lowercase note spelling to its playback frequency in
//! hundredths of a hertz.
//!
//! ## Input Format
//! A header row followed by data rows. The `Note` and `Frequency` columns are
//! found by name; any other column is ignored.
//!
//! ```text
//! Note,Frequency
//! C4,261.63
//! C#4/Db4,277.18
//! ```
//!
//! A `Note` cell may list several enharmonic spellings separated by `/`; each
//! one becomes a key with the same frequency.
//!
//! ## Rests
//! `r` is reserved for rests and always maps to 0. Table rows cannot change it.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::BuzzError;
use crate::rows::{read_rows, Row};

/// Note name used for rests
pub const REST: &str = "r";

/// Note name to scaled (x100) frequency
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    entries: HashMap<String, u32>,
}

/// One table row: the spellings it defines and their shared frequency
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyEntry {
    pub aliases: Vec<String>,
    pub frequency: u32,
}

impl FrequencyTable {
    /// Build a table from the text of a frequency table file.
    pub fn parse(source: &str) -> Result<Self, BuzzError> {
        let rows = read_rows(source)
            .map_err(|(line, message)| BuzzError::TableLoad { line, message })?;
        let mut rows = rows.into_iter();

        let header = rows.next().ok_or_else(|| BuzzError::TableLoad {
            line: 1,
            message: "missing header row".to_string(),
        })?;
        let note_col = column(&header, "Note")?;
        let freq_col = column(&header, "Frequency")?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(parse_entry(&row, note_col, freq_col)?);
        }

        Ok(Self::from_entries(entries))
    }

    /// Build a table from already parsed entries.
    ///
    /// Aliases are matched without regard to case. Later entries overwrite
    /// earlier ones that share an alias.
    pub fn from_entries(entries: impl IntoIterator<Item = FrequencyEntry>) -> Self {
        let mut map: HashMap<String, u32> = HashMap::new();

        for entry in entries {
            for alias in entry.aliases {
                let alias = alias.to_lowercase();
                if alias == REST {
                    if entry.frequency != 0 {
                        warn!(
                            "Ignoring frequency {} for reserved rest note '{}'",
                            entry.frequency, REST
                        );
                    }
                    continue;
                }
                // Last write wins
                if let Some(previous) = map.insert(alias.clone(), entry.frequency) {
                    if previous != entry.frequency {
                        debug!(
                            "Note '{}' redefined: {} -> {}",
                            alias, previous, entry.frequency
                        );
                    }
                }
            }
        }

        map.insert(REST.to_string(), 0);
        Self { entries: map }
    }

    /// Look up a note spelling, ignoring case.
    pub fn get(&self, note: &str) -> Option<u32> {
        self.entries.get(&note.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true: the rest entry is always present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn column(header: &Row, name: &str) -> Result<usize, BuzzError> {
    header
        .fields
        .iter()
        .position(|f| f == name)
        .ok_or_else(|| BuzzError::TableLoad {
            line: header.line,
            message: format!("header has no '{}' column", name),
        })
}

fn parse_entry(row: &Row, note_col: usize, freq_col: usize) -> Result<FrequencyEntry, BuzzError> {
    let error = |message: String| BuzzError::TableLoad {
        line: row.line,
        message,
    };

    let (note, freq) = match (row.field(note_col), row.field(freq_col)) {
        (Some(note), Some(freq)) => (note, freq),
        _ => return Err(error(format!("expected at least {} fields", note_col.max(freq_col) + 1))),
    };

    if note.is_empty() {
        return Err(error("empty note name".to_string()));
    }

    let aliases = note
        .split('/')
        .map(|alias| {
            let alias = alias.trim();
            if alias.is_empty() {
                Err(error(format!("empty alias in '{}'", note)))
            } else {
                Ok(alias.to_string())
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let hz: f64 = freq
        .parse()
        .map_err(|_| error(format!("frequency '{}' is not a number", freq)))?;
    let frequency = scale_frequency(hz)
        .ok_or_else(|| error(format!("frequency '{}' is out of range", freq)))?;

    Ok(FrequencyEntry { aliases, frequency })
}

/// Hertz to hundredths of a hertz, rounding half to even.
fn scale_frequency(hz: f64) -> Option<u32> {
    if !hz.is_finite() || hz < 0.0 {
        return None;
    }
    let scaled = (hz * 100.0).round_ties_even();
    if scaled > u32::MAX as f64 {
        return None;
    }
    Some(scaled as u32)
}
