//! Music sheet loading: headerless `note,duration` rows in playback order.

use crate::duration::DurationValue;
use crate::error::BuzzError;
use crate::rows::read_rows;

/// One note (or rest) of the sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetEvent {
    pub line: usize,
    /// Note spelling as written in the sheet
    pub note: String,
    pub duration: DurationValue,
}

/// Parse the text of a music file.
///
/// Every row must have exactly a note and a duration. Durations are compiled
/// here so a bad cell fails the load before any note is resolved.
pub fn parse_sheet(source: &str) -> Result<Vec<SheetEvent>, BuzzError> {
    let rows = read_rows(source)
        .map_err(|(line, message)| BuzzError::SheetLoad { line, message })?;

    if rows.is_empty() {
        return Err(BuzzError::SheetLoad {
            line: 1,
            message: "music file contains no notes".to_string(),
        });
    }

    rows.into_iter()
        .map(|row| -> Result<SheetEvent, BuzzError> {
            let line = row.line;
            let [note, duration]: [String; 2] =
                row.fields.try_into().map_err(|fields: Vec<String>| {
                    BuzzError::SheetLoad {
                        line,
                        message: format!("expected 2 fields (note,duration), found {}", fields.len()),
                    }
                })?;

            if note.is_empty() {
                return Err(BuzzError::SheetLoad {
                    line,
                    message: "missing note".to_string(),
                });
            }
            if duration.is_empty() {
                return Err(BuzzError::SheetLoad {
                    line,
                    message: format!("missing duration for note '{}'", note),
                });
            }

            Ok(SheetEvent {
                line,
                duration: DurationValue::parse(&duration, line)?,
                note,
            })
        })
        .collect()
}
