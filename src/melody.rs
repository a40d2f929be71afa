//! # Melody Encoding
//!
//! Resolves sheet events against a frequency table and serializes them into
//! the single command line the buzzer driver accepts:
//!
//! ```text
//! music 26163:0x4,0:0x2
//! ```
//!
//! Each step is `<frequency x100>:0x<duration mask>`, steps are joined with
//! `,`. The same format can be read back with [`Melody::from_str`], which is
//! how the driver consumes it.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::duration::DurationMask;
use crate::error::BuzzError;
use crate::sheet::SheetEvent;
use crate::table::FrequencyTable;

/// Command word the driver expects before the step list
pub const COMMAND: &str = "music";

/// One encoded note or rest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedStep {
    /// Hundredths of a hertz, 0 for a rest
    pub frequency: u32,
    pub mask: DurationMask,
}

impl fmt::Display for EncodedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:0x{:x}", self.frequency, self.mask)
    }
}

impl FromStr for EncodedStep {
    type Err = BuzzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segment = s.trim();
        let malformed = || BuzzError::Decode(format!("bad step '{}'", segment));

        let (freq, mask) = segment.split_once(':').ok_or_else(malformed)?;
        let mask = mask.trim();
        let hex = mask
            .strip_prefix("0x")
            .or_else(|| mask.strip_prefix("0X"))
            .unwrap_or(mask);

        Ok(EncodedStep {
            frequency: freq.trim().parse().map_err(|_| malformed())?,
            mask: DurationMask::from_bits(u8::from_str_radix(hex, 16).map_err(|_| malformed())?),
        })
    }
}

/// A fully encoded melody, in playback order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Melody {
    pub steps: Vec<EncodedStep>,
}

impl Melody {
    /// Resolve and encode every event. The first unknown note aborts the
    /// whole melody.
    pub fn compile(table: &FrequencyTable, events: &[SheetEvent]) -> Result<Self, BuzzError> {
        let steps = events
            .iter()
            .map(|event| -> Result<EncodedStep, BuzzError> {
                let frequency = table.get(&event.note).ok_or_else(|| BuzzError::UnknownNote {
                    line: event.line,
                    note: event.note.clone(),
                })?;
                Ok(EncodedStep {
                    frequency,
                    mask: event.duration.mask(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Encoded {} steps", steps.len());
        Ok(Melody { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The step list without the command word
    pub fn payload(&self) -> String {
        self.steps
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Total playback length in milliseconds at `tempo` quarter notes per minute
    pub fn length_ms(&self, tempo: u32) -> u64 {
        self.steps
            .iter()
            .map(|step| u64::from(step.mask.length_ms(tempo)))
            .sum()
    }
}

impl fmt::Display for Melody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", COMMAND, self.payload())
    }
}

impl FromStr for Melody {
    type Err = BuzzError;

    /// Parse a melody line, with or without the leading `music` word.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let payload = match line.strip_prefix(COMMAND) {
            Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
            _ => line,
        };

        if payload.is_empty() {
            return Ok(Melody::default());
        }

        let steps = payload
            .split(',')
            .map(EncodedStep::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Melody { steps })
    }
}
