//! # Duration Compiler
//!
//! Turns one duration cell of a music file into the 8-bit mask the buzzer
//! driver understands.
//!
//! ## Cell Syntax
//! - `4` - a single figure: the denominator of the note (1 = whole,
//!   4 = quarter, 64 = sixty-fourth)
//! - `4+8` - figures added together (a quarter tied to an eighth, or a
//!   dotted quarter)
//! - `t8` / `t4+8` - a leading `t` marks the note as part of a triplet
//!
//! ## Mask Layout
//! Bits 0-6 hold the OR of all figures, so each figure must be a power of
//! two for the driver to read it back. Bit 7 is the triplet flag and is never
//! touched by the figures.
//!
//! ```rust
//! use buzz::DurationValue;
//!
//! let value = DurationValue::parse("t4+8", 1)?;
//! assert_eq!(value.mask().bits(), 0x8c);
//! # Ok::<(), buzz::BuzzError>(())
//! ```

use std::fmt;
use std::num::IntErrorKind;

use crate::error::BuzzError;

/// Longest figure a duration may name (a sixty-fourth note)
pub const MAX_FIGURE: i64 = 64;

const TRIPLET_BIT: u8 = 1 << 7;
const FIGURE_BITS: u8 = !TRIPLET_BIT;

/// A parsed duration cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DurationValue {
    /// A bare integer figure
    Literal(u8),
    /// A `t`-prefixed and/or `+`-joined list of figures
    Expression { triplet: bool, terms: Vec<u8> },
}

impl DurationValue {
    /// Parse a duration cell. `line` is only used for error reporting.
    ///
    /// The whole cell is tried as an integer first; anything else is read as
    /// an expression.
    pub fn parse(cell: &str, line: usize) -> Result<Self, BuzzError> {
        let cell = cell.trim();

        if let Some(value) = parse_integer(cell) {
            return Ok(DurationValue::Literal(check_range(value, line)?));
        }

        let (triplet, rest) = match cell.strip_prefix('t') {
            Some(rest) => (true, rest),
            None => (false, cell),
        };

        // A lone `t` carries no figures
        if rest.trim().is_empty() {
            return Ok(DurationValue::Expression {
                triplet,
                terms: Vec::new(),
            });
        }

        let terms = rest
            .split('+')
            .map(|token| parse_term(token, line))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DurationValue::Expression { triplet, terms })
    }

    pub fn mask(&self) -> DurationMask {
        match self {
            DurationValue::Literal(code) => DurationMask(*code),
            DurationValue::Expression { triplet, terms } => {
                let figures = terms.iter().fold(0u8, |acc, term| acc | term);
                let flag = if *triplet { TRIPLET_BIT } else { 0 };
                DurationMask(flag | (figures & FIGURE_BITS))
            }
        }
    }
}

fn parse_term(token: &str, line: usize) -> Result<u8, BuzzError> {
    let token = token.trim();
    let value = parse_integer(token).ok_or_else(|| BuzzError::DurationFormat {
        line,
        token: token.to_string(),
    })?;
    check_range(value, line)
}

/// Parse an integer, saturating values too large for `i64` so they still
/// report as out of range rather than malformed.
fn parse_integer(token: &str) -> Option<i64> {
    match token.parse::<i64>() {
        Ok(value) => Some(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

fn check_range(value: i64, line: usize) -> Result<u8, BuzzError> {
    if (1..=MAX_FIGURE).contains(&value) {
        Ok(value as u8)
    } else {
        Err(BuzzError::DurationRange { line, value })
    }
}

/// Encoded duration of one melody step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DurationMask(u8);

impl DurationMask {
    pub fn from_bits(bits: u8) -> Self {
        DurationMask(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_triplet(self) -> bool {
        self.0 & TRIPLET_BIT != 0
    }

    /// The figures encoded in bits 0-6, shortest value first
    pub fn figures(self) -> impl Iterator<Item = u8> {
        let bits = self.0 & FIGURE_BITS;
        (0..7).map(|i| 1u8 << i).filter(move |f| bits & f != 0)
    }

    /// How long the driver holds this step, in milliseconds, at `tempo`
    /// quarter notes per minute.
    ///
    /// Each figure lasts a whole note (240000 ms / tempo) divided by the
    /// figure; triplet figures are stretched to 3/2 of their denominator.
    /// Integer division at every step mirrors the driver.
    pub fn length_ms(self, tempo: u32) -> u32 {
        if tempo == 0 {
            return 0;
        }
        let triplet = self.is_triplet();
        // figure is at most 96, so the product fits in u64 for any u32 tempo
        let total: u64 = self
            .figures()
            .map(|figure| {
                let figure = u64::from(figure);
                let figure = if triplet { figure * 3 / 2 } else { figure };
                240_000 / (u64::from(tempo) * figure)
            })
            .sum();
        // At most seven figures of 240000 ms each
        total as u32
    }
}

impl fmt::LowerHex for DurationMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
