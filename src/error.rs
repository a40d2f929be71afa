//! # Error Types
//!
//! Every failure in buzz is fatal: a run either prints one complete melody
//! line or prints nothing and exits non-zero.
//!
//! Errors that come from an input row carry the 1-based line number of that
//! row so the user can find it in the file.
//!
//! ## Usage
//! ```rust
//! use buzz::{compile, BuzzError};
//!
//! let table = "Note,Frequency\nC,261.63\n";
//! match compile(table, "c,65\n") {
//!     Ok(line) => println!("{}", line),
//!     Err(BuzzError::DurationRange { line, value }) => {
//!         eprintln!("Line {}: duration {} is too long", line, value);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuzzError {
    /// The command line did not name exactly a frequency table and a music file.
    #[error("{usage}")]
    ArgumentCount { usage: String },

    /// An input file could not be read.
    #[error("Error when opening {what} '{}': {source}", .path.display())]
    Io {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The frequency table is malformed.
    ///
    /// # Example
    /// ```
    /// # use buzz::BuzzError;
    /// let err = BuzzError::TableLoad {
    ///     line: 3,
    ///     message: "frequency 'abc' is not a number".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Frequency table error at line 3: frequency 'abc' is not a number"
    /// );
    /// ```
    #[error("Frequency table error at line {line}: {message}")]
    TableLoad { line: usize, message: String },

    /// The music sheet is malformed.
    #[error("Music file error at line {line}: {message}")]
    SheetLoad { line: usize, message: String },

    /// A sheet row names a note the frequency table does not define.
    #[error("Unknown note '{note}' at line {line}")]
    UnknownNote { line: usize, note: String },

    /// A duration term is not an integer.
    #[error("Wrong duration format at line {line}: '{token}' is not an integer")]
    DurationFormat { line: usize, token: String },

    /// A duration value or term falls outside 1..=64.
    #[error("Note duration at line {line} must be between 1 and 64, got {value}")]
    DurationRange { line: usize, value: i64 },

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The melody does not fit the playback target.
    #[error("Melody exceeds target limits: {0}")]
    LimitExceeded(String),

    /// An encoded melody line could not be parsed back.
    #[error("Malformed melody line: {0}")]
    Decode(String),
}

impl From<clap::Error> for BuzzError {
    fn from(err: clap::Error) -> Self {
        BuzzError::ArgumentCount {
            usage: err.render().to_string().trim_end().to_string(),
        }
    }
}
