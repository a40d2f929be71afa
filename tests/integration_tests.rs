//! Integration tests for buzz
//!
//! Drives the full pipeline from files on disk to the melody line.

use std::fs;
use std::path::PathBuf;

use buzz::{compile, run, BuzzError, Cli, Melody};
use clap::Parser;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const TABLE: &str = "Note,Frequency
C4,261.63
C#4/Db4,277.18
D4,293.66
E4,329.63
r,0
";

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn cli(dir: &TempDir, table: &str, sheet: &str, extra: &[&str]) -> Cli {
    let table = write(dir, "freqs.csv", table);
    let sheet = write(dir, "song.csv", sheet);
    let mut args = vec![
        "buzz".to_string(),
        table.display().to_string(),
        sheet.display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn test_end_to_end() {
    let line = compile("Note,Frequency\nc,261.63\nr,0\n", "c,4\nr,2\n").unwrap();
    assert_eq!(line, "music 26163:0x4,0:0x2");
}

#[test]
fn test_end_to_end_triplet() {
    let line = compile("Note,Frequency\nc,261.63\nr,0\n", "c,t8+16\n").unwrap();
    assert_eq!(line, "music 26163:0x98");
}

#[test]
fn test_run_from_files() {
    let dir = TempDir::new().unwrap();
    let cli = cli(&dir, TABLE, "C4,4\nDb4,8\nc#4,8\nr,2\nE4,4+8\nd4,t8\n", &[]);
    let line = run(&cli).unwrap();
    assert_eq!(
        line,
        "music 26163:0x4,27718:0x8,27718:0x8,0:0x2,32963:0xc,29366:0x88"
    );
}

#[test]
fn test_deterministic() {
    let sheet = "C4,4\nD4,t4+8\nE4,2\nr,4\n";
    let first = compile(TABLE, sheet).unwrap();
    for _ in 0..5 {
        assert_eq!(compile(TABLE, sheet).unwrap(), first);
    }
}

#[test]
fn test_rest_without_table_entry() {
    let line = compile("Note,Frequency\nA4,440\n", "a4,4\nR,4\n").unwrap();
    assert_eq!(line, "music 44000:0x4,0:0x4");
}

#[test]
fn test_unknown_note_aborts() {
    let result = compile(TABLE, "C4,4\nF4,4\nC4,4\n");
    assert!(matches!(result, Err(BuzzError::UnknownNote { line: 2, .. })));
}

#[test]
fn test_range_error_aborts() {
    assert!(matches!(
        compile(TABLE, "C4,4\nD4,65\n"),
        Err(BuzzError::DurationRange { line: 2, value: 65 })
    ));
    assert!(matches!(
        compile(TABLE, "C4,4+65\n"),
        Err(BuzzError::DurationRange { value: 65, .. })
    ));
}

#[test]
fn test_format_error_aborts() {
    assert!(matches!(
        compile(TABLE, "C4,4+eighth\n"),
        Err(BuzzError::DurationFormat { .. })
    ));
}

#[test]
fn test_output_decodes() {
    let line = compile(TABLE, "C4,4\nD4,t4+8\nr,16\n").unwrap();
    let melody: Melody = line.parse().unwrap();
    assert_eq!(melody.len(), 3);
    assert_eq!(melody.steps[1].frequency, 29366);
    assert!(melody.steps[1].mask.is_triplet());
    assert_eq!(melody.to_string(), line);
}

#[test]
fn test_config_enforces_limits() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "buzz.yaml", "max-steps: 2\nenforce-limits: true\n");
    let config = config.display().to_string();
    let cli = cli(&dir, TABLE, "C4,4\nD4,4\nE4,4\n", &["--config", &config]);
    assert!(matches!(run(&cli), Err(BuzzError::LimitExceeded(_))));
}

#[test]
fn test_config_warns_by_default() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "buzz.yaml", "max-steps: 2\n");
    let config = config.display().to_string();
    let cli = cli(&dir, TABLE, "C4,4\nD4,4\nE4,4\n", &["-c", &config]);
    assert_eq!(run(&cli).unwrap(), "music 26163:0x4,29366:0x4,32963:0x4");
}

#[test]
fn test_missing_music_file() {
    let dir = TempDir::new().unwrap();
    let table = write(&dir, "freqs.csv", TABLE);
    let missing = dir.path().join("missing.csv");
    let cli = Cli::try_parse_from([
        "buzz".to_string(),
        table.display().to_string(),
        missing.display().to_string(),
    ])
    .unwrap();
    match run(&cli) {
        Err(BuzzError::Io { what, path, .. }) => {
            assert_eq!(what, "music file");
            assert_eq!(path, missing);
        }
        other => panic!("Expected Io, got {:?}", other),
    }
}

#[test]
fn test_table_with_byte_order_mark() {
    let line = compile("\u{feff}Note,Frequency\nc,261.63\n", "c,4\n").unwrap();
    assert_eq!(line, "music 26163:0x4");
}
