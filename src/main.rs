use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = match buzz::Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", buzz::BuzzError::from(e));
            return ExitCode::FAILURE;
        }
    };

    // Logs go to stderr; stdout carries only the melody line
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(cli.log_level())
        .init();

    match buzz::run(&cli) {
        Ok(line) => {
            println!("{}", line);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
