//! `typed-pack`: encode JSON (stdin) to MessagePack (stdout).

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use typed_pack::cli::{init_tracing, pack, CliError};

/// Encode a JSON document from stdin as MessagePack on stdout.
#[derive(Parser)]
#[command(name = "typed-pack", version, about)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run() -> Result<(), CliError> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    let bytes = pack(buf.trim())?;
    io::stdout().write_all(&bytes)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
