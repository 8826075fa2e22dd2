//! `typed-unpack`: decode MessagePack (stdin) to JSON (stdout).

use std::io::{self, Read};
use std::process::ExitCode;

use clap::Parser;
use typed_pack::cli::{init_tracing, unpack, CliError};
use typed_pack::msgpack::{DecoderOptions, DuplicateKeys};

/// Decode one MessagePack value from stdin and print it as JSON.
#[derive(Parser)]
#[command(name = "typed-unpack", version, about)]
struct Cli {
    /// Fail when containers nest deeper than DEPTH
    #[arg(long, value_name = "DEPTH")]
    max_depth: Option<usize>,

    /// Fail when a map repeats a key instead of keeping both pairs
    #[arg(long)]
    reject_duplicate_keys: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(options: &DecoderOptions) -> Result<(), CliError> {
    let mut buf = Vec::new();
    io::stdin().read_to_end(&mut buf)?;
    println!("{}", unpack(&buf, options)?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = DecoderOptions {
        max_depth: cli.max_depth,
        duplicate_keys: if cli.reject_duplicate_keys {
            DuplicateKeys::Reject
        } else {
            DuplicateKeys::Append
        },
    };
    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
