//! Command-line front end for searching a gifts and hospitality index.

use std::io::Write;
use std::process;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use giftsearch::cli::args::GiftSearchArgs;
use giftsearch::cli::commands::execute_command;

/// Map `-q`/`-v` to a log filter; warnings are shown by default.
fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

fn main() {
    let args = GiftSearchArgs::parse();

    Builder::new()
        .filter_level(level_for(args.verbosity()))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
