//! Run one any-angle search on a catalogue scenario and print the path.
//!
//! Run: cargo run --bin anyangle -- [scenario] [theta|strict|subgoal]
//!
//! Set `RUST_LOG=debug` for search summaries.

use std::env;

use anyangle_demos::{Command, list, run, usage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let command = match Command::parse(env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", usage());
            std::process::exit(2);
        }
    };

    match command {
        Command::Help => println!("{}", usage()),
        Command::List => print!("{}", list()?),
        Command::Run {
            scenario,
            algorithm,
        } => print!("{}", run(&scenario, algorithm)?),
    }
    Ok(())
}
