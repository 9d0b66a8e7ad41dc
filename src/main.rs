use clap::Parser;
use coinsh::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
