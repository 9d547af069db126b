use clap::Parser;
use smartmoney::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
