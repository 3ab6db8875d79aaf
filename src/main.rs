use clap::Parser;
use clean_folder::cli::{Cli, run_cli};
use clean_folder::output::OutputFormatter;
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_cli(&cli) {
        OutputFormatter::error(&format!("Error: {}", e));
        process::exit(1);
    }
}
