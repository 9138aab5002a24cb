use clap::Parser;
use std::process::ExitCode;
use tidybox::cli::{Cli, run};
use tidybox::output::OutputFormatter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        OutputFormatter::error(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
