use clap::Parser;
use colored::*;
use std::process::ExitCode;
use swaplang::{run, Config};

fn main() -> ExitCode {
    let config = Config::parse();

    match run(&config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
