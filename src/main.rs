mod app;
mod cli;
mod core;
mod models;
mod system;
mod utils;

use crate::app::App;
use crate::cli::Args;
use crate::core::actions::Action;
use clap::Parser;
use crossterm::style::Stylize;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    utils::logging::init_logging()?;

    let mut app = App::new(args.settings);
    let action = Action::from(args.command);
    let outcome = app.execute_action(action);

    if outcome.success {
        println!("{}", outcome.message.green());
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{}", outcome.message.red());
        Ok(ExitCode::FAILURE)
    }
}
