use anyhow::Result;
use clap::Parser;
use dircmp::cli::Cli;
use dircmp::compare::tally;
use dircmp::output::{self, Verbosity};
use dircmp::ui::{self, ExitReason, render};
use dircmp::{CompareContext, logging};
use std::process;

fn main() {
    match run() {
        Ok(ExitReason::Quit) => {}
        Ok(ExitReason::Interrupted) => {
            output::info("\nInterrupted by user");
            process::exit(1);
        }
        Err(e) => {
            output::error(&format!("Error: {e:#}"));
            process::exit(1);
        }
    }
}

fn run() -> Result<ExitReason> {
    let cli = Cli::parse();

    if cli.verbose {
        output::set_verbosity(Verbosity::Verbose);
    }
    if let Err(e) = logging::init(cli.verbose) {
        output::warning(&format!("Logging disabled: {e:#}"));
    }

    let context = CompareContext::new(&cli.left_dir, &cli.right_dir, cli.config.as_deref())?;

    output::info("Scanning directories...");
    let mut controller = context.controller();
    if output::get_verbosity() == Verbosity::Verbose {
        output::summary(controller.results().len(), &tally(controller.results()));
    }

    let help = render::help_lines(&controller.tools().merge_tool_names());
    ui::run(&mut controller, &help)
}
