//! Tugboat CLI - build, install and package CMake libraries

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use tugboat::util::diagnostic;
use tugboat::util::shell::ColorChoice;
use tugboat::util::Shell;
use tugboat::Error;

fn main() {
    let cli = Cli::parse();

    let color = if cli.global.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let shell = Shell::from_flags(cli.global.quiet, cli.global.verbose, color);

    // Set up logging
    let filter = if cli.global.verbose {
        EnvFilter::new("tugboat=debug")
    } else if cli.global.quiet {
        EnvFilter::new("tugboat=error")
    } else {
        EnvFilter::new("tugboat=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(shell.use_color())
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run(cli, &shell) {
        report(&e, &shell);
        std::process::exit(1);
    }
}

fn run(cli: Cli, shell: &Shell) -> Result<()> {
    let global = &cli.global;
    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, global, shell),
        Commands::Build(args) => commands::build::execute(args, global, shell),
        Commands::Package(args) => commands::package::execute(args, global, shell),
        Commands::PublishInfo(args) => commands::publish_info::execute(args, global, shell),
        Commands::Create(args) => commands::create::execute(args, global, shell),
        Commands::Export(args) => commands::export::execute(args, global, shell),
        Commands::Inspect(args) => commands::inspect::execute(args, global, shell),
        Commands::Clean(args) => commands::clean::execute(args, global, shell),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print the context chain, then the domain error as a diagnostic if there is one.
fn report(err: &anyhow::Error, shell: &Shell) {
    let domain = err.chain().find_map(|e| e.downcast_ref::<Error>());

    match domain {
        Some(inner) => {
            for ctx in err.chain().take_while(|e| e.downcast_ref::<Error>().is_none()) {
                eprintln!("error: {}", ctx);
            }
            diagnostic::emit(&inner.to_diagnostic(), shell.use_color());
        }
        None => eprintln!("error: {:#}", err),
    }
}
