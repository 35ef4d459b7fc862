mod cli;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or_else(|| Commands::Run(Default::default()));
    let pause_on_error = matches!(&command, Commands::Run(args) if cli::run::pauses(args));
    let result = match command {
        Commands::Run(args) => cli::run::run(&args),
        Commands::Rules { source } => cli::rules::list(&source),
        Commands::Files { source } => cli::files::list(&source),
        Commands::Classify {
            description,
            source,
        } => cli::classify::run(&description, &source),
        Commands::Summary(args) => cli::summary::run(&args.source, &args.filter()),
        Commands::Config { settings, save } => cli::config::run(&settings, save),
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "Error:".red().bold());
        if pause_on_error {
            cli::run::wait_for_enter(cli::run::EXIT_PROMPT);
        }
        std::process::exit(e.exit_code());
    }
}
