//! authkeys - manage SSH authorized_keys entries

use clap::{CommandFactory, Parser};
use clap_complete::env::CompleteEnv;

use authkeys::cli::exit_code::ExitCode;
use authkeys::cli::{Cli, Commands, commands};

fn main() -> std::process::ExitCode {
    // Handle dynamic shell completion if COMPLETE env var is set
    CompleteEnv::with_factory(Cli::command).complete();

    let cli = Cli::parse();

    authkeys::logging::init(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Apply(args) => commands::apply::execute(args, cli.config),
        Commands::List(args) => commands::list::execute(args, cli.config),
        Commands::Config(args) => commands::config::execute(args, cli.config),
        Commands::Version => commands::version::execute(cli.verbose),
        Commands::Completion(args) => commands::completion::execute(args),
    };

    match result {
        Ok(()) => ExitCode::Success.into(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::for_error(&e).into()
        }
    }
}
