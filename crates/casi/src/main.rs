mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use casi_core::Controller;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // Config and completions don't need a service connection.
    match &cli.command {
        Some(Command::Config(args)) => return commands::config_cmd::handle(args, &cli.global),
        Some(Command::Completions(args)) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "casi", &mut std::io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let config::Resolved {
        service,
        profile_name,
        output,
        color,
    } = config::resolve(&cli.global)?;

    let ctx = commands::RenderCtx {
        output,
        color,
        quiet: cli.global.quiet,
    };
    let controller = Controller::new(service.into_service()?);

    tracing::debug!(profile = %profile_name, command = ?cli.command, "dispatching");

    match cli.command {
        None => commands::menu::run(&controller, &profile_name, &ctx).await,
        Some(Command::Data(args)) => commands::data::handle(&controller, &args, false, &ctx).await,
        Some(Command::Refresh(args)) => {
            commands::data::handle(&controller, &args, true, &ctx).await
        }
        Some(Command::Stats(args)) => commands::stats::handle(&controller, &args, &ctx).await,
        Some(Command::Config(_) | Command::Completions(_)) => Ok(()),
    }
}
