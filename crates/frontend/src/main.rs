use clap::Parser;
use cobalt_frontend::{
    cli::{Cli, Command},
    commands,
};
use tracing_subscriber::EnvFilter;

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    match cli.command() {
        Command::Check(args) => {
            init_logging(args.verbose);
            commands::check(args)?
        }
    }

    Ok(())
}

/// Installs the global log subscriber. `RUST_LOG` takes precedence over the verbosity flag.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
