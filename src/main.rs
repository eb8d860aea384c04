use anyhow::Result;
use clap::Parser;
use composebox::cli::{self, Cli};
use composebox::domain::GroupMembershipError;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs vão para stderr: stdout pertence ao orquestrador.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli::run(cli.command, &cli.config_dir) {
        // The orchestrator's exit code is the CLI's exit code.
        Ok(code) if code != 0 => std::process::exit(code),
        Ok(_) => Ok(()),
        // Pre-flight failure gets its own exit code, distinct from anything
        // the orchestrator would have produced.
        Err(err) if err.is::<GroupMembershipError>() => {
            eprintln!("Erro: {err}");
            std::process::exit(2);
        }
        Err(err) => Err(err),
    }
}
