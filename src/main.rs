use log_supervisor::cli::Cli;
use log_supervisor::observability;
use log_supervisor::{Exit, ParentStreams, Supervisor, SupervisorError};

#[tokio::main]
async fn main() {
    let exit = run().await;
    // The only place the process terminates.
    std::process::exit(exit.code());
}

async fn run() -> Exit {
    let cli = match Cli::parse_from_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => {
            err.report();
            return Exit::from(&err);
        }
    };

    observability::logging::init();
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "log-supervisor starting");

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(err) => {
            let err = SupervisorError::from(err);
            err.report();
            return Exit::from(&err);
        }
    };

    tracing::debug!(
        log_path = %config.log.path.display(),
        log_mode = ?config.log.mode,
        chunk_size = config.relay.chunk_size,
        command = %config.command,
        "Configuration loaded"
    );

    Supervisor::new(config, ParentStreams::inherit()).run().await
}
