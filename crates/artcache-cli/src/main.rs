use artcache_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Initialize logging as early as possible; stderr if the state dir is unusable.
    match logging::init_logging() {
        Ok(path) => tracing::debug!("logging to {}", path.display()),
        Err(e) => {
            logging::init_logging_stderr();
            tracing::warn!("file logging unavailable ({:#}); logging to stderr", e);
        }
    }
    let _process = logging::enter_process_span();

    if let Err(err) = CliCommand::run_from_args() {
        tracing::error!("{:#}", err);
        eprintln!("artcache error: {:#}", err);
        std::process::exit(1);
    }
}
