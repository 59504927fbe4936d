use clap::Parser;
use setup_actionlint_core::{config, logging, workflow};

mod cli;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();

    let cfg = match config::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => {
            workflow::set_failed(&format!("{:#}", err));
            std::process::exit(1);
        }
    };

    // Initialize logging as early as possible; a bad log file is not fatal.
    let log_file = cli.log_file.as_deref().or(cfg.log_file.as_deref());
    if let Err(err) = logging::init_logging(log_file) {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }
    tracing::debug!("loaded config: {:?}", cfg);

    if let Err(err) = cli.command.run(&cfg) {
        tracing::error!("{:#}", err);
        workflow::set_failed(&format!("{:#}", err));
        std::process::exit(1);
    }
}
