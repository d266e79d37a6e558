use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use term_expose::config::{Cli, Config};
use term_expose::runner;
use term_expose::session::SessionOutcome;
use term_expose::{ExposeError, tracing_sub};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match try_main(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "overview failed");
            eprintln!("term-expose: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: &Cli) -> Result<SessionOutcome, ExposeError> {
    let config = Config::try_from(cli)?;
    tracing_sub::init(config.log_file.as_deref())?;
    runner::run(&config)
}
