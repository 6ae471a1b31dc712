mod bootstrap;
mod gameplay;
mod loop_runner;
mod menu;
mod scenes;
mod tuning;

use std::process::ExitCode;

use tracing::error;

pub(crate) fn run() -> ExitCode {
    bootstrap::init_tracing();
    match bootstrap::build_app(std::env::args().skip(1)) {
        Ok(app) => loop_runner::run(app),
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}
