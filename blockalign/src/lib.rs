use log::{LevelFilter, debug};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

pub mod build;
pub mod extract;
mod input;
mod render;
mod selectors;

fn init_logging(log_level: LevelFilter) {
    // a second subcommand in the same process keeps the first logger
    if TermLogger::init(
        log_level,
        Default::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .is_err()
    {
        debug!("Logger is already initialised");
    }
}
