//! pathviz: watch A* find its way across a grid in the terminal.

use std::process::ExitCode;

use pathviz_app::{App, AppConfig, VizConfig, Visualizer, logger};
use pathviz_crossterm::CrosstermDriver;

const USAGE: &str = "usage: pathviz [--rows N] [--width COLS] [--delay MS] [--density P] \
                     [--seed N] [--log FILE] [--log-level LEVEL]";

fn main() -> ExitCode {
    let config = match VizConfig::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("pathviz: {e}\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pathviz: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: VizConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &config.log_file {
        logger::init(path, config.log_level)?;
    }
    log::info!("pathviz {} starting: {config:?}", env!("CARGO_PKG_VERSION"));
    let model = Visualizer::new(config);
    let (width, height) = model.screen_size();
    let mut app = App::new(AppConfig {
        model,
        driver: CrosstermDriver::new(),
        width,
        height,
    });
    app.run()
}
