use analyzer::main::Analyzer;
use analyzer::render::AnalyzerApp;
use config::{Config, CONFIG_FILE_NAME};
use eframe::egui;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use predictor::impl_fake::PredictorFake;
use std::path::Path;
use std::sync::Arc;

mod analyzer;
mod config;
mod error;
mod export;
mod history;
mod library;
mod locale;
mod predictor;
mod upload;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(Path::new(CONFIG_FILE_NAME))?;

    let logger = Arc::new(LoggerConsole::new(config.logger_timezone));

    let predictor = Arc::new(PredictorFake::new(logger.clone(), config.analysis_latency));

    let analyzer = Analyzer::new(config.clone(), logger.clone(), predictor);

    let app = AnalyzerApp::new(config, analyzer);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1180.0, 780.0])
            .with_min_inner_size([820.0, 560.0]),
        ..Default::default()
    };

    let _ = logger.info("Starting Medical Vision Lab");

    eframe::run_native(
        "Medical Vision Lab",
        options,
        Box::new(|_cc| Box::new(app)),
    )
    .map_err(|e| e.to_string())?;

    Ok(())
}
