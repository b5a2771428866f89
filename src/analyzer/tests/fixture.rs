use crate::analyzer::main::Analyzer;
use crate::config::Config;
use crate::library::logger::{impl_console::LoggerConsole, interface::Logger};
use crate::predictor::{impl_fake::PredictorFake, interface::Predictor};
use crate::upload::file_input::FileInput;
use crate::upload::image_meta::{FileMeta, UploadedImage};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[allow(dead_code)]
pub struct Fixture {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub predictor: Arc<dyn Predictor + Send + Sync>,
    pub analyzer: Analyzer,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(Self::fast_config())
    }

    pub fn fast_config() -> Config {
        Config {
            tick_rate: Duration::from_millis(10),
            progress_tick_rate: Duration::from_millis(5),
            analysis_latency: Duration::from_millis(60),
            report_dir: std::env::temp_dir(),
            ..Config::default()
        }
    }

    pub fn with_config(config: Config) -> Self {
        let logger: Arc<dyn Logger + Send + Sync> =
            Arc::new(LoggerConsole::new(config.logger_timezone));
        let predictor: Arc<dyn Predictor + Send + Sync> =
            Arc::new(PredictorFake::new(logger.clone(), config.analysis_latency));
        let analyzer = Analyzer::new(config.clone(), logger.clone(), predictor.clone());

        Self {
            config,
            logger,
            predictor,
            analyzer,
        }
    }

    /// Polls until `done` holds or the deadline passes. Returns whether it held.
    pub fn poll_until(&mut self, timeout: Duration, done: impl Fn(&Self) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            self.analyzer.poll();
            if done(self) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        false
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(width, height))
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

pub fn png_input(width: u32, height: u32) -> FileInput {
    FileInput::from_bytes("chest.png", "image/png", Arc::from(png_bytes(width, height)))
}

pub fn uploaded_image(width: u32, height: u32) -> UploadedImage {
    UploadedImage {
        meta: FileMeta {
            name: "chest.png".to_string(),
            mime_type: "image/png".to_string(),
            size: 512_000,
            width: Some(width),
            height: Some(height),
        },
        bytes: Arc::from(vec![0u8; 8]),
        preview: None,
    }
}
