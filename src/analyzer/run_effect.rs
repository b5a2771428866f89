use crate::analyzer::core::{Effect, Msg};
use crate::config::Config;
use crate::error::AppError;
use crate::export::write_report;
use crate::library::cancel_token::CancelToken;
use crate::library::logger::interface::Logger;
use crate::predictor::interface::{PredictError, Predictor};
use crate::upload::image_meta::{load_image, UploadedImage};
use chrono::Utc;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

struct InFlight {
    analysis_id: u64,
    cancel: CancelToken,
}

/// The one analysis allowed to run, plus the highest id already cancelled.
/// A cancel can reach the runner before the analysis it targets has started.
#[derive(Default)]
struct Tracker {
    current: Option<InFlight>,
    cancelled_through: u64,
}

#[derive(Clone)]
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    predictor: Arc<dyn Predictor + Send + Sync>,
    event_sender: Sender<Msg>,
    tracker: Arc<Mutex<Tracker>>,
}

impl RunEffect {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        predictor: Arc<dyn Predictor + Send + Sync>,
        event_sender: Sender<Msg>,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("run_effect"),
            predictor,
            event_sender,
            tracker: Arc::new(Mutex::new(Tracker::default())),
        }
    }

    /// Blocks until the effect is done. Callers run this on its own thread.
    pub fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::SubscribeTick => loop {
                std::thread::sleep(self.config.tick_rate);
                if self.event_sender.send(Msg::Tick(Instant::now())).is_err() {
                    break;
                }
            },
            Effect::LoadImage { upload_id, input } => {
                let result = load_image(&input);
                if let Err(e) = &result {
                    let _ = self.logger.error(&format!("Loading {} failed: {}", input.name, e));
                }
                let _ = self
                    .event_sender
                    .send(Msg::FileLoaded { upload_id, result });
            }
            Effect::StartAnalysis { analysis_id, image } => {
                self.analyze(analysis_id, &image);
            }
            Effect::CancelAnalysis { analysis_id } => {
                let mut tracker = self.lock_tracker();
                tracker.cancelled_through = tracker.cancelled_through.max(analysis_id);
                if let Some(current) = take_if_current(&mut tracker, analysis_id) {
                    current.cancel.cancel();
                    let _ = self
                        .logger
                        .info(&format!("Cancelled analysis #{}", analysis_id));
                }
            }
            Effect::ExportReport { file_name, report } => {
                let result = write_report(&self.config.report_dir, &file_name, &report);
                if let Err(e) = &result {
                    let _ = self.logger.error(&format!("Export failed: {}", e));
                }
                let _ = self.event_sender.send(Msg::ExportDone(result));
            }
        }
    }

    fn analyze(&self, analysis_id: u64, image: &UploadedImage) {
        let cancel = CancelToken::new();
        {
            let mut tracker = self.lock_tracker();
            if analysis_id <= tracker.cancelled_through {
                let _ = self
                    .logger
                    .info(&format!("Analysis #{} cancelled before start", analysis_id));
                return;
            }
            if let Some(previous) = tracker.current.replace(InFlight {
                analysis_id,
                cancel: cancel.clone(),
            }) {
                previous.cancel.cancel();
            }
        }

        self.spawn_progress_ticker(analysis_id, cancel.clone());

        let result = self.predictor.predict(image, &cancel);

        if cancel.is_cancelled() {
            let _ = self
                .logger
                .info(&format!("Discarding result of cancelled analysis #{}", analysis_id));
            return;
        }

        // Stops the ticker.
        cancel.cancel();
        take_if_current(&mut self.lock_tracker(), analysis_id);

        let result = match result {
            Ok(predictions) => Ok(predictions),
            Err(PredictError::Cancelled) => return,
            Err(PredictError::Failed(reason)) => {
                let _ = self
                    .logger
                    .error(&format!("Analysis #{} failed: {}", analysis_id, reason));
                Err(AppError::AnalysisFailed(reason))
            }
        };

        let _ = self.event_sender.send(Msg::AnalysisDone {
            analysis_id,
            completed_at: Utc::now(),
            result,
        });
    }

    fn spawn_progress_ticker(&self, analysis_id: u64, cancel: CancelToken) {
        let event_sender = self.event_sender.clone();
        let tick_rate = self.config.progress_tick_rate;

        std::thread::spawn(move || {
            while cancel.sleep(tick_rate) {
                let tick = Msg::ProgressTick {
                    analysis_id,
                    now: Instant::now(),
                };
                if event_sender.send(tick).is_err() {
                    break;
                }
            }
        });
    }

    fn lock_tracker(&self) -> MutexGuard<'_, Tracker> {
        self.tracker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[cfg(test)]
    pub fn has_in_flight(&self) -> bool {
        self.lock_tracker().current.is_some()
    }
}

fn take_if_current(tracker: &mut Tracker, analysis_id: u64) -> Option<InFlight> {
    let is_current = tracker
        .current
        .as_ref()
        .is_some_and(|current| current.analysis_id == analysis_id);
    if is_current {
        tracker.current.take()
    } else {
        None
    }
}
